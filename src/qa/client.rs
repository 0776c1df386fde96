use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::types::{AnswerCandidate, QueryRequest, QueryResponse};
use super::{AnswerService, QaError};
use crate::azure::{self, SUBSCRIPTION_KEY_HEADER};
use crate::config::{ApiKey, QaConfig};

const API_VERSION: &str = "2021-10-01";
const QUERY_PATH: &str = "language/:query-knowledgebases";

/// HTTP client for a deployed question-answering project.
/// Project and deployment names are fixed at construction.
#[derive(Clone)]
pub struct QaClient {
    http: Client,
    key: ApiKey,
    base_url: String,
    project: String,
    deployment: String,
}

impl QaClient {
    pub fn new(http: Client, config: &QaConfig) -> Self {
        Self {
            http,
            key: config.key.clone(),
            base_url: config.endpoint.as_str().trim_end_matches('/').to_string(),
            project: config.project.clone(),
            deployment: config.deployment.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            key: ApiKey::new("test-key"),
            base_url: base_url.trim_end_matches('/').to_string(),
            project: "faq".to_string(),
            deployment: "production".to_string(),
        }
    }

    fn query_url(&self) -> Result<Url, QaError> {
        let mut url = Url::parse(&format!("{}/{QUERY_PATH}", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("projectName", &self.project)
            .append_pair("deploymentName", &self.deployment)
            .append_pair("api-version", API_VERSION);
        Ok(url)
    }
}

impl AnswerService for QaClient {
    async fn answer(&self, question: &str) -> Result<Vec<AnswerCandidate>, QaError> {
        let url = self.query_url()?;
        let response = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, self.key.expose())
            .header("User-Agent", crate::USER_AGENT)
            .json(&QueryRequest { question })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = azure::error_message(status, &body);
            warn!(status = %status, project = %self.project, "question answering API error");
            return Err(QaError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let parsed: QueryResponse =
            serde_json::from_str(&body).map_err(|e| QaError::Malformed(e.to_string()))?;
        let candidates: Vec<AnswerCandidate> =
            parsed.answers.into_iter().map(AnswerCandidate::from).collect();
        debug!(
            project = %self.project,
            deployment = %self.deployment,
            answers = candidates.len(),
            "question answered"
        );
        Ok(candidates)
    }
}
