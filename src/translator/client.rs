use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::types::{DetectItem, TextItem, TranslateItem};
use super::{LanguageDetector, Translator, TranslatorError};
use crate::azure::{self, SUBSCRIPTION_KEY_HEADER, SUBSCRIPTION_REGION_HEADER};
use crate::config::{ApiKey, TranslatorConfig};
use crate::lang::LanguageCode;

const API_VERSION: &str = "3.0";

/// HTTP client for the Translator text API (`/detect` and `/translate`).
/// One client serves both the detector and the translator role.
#[derive(Clone)]
pub struct TranslatorClient {
    http: Client,
    key: ApiKey,
    region: Option<String>,
    base_url: String,
}

impl TranslatorClient {
    pub fn new(http: Client, config: &TranslatorConfig) -> Self {
        Self {
            http,
            key: config.key.clone(),
            region: config.region.clone(),
            base_url: config.endpoint.as_str().trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str, region: Option<&str>) -> Self {
        Self {
            http,
            key: ApiKey::new("test-key"),
            region: region.map(str::to_string),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, operation: &str, params: &[(&str, &str)]) -> Result<Url, TranslatorError> {
        let mut url = Url::parse(&format!("{}/{operation}", self.base_url))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", API_VERSION);
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn post<T: DeserializeOwned>(&self, url: Url, text: &str) -> Result<T, TranslatorError> {
        let mut request = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, self.key.expose())
            .header("User-Agent", crate::USER_AGENT)
            .json(&[TextItem { text }]);
        if let Some(region) = &self.region {
            request = request.header(SUBSCRIPTION_REGION_HEADER, region);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = azure::error_message(status, &body);
            warn!(status = %status, "translator API error");
            return Err(TranslatorError::Api {
                code: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| TranslatorError::Malformed(e.to_string()))
    }
}

impl LanguageDetector for TranslatorClient {
    async fn detect(&self, text: &str) -> Result<LanguageCode, TranslatorError> {
        let url = self.url("detect", &[])?;
        let items: Vec<DetectItem> = self.post(url, text).await?;
        let item = items
            .into_iter()
            .next()
            .ok_or_else(|| TranslatorError::Malformed("empty detection result".into()))?;
        let raw = item
            .language
            .ok_or_else(|| TranslatorError::Malformed("detection result has no language".into()))?;
        let language =
            LanguageCode::parse(&raw).ok_or(TranslatorError::UnrecognizedLanguage(raw))?;

        if item.is_translation_supported == Some(false) {
            warn!(%language, "detected language is not supported for translation");
        }
        debug!(%language, score = item.score, "language detected");
        Ok(language)
    }
}

impl Translator for TranslatorClient {
    async fn translate(
        &self,
        text: &str,
        to: &LanguageCode,
        from: Option<&LanguageCode>,
    ) -> Result<String, TranslatorError> {
        let mut params = vec![("to", to.as_str())];
        if let Some(from) = from {
            params.push(("from", from.as_str()));
        }
        let url = self.url("translate", &params)?;
        let items: Vec<TranslateItem> = self.post(url, text).await?;
        let translated = items
            .into_iter()
            .next()
            .and_then(|item| item.translations.into_iter().next())
            .ok_or_else(|| TranslatorError::Malformed("translation result is empty".into()))?;

        debug!(to = %to, from = from.map(LanguageCode::as_str), "text translated");
        Ok(translated.text)
    }
}
