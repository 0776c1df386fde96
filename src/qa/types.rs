use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answers: Vec<KnowledgeBaseAnswer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseAnswer {
    pub answer: Option<String>,
    pub confidence_score: Option<f64>,
    pub source: Option<String>,
}

/// One scored answer returned by the question-answering service.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCandidate {
    pub answer: String,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub source: String,
}

impl From<KnowledgeBaseAnswer> for AnswerCandidate {
    fn from(raw: KnowledgeBaseAnswer) -> Self {
        Self {
            answer: raw.answer.unwrap_or_default(),
            confidence: raw.confidence_score.unwrap_or(0.0).clamp(0.0, 1.0),
            source: raw.source.unwrap_or_default(),
        }
    }
}
