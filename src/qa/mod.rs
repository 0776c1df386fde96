//! Question answering against a deployed knowledge-base project.

pub mod client;
pub mod types;

pub use client::QaClient;
pub use types::AnswerCandidate;

#[derive(Debug, thiserror::Error)]
pub enum QaError {
    #[error("Question answering API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed question answering response: {0}")]
    Malformed(String),

    #[error("Invalid question answering endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Answers an English question. Candidates come back in service order;
/// an empty list means no suitable answer, not an error.
pub trait AnswerService {
    async fn answer(&self, question: &str) -> Result<Vec<AnswerCandidate>, QaError>;
}
