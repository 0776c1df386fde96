//! Language detection and text translation.

pub mod client;
pub mod types;

pub use client::TranslatorClient;

use crate::lang::LanguageCode;

#[derive(Debug, thiserror::Error)]
pub enum TranslatorError {
    #[error("Translator API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed translator response: {0}")]
    Malformed(String),

    #[error("Unrecognized language code: '{0}'")]
    UnrecognizedLanguage(String),

    #[error("Invalid translator endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Identifies the language of a piece of text.
pub trait LanguageDetector {
    async fn detect(&self, text: &str) -> Result<LanguageCode, TranslatorError>;
}

/// Translates text into `to`. `from` is a hint; without it the service detects the source itself.
pub trait Translator {
    async fn translate(
        &self,
        text: &str,
        to: &LanguageCode,
        from: Option<&LanguageCode>,
    ) -> Result<String, TranslatorError>;
}

/// Stand-in used when translation is switched off: every question is taken as English.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishOnly;

impl LanguageDetector for EnglishOnly {
    async fn detect(&self, _text: &str) -> Result<LanguageCode, TranslatorError> {
        Ok(LanguageCode::english())
    }
}

impl Translator for EnglishOnly {
    async fn translate(
        &self,
        text: &str,
        _to: &LanguageCode,
        _from: Option<&LanguageCode>,
    ) -> Result<String, TranslatorError> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn english_only_detects_english() {
        let lang = EnglishOnly.detect("¿Cuál es el horario?").await.unwrap();
        assert!(lang.is_english());
    }
}
