//! Plumbing shared by the hosted translator, question-answering and speech endpoints.

use serde::Deserialize;

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub const SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";

const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

/// Translator uses numeric codes, the language service uses strings.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<serde_json::Value>,
    message: Option<String>,
}

/// Builds a readable message from a non-2xx response body.
/// Uses the `{"error": {...}}` envelope when present, otherwise a body snippet.
pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(err) = envelope.error
    {
        let message = err.message.unwrap_or_else(|| "Unknown error".to_string());
        return match err.code {
            Some(serde_json::Value::String(code)) => format!("{code}: {message}"),
            Some(serde_json::Value::Number(code)) => format!("{code}: {message}"),
            _ => message,
        };
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {status}");
    }
    let end = trimmed.floor_char_boundary(SNIPPET_CHARS);
    format!("HTTP {status}: {}", &trimmed[..end])
}
