use std::env;

use tracing::debug;
use url::Url;

pub const DEFAULT_TRANSLATOR_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";
#[cfg(feature = "audio")]
const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";
#[cfg(feature = "audio")]
const DEFAULT_SPEECH_VOICE: &str = "en-US-AvaMultilingualNeural";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set. Add it to the environment or a .env file.")]
    Missing(&'static str),

    #[error("{var} is not a valid http(s) URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("voice {0} requires a build with the `audio` feature")]
    AudioUnsupported(&'static str),
}

#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Clone)]
pub struct QaConfig {
    pub endpoint: Url,
    pub key: ApiKey,
    pub project: String,
    pub deployment: String,
}

#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub endpoint: Url,
    pub key: ApiKey,
    pub region: Option<String>,
}

#[cfg(feature = "audio")]
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub key: ApiKey,
    pub region: String,
    pub language: String,
    pub voice: String,
}

/// Which optional services the selected CLI mode talks to.
#[derive(Debug, Clone, Copy, Default)]
pub struct Needs {
    pub translation: bool,
    #[cfg(feature = "audio")]
    pub speech: bool,
}

/// Process-wide settings, read once at startup and handed to the clients.
///
/// Variables: `AI_SERVICE_ENDPOINT`, `AI_SERVICE_KEY`, `QA_PROJECT_NAME`,
/// `QA_DEPLOYMENT_NAME` (always); `TRANSLATOR_KEY`, `TRANSLATOR_ENDPOINT`,
/// `TRANSLATOR_REGION` (translation); `SPEECH_KEY`, `SPEECH_REGION`,
/// `SPEECH_LANGUAGE`, `SPEECH_VOICE` (voice input/output).
#[derive(Debug, Clone)]
pub struct Config {
    pub qa: QaConfig,
    pub translator: Option<TranslatorConfig>,
    #[cfg(feature = "audio")]
    pub speech: Option<SpeechConfig>,
}

impl Config {
    pub fn from_env(needs: Needs) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => debug!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_vars(|name| env::var(name).ok(), needs)
    }

    pub fn from_vars(
        lookup: impl Fn(&str) -> Option<String>,
        needs: Needs,
    ) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let qa = QaConfig {
            endpoint: parse_url("AI_SERVICE_ENDPOINT", &require("AI_SERVICE_ENDPOINT")?)?,
            key: ApiKey::new(require("AI_SERVICE_KEY")?),
            project: require("QA_PROJECT_NAME")?,
            deployment: require("QA_DEPLOYMENT_NAME")?,
        };

        let translator = if needs.translation {
            let endpoint = get("TRANSLATOR_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_TRANSLATOR_ENDPOINT.to_string());
            Some(TranslatorConfig {
                endpoint: parse_url("TRANSLATOR_ENDPOINT", &endpoint)?,
                key: ApiKey::new(require("TRANSLATOR_KEY")?),
                region: get("TRANSLATOR_REGION"),
            })
        } else {
            None
        };

        #[cfg(feature = "audio")]
        let speech = if needs.speech {
            Some(SpeechConfig {
                key: ApiKey::new(require("SPEECH_KEY")?),
                region: require("SPEECH_REGION")?,
                language: get("SPEECH_LANGUAGE")
                    .unwrap_or_else(|| DEFAULT_SPEECH_LANGUAGE.to_string()),
                voice: get("SPEECH_VOICE").unwrap_or_else(|| DEFAULT_SPEECH_VOICE.to_string()),
            })
        } else {
            None
        };

        Ok(Self {
            qa,
            translator,
            #[cfg(feature = "audio")]
            speech,
        })
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            var,
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const QA_VARS: [(&str, &str); 4] = [
        ("AI_SERVICE_ENDPOINT", "https://qa.example.com/"),
        ("AI_SERVICE_KEY", "qa-key"),
        ("QA_PROJECT_NAME", "faq"),
        ("QA_DEPLOYMENT_NAME", "production"),
    ];

    #[test]
    fn qa_only_config_loads() {
        let config = Config::from_vars(vars(&QA_VARS), Needs::default()).unwrap();
        assert_eq!(config.qa.endpoint.as_str(), "https://qa.example.com/");
        assert_eq!(config.qa.project, "faq");
        assert_eq!(config.qa.deployment, "production");
        assert!(config.translator.is_none());
    }

    #[test]
    fn missing_qa_key_is_reported_by_name() {
        let err = Config::from_vars(vars(&QA_VARS[..1]), Needs::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AI_SERVICE_KEY")));
        assert!(err.to_string().contains("AI_SERVICE_KEY"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut pairs = QA_VARS.to_vec();
        pairs[2] = ("QA_PROJECT_NAME", "   ");
        let err = Config::from_vars(vars(&pairs), Needs::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("QA_PROJECT_NAME")));
    }

    #[test]
    fn translation_requires_key_and_defaults_endpoint() {
        let needs = Needs {
            translation: true,
            ..Needs::default()
        };
        let err = Config::from_vars(vars(&QA_VARS), needs).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TRANSLATOR_KEY")));

        let mut pairs = QA_VARS.to_vec();
        pairs.push(("TRANSLATOR_KEY", "t-key"));
        let config = Config::from_vars(vars(&pairs), needs).unwrap();
        let translator = config.translator.unwrap();
        assert_eq!(
            translator.endpoint.as_str(),
            "https://api.cognitive.microsofttranslator.com/"
        );
        assert!(translator.region.is_none());
    }

    #[cfg(feature = "audio")]
    #[test]
    fn speech_defaults_language_and_voice() {
        let mut pairs = QA_VARS.to_vec();
        pairs.push(("SPEECH_KEY", "s-key"));
        pairs.push(("SPEECH_REGION", "eastus"));
        let needs = Needs {
            translation: false,
            speech: true,
        };
        let speech = Config::from_vars(vars(&pairs), needs).unwrap().speech.unwrap();
        assert_eq!(speech.region, "eastus");
        assert_eq!(speech.language, "en-US");
        assert_eq!(speech.voice, "en-US-AvaMultilingualNeural");
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let mut pairs = QA_VARS.to_vec();
        pairs[0] = ("AI_SERVICE_ENDPOINT", "ftp://qa.example.com");
        let err = Config::from_vars(vars(&pairs), Needs::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                var: "AI_SERVICE_ENDPOINT",
                ..
            }
        ));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let config = Config::from_vars(vars(&QA_VARS), Needs::default()).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("qa-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
