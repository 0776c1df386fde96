use crate::config::ConfigError;
use crate::qa::QaError;
#[cfg(feature = "audio")]
use crate::speech::SpeechError;
use crate::translator::TranslatorError;

/// Coarse error classes used when reporting a failure to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never got a response (DNS, connect, timeout).
    Transport,
    /// A service answered with a non-2xx status or a body we could not use.
    Service,
    /// Missing or invalid settings, or a build without the needed support.
    Configuration,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Transport => "network",
            ErrorKind::Service => "service",
            ErrorKind::Configuration => "configuration",
        }
    }
}

pub(crate) fn translator_kind(e: &TranslatorError) -> ErrorKind {
    match e {
        TranslatorError::Network(_) => ErrorKind::Transport,
        TranslatorError::Endpoint(_) => ErrorKind::Configuration,
        TranslatorError::Api { .. }
        | TranslatorError::Malformed(_)
        | TranslatorError::UnrecognizedLanguage(_) => ErrorKind::Service,
    }
}

pub(crate) fn qa_kind(e: &QaError) -> ErrorKind {
    match e {
        QaError::Network(_) => ErrorKind::Transport,
        QaError::Endpoint(_) => ErrorKind::Configuration,
        QaError::Api { .. } | QaError::Malformed(_) => ErrorKind::Service,
    }
}

#[cfg(feature = "audio")]
pub(crate) fn speech_kind(e: &SpeechError) -> ErrorKind {
    match e {
        SpeechError::Network(_) | SpeechError::Timeout(..) | SpeechError::Audio(_) => {
            ErrorKind::Transport
        }
        SpeechError::Endpoint(_) => ErrorKind::Configuration,
        SpeechError::Api { .. }
        | SpeechError::Recognition(_)
        | SpeechError::Malformed(_)
        | SpeechError::Wav(_) => ErrorKind::Service,
    }
}

pub(crate) fn config_kind(_e: &ConfigError) -> ErrorKind {
    ErrorKind::Configuration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_are_service_errors() {
        let e = TranslatorError::Api {
            code: 500,
            message: "boom".into(),
        };
        assert_eq!(translator_kind(&e), ErrorKind::Service);
        let e = QaError::Malformed("bad".into());
        assert_eq!(qa_kind(&e), ErrorKind::Service);
    }

    #[test]
    fn unrecognized_language_is_service_error() {
        let e = TranslatorError::UnrecognizedLanguage("??".into());
        assert_eq!(translator_kind(&e), ErrorKind::Service);
    }

    #[cfg(feature = "audio")]
    #[test]
    fn speech_timeout_is_transport() {
        use std::time::Duration;

        let e = SpeechError::Timeout("playback", Duration::from_secs(1));
        assert_eq!(speech_kind(&e), ErrorKind::Transport);
        assert_eq!(speech_kind(&e).label(), "network");
    }

    #[test]
    fn missing_config_is_configuration() {
        let e = ConfigError::Missing("AI_SERVICE_KEY");
        assert_eq!(config_kind(&e), ErrorKind::Configuration);
    }
}
