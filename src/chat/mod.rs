//! The interactive question-answer loop: one turn per question, no state between turns.

pub mod console;
pub mod orchestrator;
pub mod render;
pub mod session;
#[cfg(feature = "audio")]
pub mod voice;

pub use orchestrator::{Orchestrator, Turn};
pub use session::run_session;

use crate::error::{self, ErrorKind};
use crate::lang::LanguageCode;
use crate::qa::{AnswerCandidate, QaError};
#[cfg(feature = "audio")]
use crate::speech::SpeechError;
use crate::translator::TranslatorError;

/// A step of a turn failed. The remaining steps of that turn are not run.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("Language detection failed: {0}")]
    Detection(#[source] TranslatorError),

    #[error("Translation failed: {0}")]
    Translation(#[source] TranslatorError),

    #[error("Answer service failed: {0}")]
    Answer(#[source] QaError),
}

impl TurnError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TurnError::Detection(e) | TurnError::Translation(e) => error::translator_kind(e),
            TurnError::Answer(e) => error::qa_kind(e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Turn(#[from] TurnError),

    #[cfg(feature = "audio")]
    #[error("Speech failed: {0}")]
    Speech(#[from] SpeechError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Turn(e) => e.kind(),
            #[cfg(feature = "audio")]
            SessionError::Speech(e) => error::speech_kind(e),
            SessionError::Io(_) => ErrorKind::Transport,
        }
    }
}

/// One piece of user input and, once known, its language.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: Option<LanguageCode>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }

    pub fn in_language(&self, language: LanguageCode) -> Self {
        Self {
            text: self.text.clone(),
            language: Some(language),
        }
    }
}

/// A candidate as shown to the user: its text in the question's language.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedAnswer {
    pub candidate: AnswerCandidate,
    pub text: String,
    /// Set when translating back failed; `text` is then the English answer.
    pub translation_error: Option<String>,
}

/// Everything one turn produced. Dropped before the next turn starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub question: Utterance,
    pub english_question: String,
    pub answers: Vec<PresentedAnswer>,
}

impl TurnReport {
    pub fn language(&self) -> Option<&LanguageCode> {
        self.question.language.as_ref()
    }

    pub fn was_translated(&self) -> bool {
        self.language().is_some_and(|l| !l.is_english())
    }
}

/// Where questions come from (keyboard or microphone).
/// `Ok(None)` means the input is exhausted.
pub trait QuestionSource {
    async fn next_question(&mut self) -> Result<Option<String>, SessionError>;
}

/// Where answers go (console, optionally also the speaker).
pub trait AnswerSink {
    async fn present(&mut self, report: &TurnReport) -> Result<(), SessionError>;
    async fn farewell(&mut self) -> Result<(), SessionError>;
}
