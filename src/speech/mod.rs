//! Speech recognition and synthesis, plus the audio plumbing around them.
//! Only compiled with the `audio` feature.

pub mod client;
pub mod device;
pub mod endpoint;
mod ssml;
pub mod wav;

use std::time::Duration;

pub use client::SpeechClient;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Speech recognition canceled: {0}")]
    Recognition(String),

    #[error("Malformed speech response: {0}")]
    Malformed(String),

    #[error("Audio device error: {0}")]
    Audio(String),

    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),

    #[error("{0} timed out after {1:?}")]
    Timeout(&'static str, Duration),

    #[error("Invalid speech endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Outcome of recognizing one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Recognized(String),
    /// Audio was processed but contained no recognizable speech.
    NoMatch(String),
}

pub trait SpeechRecognizer {
    /// `wav` is a 16 kHz mono 16-bit PCM WAV file.
    async fn recognize(&self, wav: Vec<u8>) -> Result<Recognition, SpeechError>;
}

pub trait SpeechSynthesizer {
    /// Returns the spoken text as WAV bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Mono samples in `[-1.0, 1.0]` at `sample_rate`.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Recording {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Blocking microphone capture of a single utterance.
/// Returns an empty recording when nobody spoke before `limit` or the initial-silence window.
pub trait AudioCapture {
    fn record(&self, limit: Duration) -> Result<Recording, SpeechError>;
}

/// Blocking playback of a WAV buffer; gives up after `limit`.
pub trait AudioPlayback {
    fn play(&self, wav: Vec<u8>, limit: Duration) -> Result<(), SpeechError>;
}
