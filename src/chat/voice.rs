use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::console::ConsoleOutput;
use super::{AnswerSink, QuestionSource, SessionError, TurnReport};
use crate::speech::wav::recording_to_wav;
use crate::speech::{
    AudioCapture, AudioPlayback, Recognition, SpeechError, SpeechRecognizer, SpeechSynthesizer,
};

/// Slack on top of a device's own limit before the blocking task is abandoned.
const DEVICE_GRACE: Duration = Duration::from_secs(2);
const NO_SPEECH: &str = "No speech recognized. Please try again.";

/// Asks for each question out loud: capture one utterance, then recognize it.
pub struct VoiceInput<C, R, W> {
    capture: Arc<C>,
    recognizer: R,
    out: W,
    limit: Duration,
}

impl<C, R, W> VoiceInput<C, R, W>
where
    C: AudioCapture + Send + Sync + 'static,
    R: SpeechRecognizer,
    W: Write,
{
    pub fn new(capture: C, recognizer: R, out: W, limit: Duration) -> Self {
        Self {
            capture: Arc::new(capture),
            recognizer,
            out,
            limit,
        }
    }

    /// Blocks until one utterance is recognized, silence ends it, or `limit` passes.
    /// Returns an empty string when nothing was recognized.
    pub async fn capture_speech(&mut self) -> Result<String, SessionError> {
        writeln!(self.out, "Speak into your microphone...")?;
        self.out.flush()?;

        let capture = Arc::clone(&self.capture);
        let limit = self.limit;
        let task = tokio::task::spawn_blocking(move || capture.record(limit));
        let recording = tokio::time::timeout(limit + DEVICE_GRACE, task)
            .await
            .map_err(|_| SpeechError::Timeout("speech capture", limit))?
            .map_err(|e| SpeechError::Audio(format!("capture task failed: {e}")))??;

        if recording.is_empty() {
            writeln!(self.out, "{NO_SPEECH}")?;
            return Ok(String::new());
        }

        match self.recognizer.recognize(recording_to_wav(&recording)?).await {
            Ok(Recognition::Recognized(text)) => {
                writeln!(self.out, "Recognized: {text}")?;
                Ok(text)
            }
            Ok(Recognition::NoMatch(reason)) => {
                debug!(%reason, "recognizer found no speech");
                writeln!(self.out, "{NO_SPEECH}")?;
                Ok(String::new())
            }
            Err(e) => {
                warn!(error = %e, "speech recognition canceled");
                self.report_cancellation(&e)?;
                Ok(String::new())
            }
        }
    }

    fn report_cancellation(&mut self, e: &SpeechError) -> std::io::Result<()> {
        match e {
            SpeechError::Recognition(status) => {
                writeln!(self.out, "Speech Recognition canceled: {status}")
            }
            other => {
                writeln!(self.out, "Speech Recognition canceled: Error")?;
                writeln!(self.out, "Error details: {other}")
            }
        }
    }
}

impl<C, R, W> QuestionSource for VoiceInput<C, R, W>
where
    C: AudioCapture + Send + Sync + 'static,
    R: SpeechRecognizer,
    W: Write,
{
    async fn next_question(&mut self) -> Result<Option<String>, SessionError> {
        writeln!(self.out, "\nSay your question (or say 'quit' to exit):")?;
        self.capture_speech().await.map(Some)
    }
}

/// Prints every answer like the console does, then speaks it.
pub struct VoiceOutput<S, P, W> {
    console: ConsoleOutput<W>,
    synthesizer: S,
    playback: Arc<P>,
    limit: Duration,
}

impl<S, P, W> VoiceOutput<S, P, W>
where
    S: SpeechSynthesizer,
    P: AudioPlayback + Send + Sync + 'static,
    W: Write,
{
    pub fn new(console: ConsoleOutput<W>, synthesizer: S, playback: P, limit: Duration) -> Self {
        Self {
            console,
            synthesizer,
            playback: Arc::new(playback),
            limit,
        }
    }

    /// Blocks until playback finishes or `limit` passes.
    pub async fn synthesize_speech(&mut self, text: &str) -> Result<(), SpeechError> {
        let wav = self.synthesizer.synthesize(text).await?;

        let playback = Arc::clone(&self.playback);
        let limit = self.limit;
        let task = tokio::task::spawn_blocking(move || playback.play(wav, limit));
        tokio::time::timeout(limit + DEVICE_GRACE, task)
            .await
            .map_err(|_| SpeechError::Timeout("speech playback", limit))?
            .map_err(|e| SpeechError::Audio(format!("playback task failed: {e}")))??;
        Ok(())
    }
}

impl<S, P, W> AnswerSink for VoiceOutput<S, P, W>
where
    S: SpeechSynthesizer,
    P: AudioPlayback + Send + Sync + 'static,
    W: Write,
{
    async fn present(&mut self, report: &TurnReport) -> Result<(), SessionError> {
        self.console.present(report).await?;
        // A failed answer is reported and skipped; the rest are still spoken.
        for answer in &report.answers {
            match self.synthesize_speech(&answer.text).await {
                Ok(()) => writeln!(self.console.writer(), "Speech synthesis completed.")?,
                Err(e) => {
                    warn!(error = %e, "speech synthesis canceled");
                    writeln!(self.console.writer(), "Speech synthesis canceled: {e}")?;
                }
            }
        }
        self.console.writer().flush()?;
        Ok(())
    }

    async fn farewell(&mut self) -> Result<(), SessionError> {
        self.console.farewell().await
    }
}
