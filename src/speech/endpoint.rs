//! Energy-based end-of-utterance detection for microphone capture.

use std::time::Duration;

const FRAME: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy)]
pub struct EndpointConfig {
    /// RMS level above which a frame counts as speech.
    pub threshold: f32,
    /// Silence after speech that ends the utterance.
    pub trailing_silence: Duration,
    /// Silence before any speech after which capture gives up.
    pub initial_silence: Duration,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            threshold: 0.02,
            trailing_silence: Duration::from_millis(800),
            initial_silence: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Listening,
    /// Speech was heard and has since gone quiet.
    Complete,
    /// Nothing but silence for the whole initial window.
    NoSpeech,
}

/// Feed mono samples as they arrive; the detector reports when to stop.
#[derive(Debug)]
pub struct Endpointer {
    config: EndpointConfig,
    frame_len: usize,
    pending: Vec<f32>,
    heard_speech: bool,
    silent_frames: usize,
    trailing_frames: usize,
    initial_frames: usize,
}

impl Endpointer {
    pub fn new(sample_rate: u32, config: EndpointConfig) -> Self {
        let frame_len = ((u128::from(sample_rate) * FRAME.as_millis()) / 1000).max(1) as usize;
        Self {
            config,
            frame_len,
            pending: Vec::with_capacity(frame_len),
            heard_speech: false,
            silent_frames: 0,
            trailing_frames: frames_in(config.trailing_silence),
            initial_frames: frames_in(config.initial_silence),
        }
    }

    pub fn heard_speech(&self) -> bool {
        self.heard_speech
    }

    pub fn push(&mut self, samples: &[f32]) -> Endpoint {
        for &sample in samples {
            self.pending.push(sample);
            if self.pending.len() < self.frame_len {
                continue;
            }
            let loud = rms(&self.pending) >= self.config.threshold;
            self.pending.clear();

            if loud {
                self.heard_speech = true;
                self.silent_frames = 0;
                continue;
            }
            self.silent_frames += 1;
            if self.heard_speech && self.silent_frames >= self.trailing_frames {
                return Endpoint::Complete;
            }
            if !self.heard_speech && self.silent_frames >= self.initial_frames {
                return Endpoint::NoSpeech;
            }
        }
        Endpoint::Listening
    }
}

fn frames_in(window: Duration) -> usize {
    ((window.as_millis() / FRAME.as_millis()) as usize).max(1)
}

fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 16_000;

    fn tone(ms: u64) -> Vec<f32> {
        let n = (RATE as u64 * ms / 1000) as usize;
        (0..n).map(|i| if i % 2 == 0 { 0.3 } else { -0.3 }).collect()
    }

    fn silence(ms: u64) -> Vec<f32> {
        vec![0.0; (RATE as u64 * ms / 1000) as usize]
    }

    #[test]
    fn speech_then_trailing_silence_completes() {
        let mut ep = Endpointer::new(RATE, EndpointConfig::default());
        assert_eq!(ep.push(&tone(500)), Endpoint::Listening);
        assert!(ep.heard_speech());
        assert_eq!(ep.push(&silence(400)), Endpoint::Listening);
        assert_eq!(ep.push(&silence(400)), Endpoint::Complete);
    }

    #[test]
    fn only_silence_reports_no_speech() {
        let mut ep = Endpointer::new(RATE, EndpointConfig::default());
        assert_eq!(ep.push(&silence(4_000)), Endpoint::Listening);
        assert_eq!(ep.push(&silence(1_000)), Endpoint::NoSpeech);
        assert!(!ep.heard_speech());
    }

    #[test]
    fn short_pause_between_words_keeps_listening() {
        let mut ep = Endpointer::new(RATE, EndpointConfig::default());
        ep.push(&tone(300));
        assert_eq!(ep.push(&silence(300)), Endpoint::Listening);
        assert_eq!(ep.push(&tone(300)), Endpoint::Listening);
        assert_eq!(ep.push(&silence(700)), Endpoint::Listening);
    }

    #[test]
    fn partial_frames_accumulate_across_pushes() {
        let mut ep = Endpointer::new(RATE, EndpointConfig::default());
        let loud = tone(20);
        ep.push(&loud[..100]);
        assert!(!ep.heard_speech());
        ep.push(&loud[100..]);
        assert!(ep.heard_speech());
    }
}
