//! Default microphone and speaker, via cpal and rodio.

use std::io::Cursor;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, warn};

use super::endpoint::{Endpoint, EndpointConfig, Endpointer};
use super::wav::downmix;
use super::{AudioCapture, AudioPlayback, Recording, SpeechError};

const PLAYBACK_POLL: Duration = Duration::from_millis(50);

fn audio_err(e: impl std::fmt::Display) -> SpeechError {
    SpeechError::Audio(e.to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Microphone {
    endpoint: EndpointConfig,
}

impl AudioCapture for Microphone {
    fn record(&self, limit: Duration) -> Result<Recording, SpeechError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| SpeechError::Audio("no default input device".into()))?;
        let supported = device.default_input_config().map_err(audio_err)?;
        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let stream_config = supported.config();

        let (tx, rx) = mpsc::channel::<Vec<f32>>();
        let on_error = |err: cpal::StreamError| warn!(error = %err, "input stream error");
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(downmix(data, channels));
                },
                on_error,
                None,
            ),
            cpal::SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let floats: Vec<f32> = data
                        .iter()
                        .map(|&s| f32::from(s) / f32::from(i16::MAX))
                        .collect();
                    let _ = tx.send(downmix(&floats, channels));
                },
                on_error,
                None,
            ),
            other => {
                return Err(SpeechError::Audio(format!(
                    "unsupported input sample format {other:?}"
                )));
            }
        }
        .map_err(audio_err)?;
        stream.play().map_err(audio_err)?;
        debug!(sample_rate, channels, "microphone open");

        let mut endpointer = Endpointer::new(sample_rate, self.endpoint);
        let mut samples = Vec::new();
        let deadline = Instant::now() + limit;
        loop {
            let now = Instant::now();
            if now >= deadline {
                debug!(?limit, "capture limit reached");
                break;
            }
            match rx.recv_timeout(deadline - now) {
                Ok(chunk) => {
                    samples.extend_from_slice(&chunk);
                    match endpointer.push(&chunk) {
                        Endpoint::Listening => {}
                        Endpoint::Complete => break,
                        Endpoint::NoSpeech => break,
                    }
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SpeechError::Audio("input stream closed".into()));
                }
            }
        }
        drop(stream);

        if !endpointer.heard_speech() {
            samples.clear();
        }
        Ok(Recording {
            samples,
            sample_rate,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Speaker;

impl AudioPlayback for Speaker {
    fn play(&self, wav: Vec<u8>, limit: Duration) -> Result<(), SpeechError> {
        let (_stream, handle) = rodio::OutputStream::try_default().map_err(audio_err)?;
        let sink = rodio::Sink::try_new(&handle).map_err(audio_err)?;
        let source = rodio::Decoder::new(Cursor::new(wav)).map_err(audio_err)?;
        sink.append(source);

        let deadline = Instant::now() + limit;
        while !sink.empty() {
            if Instant::now() >= deadline {
                sink.stop();
                return Err(SpeechError::Timeout("playback", limit));
            }
            std::thread::sleep(PLAYBACK_POLL);
        }
        Ok(())
    }
}
