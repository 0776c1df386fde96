use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::ssml::build_ssml;
use super::wav::RECOGNIZER_SAMPLE_RATE;
use super::{Recognition, SpeechError, SpeechRecognizer, SpeechSynthesizer};
use crate::azure::{self, SUBSCRIPTION_KEY_HEADER};
use crate::config::{ApiKey, SpeechConfig};

const RECOGNIZE_PATH: &str = "speech/recognition/conversation/cognitiveservices/v1";
const SYNTHESIZE_PATH: &str = "cognitiveservices/v1";
const OUTPUT_FORMAT: &str = "riff-16khz-16bit-mono-pcm";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionResponse {
    recognition_status: String,
    display_text: Option<String>,
}

/// REST client for short-audio recognition and text-to-speech in one region.
#[derive(Clone)]
pub struct SpeechClient {
    http: Client,
    key: ApiKey,
    language: String,
    voice: String,
    stt_base: String,
    tts_base: String,
}

impl SpeechClient {
    pub fn new(http: Client, config: &SpeechConfig) -> Self {
        Self {
            http,
            key: config.key.clone(),
            language: config.language.clone(),
            voice: config.voice.clone(),
            stt_base: format!("https://{}.stt.speech.microsoft.com", config.region),
            tts_base: format!("https://{}.tts.speech.microsoft.com", config.region),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            key: ApiKey::new("test-key"),
            language: "en-US".to_string(),
            voice: "en-US-AvaMultilingualNeural".to_string(),
            stt_base: base_url.to_string(),
            tts_base: base_url.to_string(),
        }
    }

    fn recognize_url(&self) -> Result<Url, SpeechError> {
        let mut url = Url::parse(&format!("{}/{RECOGNIZE_PATH}", self.stt_base))?;
        url.query_pairs_mut()
            .append_pair("language", &self.language)
            .append_pair("format", "simple");
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SpeechError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, "speech API error");
        Err(SpeechError::Api {
            code: status.as_u16(),
            message: azure::error_message(status, &body),
        })
    }
}

impl SpeechRecognizer for SpeechClient {
    async fn recognize(&self, wav: Vec<u8>) -> Result<Recognition, SpeechError> {
        let url = self.recognize_url()?;
        let response = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, self.key.expose())
            .header(
                "Content-Type",
                format!("audio/wav; codecs=audio/pcm; samplerate={RECOGNIZER_SAMPLE_RATE}"),
            )
            .header("Accept", "application/json")
            .header("User-Agent", crate::USER_AGENT)
            .body(wav)
            .send()
            .await?;
        let body = Self::check(response).await?.text().await?;
        let parsed: RecognitionResponse =
            serde_json::from_str(&body).map_err(|e| SpeechError::Malformed(e.to_string()))?;

        let status = parsed.recognition_status;
        debug!(%status, "speech recognized");
        if status == "Success" {
            Ok(Recognition::Recognized(
                parsed.display_text.unwrap_or_default(),
            ))
        } else if matches!(
            status.as_str(),
            "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout"
        ) {
            Ok(Recognition::NoMatch(status))
        } else {
            Err(SpeechError::Recognition(status))
        }
    }
}

impl SpeechSynthesizer for SpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let url = Url::parse(&format!("{}/{SYNTHESIZE_PATH}", self.tts_base))?;
        let response = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, self.key.expose())
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header("User-Agent", crate::USER_AGENT)
            .body(build_ssml(&self.language, &self.voice, text))
            .send()
            .await?;
        let audio = Self::check(response).await?.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::Malformed("synthesis returned no audio".into()));
        }
        debug!(bytes = audio.len(), "speech synthesized");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const STT_PATH: &str = "/speech/recognition/conversation/cognitiveservices/v1";

    #[tokio::test]
    async fn recognize_success_returns_display_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STT_PATH))
            .and(query_param("language", "en-US"))
            .and(query_param("format", "simple"))
            .and(header("Ocp-Apim-Subscription-Key", "test-key"))
            .and(header(
                "Content-Type",
                "audio/wav; codecs=audio/pcm; samplerate=16000",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "RecognitionStatus": "Success",
                "DisplayText": "What are your opening hours?",
                "Offset": 300000,
                "Duration": 21000000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SpeechClient::with_base_url(Client::new(), &server.uri());
        let result = client.recognize(b"RIFF....".to_vec()).await.unwrap();
        assert_eq!(
            result,
            Recognition::Recognized("What are your opening hours?".into())
        );
    }

    #[tokio::test]
    async fn recognize_silence_is_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "RecognitionStatus": "InitialSilenceTimeout",
                "Offset": 0,
                "Duration": 0
            })))
            .mount(&server)
            .await;

        let client = SpeechClient::with_base_url(Client::new(), &server.uri());
        let result = client.recognize(Vec::new()).await.unwrap();
        assert_eq!(result, Recognition::NoMatch("InitialSilenceTimeout".into()));
    }

    #[tokio::test]
    async fn recognize_error_status_is_canceled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"RecognitionStatus": "Error"})),
            )
            .mount(&server)
            .await;

        let client = SpeechClient::with_base_url(Client::new(), &server.uri());
        let result = client.recognize(Vec::new()).await;
        assert!(matches!(result, Err(SpeechError::Recognition(s)) if s == "Error"));
    }

    #[tokio::test]
    async fn recognize_unauthorized_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STT_PATH))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = SpeechClient::with_base_url(Client::new(), &server.uri());
        assert!(matches!(
            client.recognize(Vec::new()).await,
            Err(SpeechError::Api { code: 401, .. })
        ));
    }

    #[tokio::test]
    async fn synthesize_posts_ssml_and_returns_audio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cognitiveservices/v1"))
            .and(header("Content-Type", "application/ssml+xml"))
            .and(header("X-Microsoft-OutputFormat", "riff-16khz-16bit-mono-pcm"))
            .and(body_string_contains(
                "<voice name='en-US-AvaMultilingualNeural'>9 a 5</voice>",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFFfakewav".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let client = SpeechClient::with_base_url(Client::new(), &server.uri());
        let audio = client.synthesize("9 a 5").await.unwrap();
        assert_eq!(audio, b"RIFFfakewav".to_vec());
    }

    #[tokio::test]
    async fn synthesize_empty_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cognitiveservices/v1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = SpeechClient::with_base_url(Client::new(), &server.uri());
        assert!(matches!(
            client.synthesize("hello").await,
            Err(SpeechError::Malformed(_))
        ));
    }
}
