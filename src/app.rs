use std::io::{self, Stdout};
use std::time::Duration;

use reqwest::Client;
use tokio::io::{BufReader, Stdin};
use tracing::info;

use crate::chat::console::ConsoleInput;
use crate::chat::console::ConsoleOutput;
use crate::chat::session::SessionSummary;
use crate::chat::{AnswerSink, Orchestrator, QuestionSource, SessionError, TurnReport, run_session};
use crate::cli::{Args, Channel};
use crate::config::{Config, ConfigError, Needs};
use crate::error::{self, ErrorKind};
use crate::qa::{AnswerService, QaClient};
use crate::translator::{EnglishOnly, LanguageDetector, Translator, TranslatorClient};

#[cfg(feature = "audio")]
use crate::chat::voice::{VoiceInput, VoiceOutput};
#[cfg(feature = "audio")]
use crate::speech::SpeechClient;
#[cfg(feature = "audio")]
use crate::speech::device::{Microphone, Speaker};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Whole-request timeout for every service call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROMPT_ANY_LANGUAGE: &str = "Your question (in any language, or 'quit' to exit):";
const PROMPT_ENGLISH: &str = "Your question (or 'quit' to exit):";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to set up HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Session(#[from] SessionError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(e) => error::config_kind(e),
            AppError::Http(_) => ErrorKind::Configuration,
            AppError::Session(e) => e.kind(),
        }
    }
}

/// Load configuration, wire the clients for the selected mode and run the chat loop.
pub async fn run(args: &Args) -> Result<SessionSummary, AppError> {
    if args.uses_voice() && !cfg!(feature = "audio") {
        let which = if args.input == Channel::Voice {
            "input"
        } else {
            "output"
        };
        return Err(ConfigError::AudioUnsupported(which).into());
    }

    let config = Config::from_env(Needs {
        translation: !args.no_translate,
        #[cfg(feature = "audio")]
        speech: args.uses_voice(),
    })?;
    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .build()?;
    let qa = QaClient::new(http.clone(), &config.qa);
    let channels = Channels {
        args,
        #[cfg(feature = "audio")]
        speech: config
            .speech
            .as_ref()
            .map(|settings| SpeechClient::new(http.clone(), settings)),
    };

    info!(
        project = %config.qa.project,
        deployment = %config.qa.deployment,
        translate = config.translator.is_some(),
        "starting session"
    );

    match &config.translator {
        Some(settings) => {
            let translator = TranslatorClient::new(http.clone(), settings);
            let orchestrator = Orchestrator::new(&translator, &translator, &qa);
            converse(&channels, &orchestrator).await
        }
        None => {
            let english = EnglishOnly;
            let orchestrator = Orchestrator::new(&english, &english, &qa);
            converse(&channels, &orchestrator).await
        }
    }
}

/// The input and output picked on the command line, plus the speech client voice needs.
struct Channels<'a> {
    args: &'a Args,
    #[cfg(feature = "audio")]
    speech: Option<SpeechClient>,
}

#[cfg(feature = "audio")]
impl Channels<'_> {
    fn speech(&self) -> Result<SpeechClient, ConfigError> {
        self.speech.clone().ok_or(ConfigError::Missing("SPEECH_KEY"))
    }
}

async fn converse<D, T, A>(
    channels: &Channels<'_>,
    orchestrator: &Orchestrator<'_, D, T, A>,
) -> Result<SessionSummary, AppError>
where
    D: LanguageDetector,
    T: Translator,
    A: AnswerService,
{
    let mut input = Input::build(channels)?;
    let mut output = Output::build(channels)?;
    Ok(run_session(orchestrator, &mut input, &mut output).await?)
}

enum Input {
    Console(ConsoleInput<BufReader<Stdin>, Stdout>),
    #[cfg(feature = "audio")]
    Voice(VoiceInput<Microphone, SpeechClient, Stdout>),
}

impl Input {
    fn build(channels: &Channels<'_>) -> Result<Self, AppError> {
        let args = channels.args;
        match args.input {
            Channel::Text => {
                let prompt = if args.no_translate {
                    PROMPT_ENGLISH
                } else {
                    PROMPT_ANY_LANGUAGE
                };
                Ok(Input::Console(ConsoleInput::new(
                    BufReader::new(tokio::io::stdin()),
                    io::stdout(),
                    prompt,
                )))
            }
            Channel::Voice => Self::voice(channels),
        }
    }

    #[cfg(feature = "audio")]
    fn voice(channels: &Channels<'_>) -> Result<Self, AppError> {
        Ok(Input::Voice(VoiceInput::new(
            Microphone::default(),
            channels.speech()?,
            io::stdout(),
            channels.args.capture_limit(),
        )))
    }

    #[cfg(not(feature = "audio"))]
    fn voice(_channels: &Channels<'_>) -> Result<Self, AppError> {
        Err(ConfigError::AudioUnsupported("input").into())
    }
}

impl QuestionSource for Input {
    async fn next_question(&mut self) -> Result<Option<String>, SessionError> {
        match self {
            Input::Console(console) => console.next_question().await,
            #[cfg(feature = "audio")]
            Input::Voice(voice) => voice.next_question().await,
        }
    }
}

enum Output {
    Console(ConsoleOutput<Stdout>),
    #[cfg(feature = "audio")]
    Voice(VoiceOutput<SpeechClient, Speaker, Stdout>),
}

impl Output {
    fn build(channels: &Channels<'_>) -> Result<Self, AppError> {
        let console = ConsoleOutput::new(io::stdout(), channels.args.show_steps);
        match channels.args.output {
            Channel::Text => Ok(Output::Console(console)),
            Channel::Voice => Self::voice(channels, console),
        }
    }

    #[cfg(feature = "audio")]
    fn voice(channels: &Channels<'_>, console: ConsoleOutput<Stdout>) -> Result<Self, AppError> {
        Ok(Output::Voice(VoiceOutput::new(
            console,
            channels.speech()?,
            Speaker,
            channels.args.playback_limit(),
        )))
    }

    #[cfg(not(feature = "audio"))]
    fn voice(_channels: &Channels<'_>, _console: ConsoleOutput<Stdout>) -> Result<Self, AppError> {
        Err(ConfigError::AudioUnsupported("output").into())
    }
}

impl AnswerSink for Output {
    async fn present(&mut self, report: &TurnReport) -> Result<(), SessionError> {
        match self {
            Output::Console(console) => console.present(report).await,
            #[cfg(feature = "audio")]
            Output::Voice(voice) => voice.present(report).await,
        }
    }

    async fn farewell(&mut self) -> Result<(), SessionError> {
        match self {
            Output::Console(console) => console.farewell().await,
            #[cfg(feature = "audio")]
            Output::Voice(voice) => voice.farewell().await,
        }
    }
}
