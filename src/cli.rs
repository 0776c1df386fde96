#[cfg(feature = "audio")]
use std::time::Duration;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Channel {
    Text,
    Voice,
}

/// Ask a question-answering knowledge base in any language.
///
/// Settings come from the environment (or a .env file): AI_SERVICE_ENDPOINT,
/// AI_SERVICE_KEY, QA_PROJECT_NAME, QA_DEPLOYMENT_NAME, TRANSLATOR_KEY and,
/// for voice, SPEECH_KEY and SPEECH_REGION.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Where questions come from
    #[arg(long, value_enum, default_value_t = Channel::Text)]
    pub input: Channel,

    /// Where answers go (voice also prints them)
    #[arg(long, value_enum, default_value_t = Channel::Text)]
    pub output: Channel,

    /// Treat every question as English: no detection, no translation
    #[arg(long)]
    pub no_translate: bool,

    /// Print the detected language and the English question before answers
    #[arg(long)]
    pub show_steps: bool,

    /// Longest single spoken question, in seconds
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
    pub capture_timeout: u64,

    /// Longest spoken answer, in seconds
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub playback_timeout: u64,
}

impl Args {
    pub fn uses_voice(&self) -> bool {
        self.input == Channel::Voice || self.output == Channel::Voice
    }

    #[cfg(feature = "audio")]
    pub fn capture_limit(&self) -> Duration {
        Duration::from_secs(self.capture_timeout)
    }

    #[cfg(feature = "audio")]
    pub fn playback_limit(&self) -> Duration {
        Duration::from_secs(self.playback_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_translating_text_chat() {
        let args = Args::try_parse_from(["lingo-qa"]).unwrap();
        assert_eq!(args.input, Channel::Text);
        assert_eq!(args.output, Channel::Text);
        assert!(!args.no_translate);
        assert!(!args.show_steps);
        assert!(!args.uses_voice());
        assert_eq!(args.capture_timeout, 15);
        assert_eq!(args.playback_timeout, 60);
    }

    #[test]
    fn voice_flags_parse() {
        let args = Args::try_parse_from([
            "lingo-qa",
            "--input",
            "voice",
            "--no-translate",
            "--capture-timeout",
            "5",
        ])
        .unwrap();
        assert_eq!(args.input, Channel::Voice);
        assert!(args.no_translate);
        assert!(args.uses_voice());
        assert_eq!(args.capture_timeout, 5);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Args::try_parse_from(["lingo-qa", "--playback-timeout", "0"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
