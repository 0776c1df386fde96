use tracing::{debug, warn};

use super::{PresentedAnswer, TurnError, TurnReport, Utterance};
use crate::lang::LanguageCode;
use crate::qa::{AnswerCandidate, AnswerService};
use crate::translator::{LanguageDetector, Translator};

const QUIT_SENTINEL: &str = "quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// Empty input or the quit sentinel; no service was called.
    Quit,
    Answered(TurnReport),
}

/// `true` for empty input and for `quit` in any case. Trailing `.`, `!`, `?`
/// are ignored so a recognized "Quit." also ends the session.
pub fn is_quit(raw: &str) -> bool {
    let trimmed = raw.trim().trim_end_matches(['.', '!', '?']).trim_end();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(QUIT_SENTINEL)
}

/// Runs one question through detect → translate → answer → translate back.
pub struct Orchestrator<'a, D, T, A> {
    detector: &'a D,
    translator: &'a T,
    answers: &'a A,
}

impl<'a, D, T, A> Orchestrator<'a, D, T, A>
where
    D: LanguageDetector,
    T: Translator,
    A: AnswerService,
{
    pub fn new(detector: &'a D, translator: &'a T, answers: &'a A) -> Self {
        Self {
            detector,
            translator,
            answers,
        }
    }

    pub async fn handle_turn(&self, raw: &str) -> Result<Turn, TurnError> {
        if is_quit(raw) {
            return Ok(Turn::Quit);
        }
        let utterance = Utterance::new(raw.trim());

        let language = self
            .detector
            .detect(&utterance.text)
            .await
            .map_err(TurnError::Detection)?;
        let question = utterance.in_language(language.clone());

        let english_question = if language.is_english() {
            question.text.clone()
        } else {
            self.translator
                .translate(&question.text, &LanguageCode::english(), Some(&language))
                .await
                .map_err(TurnError::Translation)?
        };
        debug!(%language, "question ready for answer service");

        let candidates = self
            .answers
            .answer(&english_question)
            .await
            .map_err(TurnError::Answer)?;

        let mut answers = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            answers.push(self.localize(candidate, &language).await);
        }

        Ok(Turn::Answered(TurnReport {
            question,
            english_question,
            answers,
        }))
    }

    /// A failed translation keeps the English text and records why, so the
    /// remaining candidates are still shown.
    async fn localize(&self, candidate: AnswerCandidate, language: &LanguageCode) -> PresentedAnswer {
        if language.is_english() {
            return PresentedAnswer {
                text: candidate.answer.clone(),
                candidate,
                translation_error: None,
            };
        }
        match self
            .translator
            .translate(&candidate.answer, language, Some(&LanguageCode::english()))
            .await
        {
            Ok(text) => PresentedAnswer {
                candidate,
                text,
                translation_error: None,
            },
            Err(e) => {
                warn!(error = %e, %language, source = %candidate.source, "answer translation failed (showing English)");
                PresentedAnswer {
                    text: candidate.answer.clone(),
                    candidate,
                    translation_error: Some(e.to_string()),
                }
            }
        }
    }
}
