use tracing::{debug, info};

use super::{AnswerSink, Orchestrator, QuestionSource, SessionError, Turn};
use crate::qa::AnswerService;
use crate::translator::{LanguageDetector, Translator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub turns: usize,
}

/// Read, answer, present, repeat. Ends on `quit`, empty input or end of input.
/// The first failure ends the session and is returned to the caller.
pub async fn run_session<D, T, A, I, O>(
    orchestrator: &Orchestrator<'_, D, T, A>,
    input: &mut I,
    output: &mut O,
) -> Result<SessionSummary, SessionError>
where
    D: LanguageDetector,
    T: Translator,
    A: AnswerService,
    I: QuestionSource,
    O: AnswerSink,
{
    let mut turns = 0;
    loop {
        let Some(question) = input.next_question().await? else {
            debug!("input closed");
            output.farewell().await?;
            break;
        };

        match orchestrator.handle_turn(&question).await? {
            Turn::Quit => {
                output.farewell().await?;
                break;
            }
            Turn::Answered(report) => {
                output.present(&report).await?;
                turns += 1;
            }
        }
    }

    info!(turns, "session finished");
    Ok(SessionSummary { turns })
}
