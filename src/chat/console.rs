use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use super::render::render_turn;
use super::{AnswerSink, QuestionSource, SessionError, TurnReport};

pub const GOODBYE: &str = "Goodbye!";

/// Reads one line per turn, printing `prompt` before each read.
pub struct ConsoleInput<R, W> {
    lines: Lines<R>,
    out: W,
    prompt: String,
}

impl<R: AsyncBufRead + Unpin, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, out: W, prompt: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            out,
            prompt: prompt.into(),
        }
    }
}

impl<R: AsyncBufRead + Unpin, W: Write> QuestionSource for ConsoleInput<R, W> {
    async fn next_question(&mut self) -> Result<Option<String>, SessionError> {
        writeln!(self.out, "\n{}", self.prompt)?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?)
    }
}

pub struct ConsoleOutput<W> {
    out: W,
    show_steps: bool,
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(out: W, show_steps: bool) -> Self {
        Self { out, show_steps }
    }

    #[cfg(feature = "audio")]
    pub(crate) fn writer(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> AnswerSink for ConsoleOutput<W> {
    async fn present(&mut self, report: &TurnReport) -> Result<(), SessionError> {
        self.out
            .write_all(render_turn(report, self.show_steps).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    async fn farewell(&mut self) -> Result<(), SessionError> {
        writeln!(self.out, "{GOODBYE}")?;
        self.out.flush()?;
        Ok(())
    }
}
