use derive_more::Display;

use crate::filesystem::AbsolutePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Style {
    #[default]
    #[display("normal")]
    Normal,
    #[display("error")]
    Error,
    #[display("title")]
    Title,
}

/// One entry of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub style: Style,
    /// Set on the `$ input` line that repeats what the user typed.
    pub echo: bool,
}

impl OutputLine {
    pub fn normal(text: impl Into<String>) -> Self {
        Self::styled(text, Style::Normal)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::styled(text, Style::Error)
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::styled(text, Style::Title)
    }

    pub fn echo(input: &str) -> Self {
        OutputLine {
            text: format!("$ {input}"),
            style: Style::Normal,
            echo: true,
        }
    }

    fn styled(text: impl Into<String>, style: Style) -> Self {
        OutputLine {
            text: text.into(),
            style,
            echo: false,
        }
    }
}

/// Receives transcript lines from the shell and the game.
pub trait OutputSink {
    fn push(&mut self, line: OutputLine);

    /// Called before the shell waits for the next line.
    fn prompt(&mut self, _cwd: &AbsolutePath) {}
}

impl OutputSink for Vec<OutputLine> {
    fn push(&mut self, line: OutputLine) {
        Vec::push(self, line);
    }
}
