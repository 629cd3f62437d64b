use std::io::{self, Stdout, Write};

use colored::Colorize;
use supports_color::Stream;
use tracing::debug;

use super::{OutputLine, OutputSink, Style};
use crate::filesystem::AbsolutePath;

/// Writes transcript lines to a terminal-like writer.
pub struct TerminalSink<W: Write> {
    writer: W,
    colored: bool,
    interactive: bool,
}

impl TerminalSink<Stdout> {
    /// A sink on stdout. Color is used only when stdout supports it and
    /// `allow_color` is set. Interactive sessions drop echo lines, since
    /// the terminal already shows what was typed.
    pub fn stdout(allow_color: bool, interactive: bool) -> Self {
        let colored = allow_color && supports_color::on(Stream::Stdout).is_some();
        if colored {
            colored::control::set_override(true);
        }
        debug!("Terminal output colored: {colored}, interactive: {interactive}");
        TerminalSink::new(io::stdout(), colored, interactive)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(writer: W, colored: bool, interactive: bool) -> Self {
        TerminalSink {
            writer,
            colored,
            interactive,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(&self, line: &OutputLine) -> String {
        if !self.colored {
            return line.text.clone();
        }
        match line.style {
            Style::Normal => line.text.clone(),
            Style::Error => line.text.red().to_string(),
            Style::Title => line.text.magenta().bold().to_string(),
        }
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn push(&mut self, line: OutputLine) {
        if line.echo && self.interactive {
            return;
        }
        let rendered = self.render(&line);
        if let Err(e) = writeln!(self.writer, "{rendered}") {
            debug!("Failed to write {} line: {}", line.style, e);
        }
    }

    /// Only shown for interactive input; piped sessions get a plain
    /// transcript.
    fn prompt(&mut self, cwd: &AbsolutePath) {
        if !self.interactive {
            return;
        }
        let prompt = format!("{cwd} $ ");
        let prompt = if self.colored {
            prompt.bright_magenta().to_string()
        } else {
            prompt
        };
        if let Err(e) = write!(self.writer, "{prompt}").and_then(|()| self.writer.flush()) {
            debug!("Failed to write prompt: {}", e);
        }
    }
}
