//! Output boundary: styled transcript lines and the sinks that take them.

mod line;
mod terminal_sink;

pub use line::{OutputLine, OutputSink, Style};
pub use terminal_sink::TerminalSink;
