//! Command interpreter: tokenizes a line, dispatches it to a builtin and
//! turns the outcome into transcript lines.

mod builtins;
mod command;
mod error;
mod shell;

pub use builtins::{EMPTY_LISTING, Reply};
pub use command::{Builtin, CommandLine};
pub use error::{EntryKind, ShellError};
pub use shell::{ModeSwitch, Shell};
