use derive_more::Display;
use snafu::Snafu;

use super::Builtin;

/// What a creating command was trying to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

/// A failed command. Never fatal; rendered as one error line.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ShellError {
    #[snafu(display("{command}: missing {operand}"))]
    MissingOperand {
        command: Builtin,
        operand: &'static str,
    },
    #[snafu(display("{command}: cannot create {entry} '{name}': Invalid name"))]
    InvalidName {
        command: Builtin,
        entry: EntryKind,
        name: String,
    },
    #[snafu(display("{command}: cannot create {entry} '{name}': File exists"))]
    AlreadyExists {
        command: Builtin,
        entry: EntryKind,
        name: String,
    },
    #[snafu(display("{command}: {target}: No such file or directory"))]
    NotFound { command: Builtin, target: String },
    #[snafu(display("{command}: {target}: Not a directory"))]
    NotADirectory { command: Builtin, target: String },
    #[snafu(display("{command}: {target}: Is a directory"))]
    IsDirectory { command: Builtin, target: String },
    #[snafu(display("Command not found: {name}"))]
    CommandNotFound { name: String },
    #[snafu(display("Error: Cannot access current directory"))]
    CurrentDirUnreachable,
}
