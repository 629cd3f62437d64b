use tracing::{debug, info};

use crate::output::{OutputLine, OutputSink};
use crate::session::Session;

use super::builtins::{self, Reply};
use super::{Builtin, CommandLine, ShellError};

/// Hand-off requested by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSwitch {
    LaunchGame,
}

/// Dispatches input lines against one [`Session`].
#[derive(Debug, Clone, Default)]
pub struct Shell {
    session: Session,
}

impl Shell {
    pub fn new(session: Session) -> Self {
        Shell { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn banner(&self, sink: &mut dyn OutputSink) {
        let commands = Builtin::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        sink.push(OutputLine::title("Terminal Emulator v1.0"));
        sink.push(OutputLine::normal(
            "Type commands to interact with the filesystem.",
        ));
        sink.push(OutputLine::normal(format!("Available commands: {commands}")));
        sink.push(OutputLine::normal(""));
    }

    /// Runs one raw input line to completion.
    ///
    /// Blank input produces nothing. Otherwise the input is echoed, then at
    /// most one result line follows, styled by whether the command failed.
    pub fn execute(&mut self, input: &str, sink: &mut dyn OutputSink) -> Option<ModeSwitch> {
        let command = CommandLine::parse(input)?;
        sink.push(OutputLine::echo(input));

        let result = match Builtin::lookup(command.name) {
            Some(builtin) => {
                debug!("Dispatching {} with {:?}", builtin, command.args);
                builtins::run(builtin, &mut self.session, &command.args)
            }
            None => Err(ShellError::CommandNotFound {
                name: command.name.to_string(),
            }),
        };

        match result {
            Ok(Reply::Nothing) => None,
            Ok(Reply::Text(text)) => {
                if !text.is_empty() {
                    sink.push(OutputLine::normal(text));
                }
                None
            }
            Ok(Reply::LaunchGame) => {
                info!("Command {} requested the game", command.name);
                Some(ModeSwitch::LaunchGame)
            }
            Err(error) => {
                debug!("Command {} failed: {:?}", command.name, error);
                sink.push(OutputLine::error(error.to_string()));
                None
            }
        }
    }
}
