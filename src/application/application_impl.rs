use std::io::{self, BufRead, IsTerminal};

use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{ShellConfig, ShellConfigError};
use crate::game::{GameError, GameSubsystem, TerminalGame};
use crate::interpreter::{ModeSwitch, Shell};
use crate::output::{OutputSink, TerminalSink};
use crate::session::Session;

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let mut config = match &runtime_config.config {
            Some(path) => ShellConfig::read(path).await.context(ConfigSnafu)?,
            None => {
                debug!("No config file given, using the built-in tree");
                ShellConfig::default()
            }
        };
        if runtime_config.seed.is_some() {
            config.game.seed = runtime_config.seed;
        }
        debug!("Loaded config: {:?}", config);

        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        let mut sink = TerminalSink::stdout(runtime_config.color, interactive);
        let mut shell = Shell::new(Session::new(config.tree));
        let mut game = TerminalGame::new(config.game);

        info!("Starting session (interactive: {})", interactive);
        shell.banner(&mut sink);
        Self::serve(&mut shell, &mut game, &mut stdin.lock(), &mut sink)
    }

    /// Feeds input lines to the shell until the input ends, handing the
    /// stream to `game` whenever the shell asks for it.
    pub fn serve(
        shell: &mut Shell,
        game: &mut dyn GameSubsystem,
        input: &mut dyn BufRead,
        sink: &mut dyn OutputSink,
    ) -> Result<(), ApplicationError> {
        let mut buffer = Vec::new();
        loop {
            sink.prompt(shell.session().cwd());
            buffer.clear();
            if input.read_until(b'\n', &mut buffer).context(InputSnafu)? == 0 {
                info!("Input closed, ending session");
                return Ok(());
            }

            // Invalid UTF-8 becomes U+FFFD.
            let line = String::from_utf8_lossy(&buffer);
            let raw = line.trim_end_matches(['\r', '\n']);
            if let Some(ModeSwitch::LaunchGame) = shell.execute(raw, sink) {
                info!("Handing input over to the game");
                let summary = game.run(input, sink).context(GameSnafu)?;
                info!(
                    "Game returned control after {} frames with score {}",
                    summary.frames, summary.score
                );
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ShellConfigError },
    #[snafu(display("Failed to read from standard input"))]
    InputError { source: io::Error },
    #[snafu(display("Critical failure encountered while the game was running"))]
    GameError { source: GameError },
}
