use std::io::BufRead;

use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::output::{OutputLine, OutputSink};

use super::{Keys, World};

pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;
/// One minute of simulation at 60 frames per second.
pub const MAX_FRAMES_PER_LINE: u32 = 3600;

#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub width: f64,
    pub height: f64,
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub frames: u64,
}

/// Takes over the input stream until the player quits, then gives it back.
pub trait GameSubsystem {
    fn run(
        &mut self,
        input: &mut dyn BufRead,
        sink: &mut dyn OutputSink,
    ) -> Result<GameSummary, GameError>;
}

/// One parsed line of game input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameInput {
    Quit,
    Hold { keys: Keys, frames: u32 },
}

impl GameInput {
    fn parse(line: &str) -> Result<Self, String> {
        let mut keys = Keys::default();
        let mut frames = 1;
        for token in line.split_whitespace() {
            match token.to_ascii_lowercase().as_str() {
                "esc" | "escape" | "q" | "quit" | "exit" => return Ok(GameInput::Quit),
                "left" | "a" | "h" => keys.left = true,
                "right" | "d" | "l" => keys.right = true,
                "jump" | "space" | "w" | "k" => keys.jump = true,
                other => {
                    frames = other
                        .parse::<u32>()
                        .map_err(|_| format!("Unknown key: {token}"))?;
                    if frames > MAX_FRAMES_PER_LINE {
                        return Err(format!(
                            "Too many frames: {frames} (at most {MAX_FRAMES_PER_LINE})"
                        ));
                    }
                }
            }
        }
        Ok(GameInput::Hold { keys, frames })
    }
}

/// Line-driven front end for [`World`].
///
/// Each line names the keys held and optionally how many frames to hold
/// them for; a status line follows every advance.
#[derive(Debug, Clone, Default)]
pub struct TerminalGame {
    settings: GameSettings,
}

impl TerminalGame {
    pub fn new(settings: GameSettings) -> Self {
        TerminalGame { settings }
    }

    fn status(world: &World) -> String {
        let player = world.player();
        format!(
            "x={:.0} y={:.0} score={}",
            player.x,
            world.altitude(),
            world.score()
        )
    }
}

impl GameSubsystem for TerminalGame {
    fn run(
        &mut self,
        input: &mut dyn BufRead,
        sink: &mut dyn OutputSink,
    ) -> Result<GameSummary, GameError> {
        let mut world = World::new(self.settings.width, self.settings.height, self.settings.seed);
        let mut frames = 0u64;
        info!("Game started");
        sink.push(OutputLine::title("MARIO"));
        sink.push(OutputLine::normal(
            "Keys: left/a, right/d, jump/space, optional frame count. esc to quit.",
        ));

        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if input.read_until(b'\n', &mut buffer).context(ReadSnafu)? == 0 {
                debug!("Input ended while the game was running");
                break;
            }

            match GameInput::parse(&String::from_utf8_lossy(&buffer)) {
                Ok(GameInput::Quit) => break,
                Ok(GameInput::Hold { keys, frames: count }) => {
                    for _ in 0..count {
                        world.step(keys);
                    }
                    world.release_keys();
                    frames += u64::from(count);
                    sink.push(OutputLine::normal(Self::status(&world)));
                }
                Err(message) => sink.push(OutputLine::error(message)),
            }
        }

        let summary = GameSummary {
            score: world.score(),
            frames,
        };
        info!("Game ended after {} frames", summary.frames);
        sink.push(OutputLine::normal(format!(
            "Game over. Score: {}",
            summary.score
        )));
        Ok(summary)
    }
}

#[derive(Debug, Snafu)]
pub enum GameError {
    #[snafu(display("Failed to read game input"))]
    ReadError { source: std::io::Error },
}
