//! Side-scrolling platformer that takes over input when launched from the
//! shell. Simulation only; nothing here draws.

mod terminal_game;
mod world;

pub use terminal_game::{GameError, GameSettings, GameSubsystem, GameSummary, TerminalGame};
pub use world::{Block, Coin, Facing, Keys, Player, World};
