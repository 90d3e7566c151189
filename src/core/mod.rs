//! Core types: cards, configuration, state, RNG, errors.
//!
//! These are the building blocks the engine mutates and the presentation
//! layer observes. Nothing here schedules or decides; see `engine` for that.

pub mod card;
pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use card::{Card, CardId, PairId};
pub use config::{GameConfig, DEFAULT_FACES, UNIQUE_PAIRS};
pub use error::{ConfigError, SnapshotError};
pub use rng::GameRng;
pub use state::{GameOutcome, GameState, TurnBuffer};
