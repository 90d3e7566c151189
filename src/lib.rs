//! # memory-match
//!
//! A memory-matching ("concentration") card game engine.
//!
//! A deck of paired symbols is dealt face-down. The player reveals two cards
//! per turn; a pair stays face-up and scores, a mismatch flips back after a
//! short delay and costs time. The game ends when every pair is found or the
//! countdown reaches zero.
//!
//! ## Design Principles
//!
//! 1. **One State Value**: Deck, counters, turn buffer, lock and transient
//!    deltas live in a single serializable `GameState`.
//!
//! 2. **No Hidden Clocks**: The engine never sleeps. Deferred transitions are
//!    scheduled tasks on a virtual clock, stamped with the deal's generation so
//!    a reset invalidates everything still pending.
//!
//! 3. **Total Operations**: Selecting an unknown, revealed or matched card, or
//!    selecting while locked, is a no-op rather than an error.
//!
//! ## Modules
//!
//! - `core`: Cards, configuration, state, RNG, errors
//! - `schedule`: Generation-keyed deferred tasks
//! - `engine`: `MemoryGame` turn resolution, countdown, events
//! - `cues`: Audio cue contract for the presentation layer
//! - `driver`: tokio real-time session
//!
//! ## Example
//!
//! ```
//! use memory_match::{GameConfig, MemoryGame, PairId, SelectOutcome};
//!
//! let mut game = MemoryGame::with_seed(GameConfig::with_faces(["a", "b"]), 1);
//! let pair: Vec<_> = game.state().pair_members(PairId::new(0)).collect();
//!
//! game.select(pair[0]);
//! assert_eq!(game.select(pair[1]), SelectOutcome::Matched(PairId::new(0)));
//! assert_eq!(game.state().score, 10);
//! ```

pub mod core;
pub mod schedule;
pub mod engine;
pub mod cues;
pub mod driver;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, PairId,
    GameConfig, ConfigError, SnapshotError,
    GameRng,
    GameState, GameOutcome, TurnBuffer,
};

pub use crate::schedule::{Generation, ScheduledTask, Scheduler, TaskId, TaskKind};

pub use crate::engine::{GameEvent, IgnoreReason, MemoryGame, SelectOutcome};

pub use crate::cues::{Cue, CueSink, NullCueSink, RecordingCueSink, Tone, Waveform};

pub use crate::driver::{spawn_session, Command, SessionError, SessionHandle};
