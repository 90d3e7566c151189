//! The game engine: turn resolution, countdown and deferred transitions.
//!
//! `MemoryGame` is the only component with decision logic. It is driven by
//! player selections, clock ticks, and the advance of a virtual clock that
//! fires deferred tasks; it never blocks or spawns.
//!
//! Per-card: `hidden → revealed → {matched | hidden}`.
//! Per-turn: `Empty → OneSelected → (Match → Empty) | (Mismatch → Locked → Empty)`.

pub mod events;
pub mod game;

pub use events::{GameEvent, IgnoreReason, SelectOutcome};
pub use game::MemoryGame;
