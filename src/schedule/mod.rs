//! Deferred callbacks.
//!
//! The engine never sleeps. Work that must happen later (flipping a
//! mismatched pair back, clearing a transient delta) is queued here with a
//! virtual deadline and run when the engine's clock is advanced past it.

pub mod scheduler;

pub use scheduler::{Generation, ScheduledTask, Scheduler, TaskId, TaskKind};
