//! Real-time driver.
//!
//! Wires the engine to wall-clock time with tokio: a countdown interval
//! calls `tick`, a sleep wakes the engine for its next deferred task, and
//! player input arrives on a command channel. Every change is published as a
//! fresh `GameState` on a watch channel and as events on a broadcast channel.
//!
//! ```no_run
//! use memory_match::core::GameConfig;
//! use memory_match::driver::spawn_session;
//!
//! # async fn run() -> Result<(), memory_match::driver::SessionError> {
//! let session = spawn_session(GameConfig::standard(), 42);
//! let first = session.current().deck[0].id;
//! session.select(first).await?;
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod session;

pub use session::{spawn_session, spawn_with_game, Command, SessionError, SessionHandle};
