//! Python bindings for the memory-match engine.
//!
//! Lets a Python presentation layer drive the engine directly.
//!
//! # Quick Start
//!
//! ```python
//! import memory_match as mm
//!
//! game = mm.MemoryGame(faces=["a", "b", "c"], starting_time=30, seed=7)
//! first, second = game.cards()[0][0], game.cards()[1][0]
//! game.select(first)
//! game.select(second)
//! game.advance(800)   # flip-back fires if they did not match
//! print(game.score, game.time_left, game.drain_events())
//! ```

use pyo3::prelude::*;

mod py_game;

pub use py_game::*;

/// memory_match: a memory-matching card game engine.
#[pymodule]
fn memory_match(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMemoryGame>()?;
    Ok(())
}
