//! Engine bindings for Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{CardId, GameConfig, GameOutcome};
use crate::engine::MemoryGame;

/// Python wrapper for MemoryGame.
///
/// The caller owns the clock: call `tick()` once per second and
/// `advance(ms)` as wall time passes so flip-backs fire.
#[pyclass(name = "MemoryGame")]
pub struct PyMemoryGame {
    game: MemoryGame,
}

#[pymethods]
impl PyMemoryGame {
    /// Create and deal a new game.
    ///
    /// # Arguments
    /// - faces: Distinct symbols; defaults to the standard six
    /// - starting_time: Countdown in seconds
    /// - seed: RNG seed for a reproducible deal
    #[new]
    #[pyo3(signature = (faces = None, starting_time = 60, seed = 42))]
    fn new(faces: Option<Vec<String>>, starting_time: u32, seed: u64) -> Self {
        let config = match faces {
            Some(faces) => GameConfig::with_faces(faces),
            None => GameConfig::standard(),
        }
        .with_starting_time(starting_time);

        Self {
            game: MemoryGame::with_seed(config, seed),
        }
    }

    /// Deal again with the same faces and starting time.
    fn reset(&mut self) {
        self.game.reset();
    }

    /// Deal again with new faces and starting time.
    fn reset_with(&mut self, faces: Vec<String>, starting_time: u32) {
        self.game.reset_with(faces, starting_time);
    }

    /// Select a card. Returns False if the selection was ignored.
    fn select(&mut self, card_id: u32) -> bool {
        !self.game.select(CardId::new(card_id)).is_ignored()
    }

    /// Count down one second.
    fn tick(&mut self) {
        self.game.tick();
    }

    /// Let `elapsed_ms` milliseconds pass.
    fn advance(&mut self, elapsed_ms: u64) {
        self.game.advance(elapsed_ms);
    }

    #[getter]
    fn score(&self) -> u32 {
        self.game.state().score
    }

    #[getter]
    fn time_left(&self) -> u32 {
        self.game.state().time_left
    }

    #[getter]
    fn locked(&self) -> bool {
        self.game.state().locked
    }

    #[getter]
    fn last_score_delta(&self) -> i32 {
        self.game.state().last_score_delta
    }

    #[getter]
    fn last_time_delta(&self) -> i32 {
        self.game.state().last_time_delta
    }

    #[getter]
    fn is_over(&self) -> bool {
        self.game.state().is_over()
    }

    /// "in_progress", "won" or "time_up".
    #[getter]
    fn outcome(&self) -> &'static str {
        match self.game.state().outcome() {
            GameOutcome::InProgress => "in_progress",
            GameOutcome::Won => "won",
            GameOutcome::TimeUp => "time_up",
        }
    }

    /// Cards in layout order as (id, pair_id, face, flipped, matched).
    fn cards(&self) -> Vec<(u32, u32, String, bool, bool)> {
        self.game
            .state()
            .deck
            .iter()
            .map(|c| (c.id.raw(), c.pair_id.raw(), c.face.clone(), c.flipped, c.matched))
            .collect()
    }

    /// Events since the last call, as JSON strings.
    fn drain_events(&mut self) -> PyResult<Vec<String>> {
        self.game
            .drain_events()
            .iter()
            .map(|e| serde_json::to_string(e).map_err(|err| PyValueError::new_err(err.to_string())))
            .collect()
    }

    fn __repr__(&self) -> String {
        let state = self.game.state();
        format!(
            "MemoryGame(score={}, time_left={}, matched={}/{}, status={})",
            state.score,
            state.time_left,
            state.matched_pairs(),
            state.card_count() / 2,
            self.outcome()
        )
    }
}
