//! Game configuration.
//!
//! The engine is parameterized at reset time by the list of faces and the
//! starting countdown. The remaining fields carry the fixed rule constants
//! so a presentation layer can read them instead of duplicating them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Symbol table the standard game draws its faces from.
pub const DEFAULT_FACES: [&str; 8] = [
    "\u{1F34E}",        // apple
    "\u{1F697}",        // car
    "\u{1F436}",        // dog
    "\u{26BD}\u{FE0F}", // soccer ball
    "\u{1F3B5}",        // note
    "\u{1F31F}",        // star
    "\u{1F369}",        // doughnut
    "\u{1F98B}",        // butterfly
];

/// Pairs dealt in the standard game.
pub const UNIQUE_PAIRS: usize = 6;

/// Points awarded for a match.
pub const MATCH_BONUS: u32 = 10;

/// Seconds deducted for a mismatch.
pub const MISMATCH_PENALTY_SECS: u32 = 5;

/// How long a mismatched pair stays face-up.
pub const FLIP_BACK_DELAY_MS: u64 = 800;

/// How long a score/time delta stays visible.
pub const DELTA_DISPLAY_MS: u64 = 900;

/// Countdown period.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Countdown at the start of a game.
pub const STARTING_TIME_SECS: u32 = 60;

/// Game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Distinct faces; the deck holds two cards per face.
    pub faces: Vec<String>,

    /// Countdown at reset, in seconds.
    pub starting_time_secs: u32,

    /// Score added per match.
    pub match_bonus: u32,

    /// Seconds removed per mismatch (clamped at zero).
    pub mismatch_penalty_secs: u32,

    /// Delay before a mismatched pair flips back.
    pub flip_back_delay_ms: u64,

    /// Lifetime of `last_score_delta` / `last_time_delta`.
    pub delta_display_ms: u64,

    /// Wall-clock period between `tick` calls in the real-time driver.
    ///
    /// Every tick removes one second of countdown regardless of this value,
    /// so anything other than 1000 runs the countdown faster or slower than
    /// real time. Meant for tests and demos.
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GameConfig {
    /// The standard game: six pairs, sixty seconds.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_faces(DEFAULT_FACES[..UNIQUE_PAIRS].iter().copied())
    }

    /// Standard rules with a custom face list.
    pub fn with_faces<I, S>(faces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            faces: faces.into_iter().map(Into::into).collect(),
            starting_time_secs: STARTING_TIME_SECS,
            match_bonus: MATCH_BONUS,
            mismatch_penalty_secs: MISMATCH_PENALTY_SECS,
            flip_back_delay_ms: FLIP_BACK_DELAY_MS,
            delta_display_ms: DELTA_DISPLAY_MS,
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }

    /// Set the starting countdown.
    #[must_use]
    pub fn with_starting_time(mut self, secs: u32) -> Self {
        self.starting_time_secs = secs;
        self
    }

    /// Set the flip-back delay.
    #[must_use]
    pub fn with_flip_back_delay(mut self, ms: u64) -> Self {
        self.flip_back_delay_ms = ms;
        self
    }

    /// Set the real-time period of one countdown second.
    #[must_use]
    pub fn with_tick_interval(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Set the delta display window.
    #[must_use]
    pub fn with_delta_display(mut self, ms: u64) -> Self {
        self.delta_display_ms = ms;
        self
    }

    /// Number of pairs in the deck.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.faces.len()
    }

    /// Check the values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take standard values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
