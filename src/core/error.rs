//! Error types.
//!
//! Engine operations are total and never fail; errors only arise at the
//! edges, when loading configuration or decoding a snapshot.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate a [`GameConfig`](super::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Failure to decode a [`GameState`](super::GameState) snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}
