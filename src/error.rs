use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the crate's input edges (positions, moves, config).
/// The search itself never fails: running out of time degrades to the
/// deepest completed iteration instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
