//! Iterative-deepening alpha-beta chess search.
//!
//! The engine searches any position implementing [`position::GamePosition`];
//! [`board::CozyPosition`] is the cozy-chess backed implementation used by
//! the binary, tests and benches.

pub mod board;
pub mod config;
pub mod error;
pub mod perft;
pub mod position;
pub mod search;

pub use board::{CozyMove, CozyPosition};
pub use config::{EngineConfig, EvalParams, SearchParams};
pub use error::{EngineError, Result};
pub use position::{GamePosition, MoveGuard, MoveMeta, PieceBoard};
pub use search::{Evaluator, PstEvaluator, SearchResult, Searcher};
