pub mod alphabeta;
pub mod eval;
pub mod order;
mod qsearch;
pub mod time;
pub mod tt;

pub use alphabeta::{SearchResult, Searcher};
pub use eval::{Evaluator, PstEvaluator};
