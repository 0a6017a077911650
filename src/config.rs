use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, Result};

/// Search knobs. Everything beyond the plain alpha-beta core is an optional,
/// independently toggled strategy layered on the same search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub max_depth: u32,
    pub max_nodes: Option<u64>,
    /// Soft budget is `remaining / time_divisor`.
    pub time_divisor: u32,
    /// Hard (in-tree) deadline is `soft * hard_limit_factor`, capped at half the clock.
    pub hard_limit_factor: u32,
    /// Skip an iteration that is predicted not to finish inside the soft budget.
    pub finish_one: bool,
    pub tm_factor: f32,
    pub tt_capacity_entries: usize,
    pub use_tt: bool,
    pub use_killers: bool,
    pub use_history: bool,
    pub use_null_move: bool,
    pub use_lmr: bool,
    pub use_reverse_futility: bool,
    pub reverse_futility_margin: i32,
    pub use_delta_pruning: bool,
    pub delta_margin: i32,
    pub max_qsearch_ply: u32,
    /// Randomize ties in move ordering (seeded, reproducible).
    pub randomize_ties: bool,
    pub seed: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_nodes: None,
            time_divisor: 40,
            hard_limit_factor: 4,
            finish_one: true,
            tm_factor: 1.9,
            tt_capacity_entries: 65_536,
            use_tt: true,
            use_killers: true,
            use_history: true,
            use_null_move: false,
            use_lmr: false,
            use_reverse_futility: false,
            reverse_futility_margin: 120,
            use_delta_pruning: true,
            delta_margin: 200,
            max_qsearch_ply: 32,
            randomize_ties: false,
            seed: 0x5EED_CAFE,
        }
    }
}

/// Toggles for the optional evaluation heuristics. Material and the blended
/// piece-square tables are always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalParams {
    pub king_safety: bool,
    pub mobility: bool,
    pub endgame_bonus: bool,
}

impl Default for EvalParams {
    fn default() -> Self { Self { king_safety: true, mobility: true, endgame_bonus: true } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchParams,
    pub eval: EvalParams,
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Pretty JSON with every field filled in; loads back unchanged.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| EngineError::ConfigIo { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text)
    }
}
