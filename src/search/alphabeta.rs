use log::{debug, info, trace, warn};
use std::time::{Duration, Instant};

use crate::board::CozyPosition;
use crate::config::{EngineConfig, SearchParams};
use crate::position::{GamePosition, MoveGuard, MoveMeta, NullGuard};
use crate::search::eval::{is_mate_score, mated_in, Evaluator, PstEvaluator, DRAW_SCORE, INFINITY, MATE_SCORE, MAX_PLY};
use crate::search::order::MoveOrderer;
use crate::search::time::TimeManager;
use crate::search::tt::{Bound, Entry, Tt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult<M> {
    pub best_move: Option<M>,
    /// Score of `best_move` from the root mover's perspective.
    pub score: i32,
    /// Deepest completed iteration (0 if none completed).
    pub depth: u32,
    pub nodes: u64,
}

/// Mate scores are stored relative to the node, not the root.
fn score_to_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_SCORE - MAX_PLY as i32 {
        score + ply as i32
    } else if score <= -(MATE_SCORE - MAX_PLY as i32) {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_SCORE - MAX_PLY as i32 {
        score - ply as i32
    } else if score <= -(MATE_SCORE - MAX_PLY as i32) {
        score + ply as i32
    } else {
        score
    }
}

/// Iterative-deepening alpha-beta searcher. Owns its transposition table and
/// ordering heuristics, which persist across `think` calls until `clear`.
pub struct Searcher<P: GamePosition, E> {
    pub(super) params: SearchParams,
    pub(super) evaluator: E,
    pub(super) tt: Tt<P::Move>,
    pub(super) orderer: MoveOrderer<P::Move>,
    pub(super) time: TimeManager,
    pub(super) nodes: u64,
    pub(super) stopped: bool,
}

impl Searcher<CozyPosition, PstEvaluator> {
    pub fn new(config: EngineConfig) -> Self { Self::with_evaluator(config.search, PstEvaluator::new(config.eval)) }
}

impl Default for Searcher<CozyPosition, PstEvaluator> {
    fn default() -> Self { Self::new(EngineConfig::default()) }
}

impl<P: GamePosition, E: Evaluator<P>> Searcher<P, E> {
    pub fn with_evaluator(params: SearchParams, evaluator: E) -> Self {
        Self {
            params,
            evaluator,
            tt: Tt::with_capacity_entries(params.tt_capacity_entries),
            orderer: MoveOrderer::new(&params),
            time: TimeManager::unlimited(),
            nodes: 0,
            stopped: false,
        }
    }

    pub fn params(&self) -> &SearchParams { &self.params }

    pub fn evaluator(&self) -> &E { &self.evaluator }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 { self.nodes }

    pub fn tt_probe(&self, key: u64) -> Option<Entry<P::Move>> { self.tt.probe(key) }

    /// Restart the tie-break generator, e.g. to vary play between games.
    pub fn reseed(&mut self, seed: u64) { self.orderer.reseed(seed); }

    /// Forget everything learned so far (new game).
    pub fn clear(&mut self) {
        self.tt.clear();
        self.orderer.clear();
    }

    /// Best move for the side to move within the time budget. `None` only
    /// when the position has no legal moves.
    pub fn choose_move(&mut self, pos: &mut P, remaining: Duration) -> Option<P::Move> {
        self.think(pos, remaining).best_move
    }

    pub fn think(&mut self, pos: &mut P, remaining: Duration) -> SearchResult<P::Move> {
        let time = TimeManager::new(remaining, &self.params);
        self.iterate(pos, time, self.params.max_depth)
    }

    /// Fixed-depth search with no deadline (node cap still applies).
    pub fn search_depth(&mut self, pos: &mut P, depth: u32) -> SearchResult<P::Move> {
        self.iterate(pos, TimeManager::unlimited(), depth)
    }

    fn iterate(&mut self, pos: &mut P, time: TimeManager, max_depth: u32) -> SearchResult<P::Move> {
        self.time = time;
        self.nodes = 0;
        self.stopped = false;
        self.tt.bump_generation();

        let root_moves = pos.legal_moves(false);
        let mut result = SearchResult { best_move: None, score: 0, depth: 0, nodes: 0 };
        if root_moves.is_empty() {
            result.score = if pos.is_in_check() { mated_in(0) } else { DRAW_SCORE };
            return result;
        }
        // Legal before any iteration completes.
        let fallback = self.orderer.order(root_moves.clone(), pos, None, 0);
        result.best_move = fallback.first().copied();
        result.score = self.evaluator.evaluate(pos);
        if root_moves.len() == 1 {
            info!("single legal move, returning without search");
            return result;
        }

        let mut last_iter = Duration::ZERO;
        for depth in 1..=max_depth.clamp(1, MAX_PLY - 1) {
            if depth > 1 && !self.time.can_start_iteration(last_iter) { break; }
            let started = Instant::now();
            let (score, best) = self.search_root(pos, &root_moves, depth, result.best_move);
            if self.stopped {
                trace!("depth {depth} cancelled after {} nodes, keeping depth {}", self.nodes, result.depth);
                break;
            }
            last_iter = started.elapsed();
            result.best_move = best.or(result.best_move);
            result.score = score;
            result.depth = depth;
            debug!(
                "depth {depth} score {score} nodes {} time {:?} best {:?}",
                self.nodes,
                self.time.elapsed(),
                result.best_move
            );
            if is_mate_score(score) { break; }
        }
        result.nodes = self.nodes;
        info!(
            "chose {:?} score {} depth {} nodes {} in {:?}",
            result.best_move,
            result.score,
            result.depth,
            result.nodes,
            self.time.elapsed()
        );
        result
    }

    fn search_root(&mut self, pos: &mut P, moves: &[P::Move], depth: u32, hint: Option<P::Move>) -> (i32, Option<P::Move>) {
        let key = pos.position_key();
        let tt_move = if self.params.use_tt { self.tt.probe(key).and_then(|e| e.best) } else { None };
        let ordered = self.orderer.order(moves.to_vec(), pos, hint.or(tt_move), 0);

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_score = -INFINITY;
        let mut best = None;
        for mv in ordered {
            let score = {
                let mut child = MoveGuard::new(pos, mv);
                -self.negamax(&mut *child, depth - 1, -beta, -alpha, 1)
            };
            if self.stopped { return (0, best); }
            if score > best_score {
                best_score = score;
                best = Some(mv);
            }
            alpha = alpha.max(score);
        }
        if self.params.use_tt {
            self.tt.store(Entry { key, depth, score: best_score, best, bound: Bound::Exact, gen: 0 });
        }
        (best_score, best)
    }

    /// Sets `stopped` once the deadline or node cap is hit.
    pub(super) fn check_stop(&mut self) -> bool {
        if self.stopped { return true; }
        if self.params.max_nodes.map_or(false, |cap| self.nodes >= cap) {
            self.stopped = true;
        } else if self.time.should_poll(self.nodes) && self.time.hard_expired() {
            self.stopped = true;
        }
        self.stopped
    }

    /// Fail-soft negamax. Returns 0 once `stopped` is set; callers must
    /// discard that value.
    fn negamax(&mut self, pos: &mut P, depth: u32, mut alpha: i32, mut beta: i32, ply: u32) -> i32 {
        if depth == 0 || ply >= MAX_PLY - 1 { return self.quiesce(pos, alpha, beta, ply, 0); }
        if self.check_stop() { return 0; }
        self.nodes += 1;
        if pos.is_checkmate() { return mated_in(ply); }
        if pos.is_draw() { return DRAW_SCORE; }

        let key = pos.position_key();
        let mut tt_move = None;
        if self.params.use_tt {
            if let Some(e) = self.tt.probe(key) {
                tt_move = e.best;
                if e.usable_at(depth) {
                    let score = score_from_tt(e.score, ply);
                    match e.bound {
                        Bound::Exact => return score,
                        Bound::Lower => alpha = alpha.max(score),
                        Bound::Upper => beta = beta.min(score),
                    }
                    if alpha >= beta { return score; }
                }
            }
        }

        let in_check = pos.is_in_check();
        if self.params.use_reverse_futility && !in_check && depth <= 2 && !is_mate_score(beta) {
            let stat = self.evaluator.evaluate(pos);
            if stat - self.params.reverse_futility_margin * depth as i32 >= beta { return stat; }
        }

        if self.params.use_null_move && !in_check && depth >= 3 && !is_mate_score(beta) {
            let r = 2 + depth / 4;
            let null_score = NullGuard::try_new(pos)
                .map(|mut null| -self.negamax(&mut *null, depth.saturating_sub(1 + r), -beta, -beta + 1, ply + 1));
            if self.stopped { return 0; }
            if let Some(score) = null_score {
                if score >= beta { return if is_mate_score(score) { beta } else { score }; }
            }
        }

        let moves = pos.legal_moves(false);
        if moves.is_empty() {
            warn!("position has no legal moves but was not reported as mate or draw");
            debug_assert!(false, "empty move list at a non-terminal node");
            return if in_check { mated_in(ply) } else { DRAW_SCORE };
        }
        let ordered = self.orderer.order(moves, pos, tt_move, ply);

        let (alpha_start, beta_start) = (alpha, beta);
        let mut best_score = -INFINITY;
        let mut best_move = None;
        for (i, mv) in ordered.into_iter().enumerate() {
            let score = {
                let mut child = MoveGuard::new(pos, mv);
                let reduce =
                    self.params.use_lmr && depth >= 3 && i >= 3 && mv.is_quiet() && !in_check && !child.is_in_check();
                if reduce {
                    let reduced = -self.negamax(&mut *child, depth - 2, -alpha - 1, -alpha, ply + 1);
                    if reduced > alpha && !self.stopped {
                        -self.negamax(&mut *child, depth - 1, -beta, -alpha, ply + 1)
                    } else {
                        reduced
                    }
                } else {
                    -self.negamax(&mut *child, depth - 1, -beta, -alpha, ply + 1)
                }
            };
            if self.stopped { return 0; }
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                self.orderer.record_cutoff(mv, ply, depth);
                break;
            }
        }

        if self.params.use_tt {
            let bound = if best_score <= alpha_start {
                Bound::Upper
            } else if best_score >= beta_start {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(Entry { key, depth, score: score_to_tt(best_score, ply), best: best_move, bound, gen: 0 });
        }
        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_scores_round_trip_through_tt_at_any_ply() {
        for ply in [0, 1, 7, 40] {
            for s in [MATE_SCORE - 3, -MATE_SCORE + 9, 250, -40] {
                assert_eq!(score_from_tt(score_to_tt(s, ply), ply), s);
            }
        }
    }

    #[test]
    fn mate_distance_is_node_relative_in_tt() {
        // Mated at ply 5, stored at ply 3: two plies from the stored node.
        assert_eq!(score_to_tt(mated_in(5), 3), mated_in(2));
        // Read back at ply 6 it is two plies further on.
        assert_eq!(score_from_tt(mated_in(2), 6), mated_in(8));
    }
}
