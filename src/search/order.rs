//! Move ordering.
//!
//! Ranking, highest first: the priority move (previous best / TT move),
//! captures by most-valuable-victim then least-valuable-attacker, promotions
//! by promoted piece, quiet moves escaping an attacked square, then the
//! remaining quiets by killer slot and history score. Ties keep generation
//! order, or a seeded random order when tie randomization is enabled.
//! Ordering only changes how much gets pruned, never the proven score.

use cozy_chess::Piece;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;

use crate::config::SearchParams;
use crate::position::{GamePosition, MoveMeta};
use crate::search::eval::{piece_value, MAX_PLY};

const PRIORITY: i32 = 1_000_000;
const CAPTURE: i32 = 100_000;
const PROMOTION: i32 = 50_000;
const ESCAPE: i32 = 20_000;
const KILLER: [i32; 2] = [10_000, 9_000];
const HISTORY_MAX: i32 = 8_000;

/// Value used on the attacker side of MVV-LVA; the king attacks last.
fn attacker_value(piece: Piece) -> i32 {
    if piece == Piece::King { 1_000 } else { piece_value(piece) }
}

pub struct MoveOrderer<M> {
    killers: Vec<[Option<M>; 2]>,
    history: Vec<i32>,
    rng: SmallRng,
    use_killers: bool,
    use_history: bool,
    randomize: bool,
}

impl<M: MoveMeta> MoveOrderer<M> {
    pub fn new(params: &SearchParams) -> Self {
        Self {
            killers: vec![[None, None]; MAX_PLY as usize + 1],
            history: vec![0; 64 * 64],
            rng: SmallRng::seed_from_u64(params.seed),
            use_killers: params.use_killers,
            use_history: params.use_history,
            randomize: params.randomize_ties,
        }
    }

    pub fn reseed(&mut self, seed: u64) { self.rng = SmallRng::seed_from_u64(seed); }

    /// Forget killers and history (between games).
    pub fn clear(&mut self) {
        self.killers.iter_mut().for_each(|k| *k = [None, None]);
        self.history.fill(0);
    }

    fn ply_index(&self, ply: u32) -> usize { (ply as usize).min(self.killers.len() - 1) }

    fn history_index(mv: &M) -> usize { mv.from() as usize * 64 + mv.to() as usize }

    /// Heuristic priority of `mv`; higher is searched earlier.
    pub fn score<P: GamePosition<Move = M>>(&self, mv: M, pos: &P, priority: Option<M>, ply: u32) -> i32 {
        if priority == Some(mv) { return PRIORITY; }
        let promo = mv.promotion().map(piece_value).unwrap_or(0);
        if let Some(victim) = mv.captured() {
            return CAPTURE + 10 * piece_value(victim) - attacker_value(mv.piece()) + promo;
        }
        if mv.promotion().is_some() { return PROMOTION + promo; }

        let value = attacker_value(mv.piece());
        let target_attacked = pos.square_is_attacked_by_opponent(mv.to());
        if !target_attacked && pos.square_is_attacked_by_opponent(mv.from()) { return ESCAPE + value; }

        let mut score = 0;
        if self.use_killers {
            let slot = &self.killers[self.ply_index(ply)];
            if slot[0] == Some(mv) { score += KILLER[0]; } else if slot[1] == Some(mv) { score += KILLER[1]; }
        }
        if self.use_history { score += self.history[Self::history_index(&mv)]; }
        if target_attacked { score -= value; }
        score
    }

    pub fn order<P: GamePosition<Move = M>>(&mut self, moves: Vec<M>, pos: &P, priority: Option<M>, ply: u32) -> Vec<M> {
        let mut keyed: Vec<(i32, u32, M)> = Vec::with_capacity(moves.len());
        for (i, mv) in moves.into_iter().enumerate() {
            let tie = if self.randomize { self.rng.gen::<u32>() } else { i as u32 };
            keyed.push((self.score(mv, pos, priority, ply), tie, mv));
        }
        keyed.sort_by_key(|&(s, t, _)| (Reverse(s), t));
        keyed.into_iter().map(|(_, _, mv)| mv).collect()
    }

    /// A quiet move refuted the node: remember it as a killer and bump its history.
    pub fn record_cutoff(&mut self, mv: M, ply: u32, depth: u32) {
        if !mv.is_quiet() { return; }
        if self.use_killers {
            let p = self.ply_index(ply);
            let slot = &mut self.killers[p];
            if slot[0] != Some(mv) {
                slot[1] = slot[0];
                slot[0] = Some(mv);
            }
        }
        if self.use_history {
            let idx = Self::history_index(&mv);
            self.history[idx] += (depth * depth) as i32;
            if self.history[idx] > HISTORY_MAX { self.history.iter_mut().for_each(|h| *h /= 2); }
        }
    }
}
