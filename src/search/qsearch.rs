use crate::position::{GamePosition, MoveGuard, MoveMeta};
use crate::search::alphabeta::Searcher;
use crate::search::eval::{mated_in, piece_value, Evaluator, DRAW_SCORE, INFINITY, MAX_PLY};
use crate::search::time::TimeManager;

impl<P: GamePosition, E: Evaluator<P>> Searcher<P, E> {
    /// Full-window quiescence score of `pos` with no deadline.
    pub fn qsearch_eval(&mut self, pos: &mut P) -> i32 {
        self.time = TimeManager::unlimited();
        self.nodes = 0;
        self.stopped = false;
        self.quiesce(pos, -INFINITY, INFINITY, 0, 0)
    }

    /// Fail-hard capture search. In check every evasion is searched and
    /// standing pat is not allowed.
    pub(super) fn quiesce(&mut self, pos: &mut P, mut alpha: i32, beta: i32, ply: u32, qply: u32) -> i32 {
        if self.check_stop() { return 0; }
        self.nodes += 1;
        if pos.is_checkmate() { return mated_in(ply); }
        if pos.is_draw() { return DRAW_SCORE; }
        if qply >= self.params.max_qsearch_ply || ply >= MAX_PLY { return self.evaluator.evaluate(pos); }

        let (moves, stand_pat) = if pos.is_in_check() {
            (pos.legal_moves(false), None)
        } else {
            let stand = self.evaluator.evaluate(pos);
            if stand >= beta { return beta; }
            alpha = alpha.max(stand);
            (pos.legal_moves(true), Some(stand))
        };

        for mv in self.orderer.order(moves, pos, None, ply) {
            if let (Some(stand), true) = (stand_pat, self.params.use_delta_pruning) {
                let gain = mv.captured().map_or(0, piece_value);
                if mv.promotion().is_none() && stand + gain + self.params.delta_margin < alpha { continue; }
            }
            let score = {
                let mut child = MoveGuard::new(pos, mv);
                -self.quiesce(&mut *child, -beta, -alpha, ply + 1, qply + 1)
            };
            if self.stopped { return 0; }
            if score >= beta { return beta; }
            alpha = alpha.max(score);
        }
        alpha
    }
}
