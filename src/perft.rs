use crate::position::{GamePosition, MoveGuard};

/// Leaf count of the legal move tree to `depth`, walked with make/undo.
pub fn perft<P: GamePosition>(pos: &mut P, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = pos.legal_moves(false);
    if depth == 1 { return moves.len() as u64; }
    let mut nodes = 0u64;
    for mv in moves {
        let mut child = MoveGuard::new(pos, mv);
        nodes += perft(&mut *child, depth - 1);
    }
    nodes
}

/// Per-root-move counts, for locating movegen disagreements.
pub fn divide<P: GamePosition>(pos: &mut P, depth: u32) -> Vec<(P::Move, u64)> {
    let moves = pos.legal_moves(false);
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        let mut child = MoveGuard::new(pos, mv);
        out.push((mv, perft(&mut *child, depth.saturating_sub(1))));
    }
    out
}
