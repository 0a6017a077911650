use cozy_chess::{get_bishop_moves, get_knight_moves, get_rook_moves, BitBoard, Color, Piece, Square};

use crate::config::EvalParams;
use crate::position::PieceBoard;

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

// Mate scoring helpers
pub const MATE_SCORE: i32 = 30_000;
pub const DRAW_SCORE: i32 = 0;
pub const INFINITY: i32 = MATE_SCORE + 1;
pub const MAX_PLY: u32 = 128;

/// Score of a forced mate (for either side) found within `MAX_PLY`.
pub fn is_mate_score(score: i32) -> bool { score.abs() >= MATE_SCORE - MAX_PLY as i32 }

/// Score for the side to move when it is checkmated `ply` plies from the root.
/// Closer mates are worse for the mated side, so shorter wins are preferred.
pub fn mated_in(ply: u32) -> i32 { -MATE_SCORE + ply as i32 }

pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => 0,
    }
}

/// Static scoring of a quiet position, from the side to move's perspective.
/// Terminal positions are scored by the search, never here.
pub trait Evaluator<P> {
    fn evaluate(&self, pos: &P) -> i32;
}

const PHASE_MAX: i32 = 24;
const ENDGAME_MATERIAL_START: i32 = 1750;
const SHIELD_BONUS: i32 = 12;
const MOP_UP_MARGIN: i32 = 200;

// Tables are laid out a8..h8 first, as printed. White reads `sq ^ 56`.
#[rustfmt::skip]
const PAWN_MG: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];
#[rustfmt::skip]
const PAWN_EG: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    80, 80, 80, 80, 80, 80, 80, 80,
    50, 50, 50, 50, 50, 50, 50, 50,
    30, 30, 30, 30, 30, 30, 30, 30,
    20, 20, 20, 20, 20, 20, 20, 20,
    10, 10, 10, 10, 10, 10, 10, 10,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
];
#[rustfmt::skip]
const KNIGHT_MG: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];
#[rustfmt::skip]
const KNIGHT_EG: [i32; 64] = [
   -40,-30,-20,-20,-20,-20,-30,-40,
   -30,-15,  0,  0,  0,  0,-15,-30,
   -20,  0, 10, 12, 12, 10,  0,-20,
   -20,  5, 12, 16, 16, 12,  5,-20,
   -20,  0, 12, 16, 16, 12,  0,-20,
   -20,  5, 10, 12, 12, 10,  5,-20,
   -30,-15,  0,  5,  5,  0,-15,-30,
   -40,-30,-20,-20,-20,-20,-30,-40,
];
#[rustfmt::skip]
const BISHOP_MG: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];
#[rustfmt::skip]
const BISHOP_EG: [i32; 64] = [
   -15,-10, -5, -5, -5, -5,-10,-15,
   -10,  0,  0,  0,  0,  0,  0,-10,
    -5,  0,  5,  8,  8,  5,  0, -5,
    -5,  0,  8, 12, 12,  8,  0, -5,
    -5,  0,  8, 12, 12,  8,  0, -5,
    -5,  0,  5,  8,  8,  5,  0, -5,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -15,-10, -5, -5, -5, -5,-10,-15,
];
#[rustfmt::skip]
const ROOK_MG: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];
#[rustfmt::skip]
const ROOK_EG: [i32; 64] = [
     5,  5,  5,  5,  5,  5,  5,  5,
    10, 10, 10, 10, 10, 10, 10, 10,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
];
#[rustfmt::skip]
const QUEEN_MG: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
    -5,  0,  5,  5,  5,  5,  0, -5,
   -10,  0,  5,  5,  5,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];
#[rustfmt::skip]
const QUEEN_EG: [i32; 64] = [
   -10, -5, -5, -5, -5, -5, -5,-10,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  5,  8,  8,  5,  0, -5,
    -5,  0,  8, 10, 10,  8,  0, -5,
    -5,  0,  8, 10, 10,  8,  0, -5,
    -5,  0,  5,  8,  8,  5,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
   -10, -5, -5, -5, -5, -5, -5,-10,
];
#[rustfmt::skip]
const KING_MG: [i32; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];
#[rustfmt::skip]
const KING_EG: [i32; 64] = [
   -50,-40,-30,-20,-20,-30,-40,-50,
   -30,-20,-10,  0,  0,-10,-20,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-30,  0,  0,  0,  0,-30,-30,
   -50,-30,-30,-30,-30,-30,-30,-50,
];

// 10 * d^1.5 for Chebyshev distances 0..=7
const PROXIMITY_PENALTY: [i32; 8] = [0, 10, 28, 52, 80, 112, 147, 185];

const PIECES: [Piece; 6] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];

fn tables(piece: Piece) -> (&'static [i32; 64], &'static [i32; 64]) {
    match piece {
        Piece::Pawn => (&PAWN_MG, &PAWN_EG),
        Piece::Knight => (&KNIGHT_MG, &KNIGHT_EG),
        Piece::Bishop => (&BISHOP_MG, &BISHOP_EG),
        Piece::Rook => (&ROOK_MG, &ROOK_EG),
        Piece::Queen => (&QUEEN_MG, &QUEEN_EG),
        Piece::King => (&KING_MG, &KING_EG),
    }
}

/// Index into an a8-first table for `color`'s piece on `sq`.
fn table_index(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq as usize ^ 56,
        Color::Black => sq as usize,
    }
}

/// Rank counted from `color`'s own back rank (0..=7).
fn relative_rank(color: Color, sq: Square) -> i32 {
    let r = sq.rank() as i32;
    if color == Color::White { r } else { 7 - r }
}

fn file_rank(sq: Square) -> (i32, i32) { (sq.file() as i32, sq.rank() as i32) }

fn chebyshev(a: Square, b: Square) -> usize {
    let (af, ar) = file_rank(a);
    let (bf, br) = file_rank(b);
    (af - bf).abs().max((ar - br).abs()) as usize
}

fn center_distance(sq: Square) -> i32 {
    let (f, r) = file_rank(sq);
    (3 - f).max(f - 4) + (3 - r).max(r - 4)
}

fn count<P: PieceBoard>(pos: &P, color: Color, piece: Piece) -> i32 { pos.pieces(color, piece).len() as i32 }

fn non_pawn_material<P: PieceBoard>(pos: &P, color: Color) -> i32 {
    count(pos, color, Piece::Knight) * KNIGHT
        + count(pos, color, Piece::Bishop) * BISHOP
        + count(pos, color, Piece::Rook) * ROOK
        + count(pos, color, Piece::Queen) * QUEEN
}

fn material<P: PieceBoard>(pos: &P, color: Color) -> i32 {
    non_pawn_material(pos, color) + count(pos, color, Piece::Pawn) * PAWN
}

/// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_balance<P: PieceBoard>(pos: &P) -> i32 { material(pos, Color::White) - material(pos, Color::Black) }

/// 24 with all minor/major pieces on the board, 0 with none.
pub fn game_phase<P: PieceBoard>(pos: &P) -> i32 {
    let mut phase = 0;
    for color in [Color::White, Color::Black] {
        phase += count(pos, color, Piece::Knight) + count(pos, color, Piece::Bishop);
        phase += 2 * count(pos, color, Piece::Rook) + 4 * count(pos, color, Piece::Queen);
    }
    phase.min(PHASE_MAX)
}

/// Material plus blended piece-square tables, with optional king safety,
/// mobility and endgame-driving terms.
#[derive(Clone, Copy, Debug, Default)]
pub struct PstEvaluator {
    pub params: EvalParams,
}

impl PstEvaluator {
    pub fn new(params: EvalParams) -> Self { Self { params } }

    /// (midgame, endgame) score for one color.
    fn side_terms<P: PieceBoard>(&self, pos: &P, color: Color) -> (i32, i32) {
        let mut mg = 0;
        let mut eg = 0;
        for piece in PIECES {
            let (mg_table, eg_table) = tables(piece);
            let value = piece_value(piece);
            for sq in pos.pieces(color, piece) {
                let idx = table_index(color, sq);
                mg += value + mg_table[idx];
                eg += value + eg_table[idx];
            }
        }
        if self.params.king_safety { mg += self.pawn_shield(pos, color); }
        if self.params.mobility {
            let m = self.mobility(pos, color);
            mg += m;
            eg += m;
        }
        (mg, eg)
    }

    fn pawn_shield<P: PieceBoard>(&self, pos: &P, color: Color) -> i32 {
        let king = pos.king_square(color);
        let pawns = pos.pieces(color, Piece::Pawn);
        let (kf, kr) = file_rank(king);
        let dir = if color == Color::White { 1 } else { -1 };
        let mut shield = 0;
        for df in -1..=1 {
            for step in 1..=2 {
                let (f, r) = (kf + df, kr + dir * step);
                if !(0..8).contains(&f) || !(0..8).contains(&r) { continue; }
                if pawns.has(Square::index((r * 8 + f) as usize)) { shield += 1; }
            }
        }
        shield * SHIELD_BONUS
    }

    fn mobility<P: PieceBoard>(&self, pos: &P, color: Color) -> i32 {
        let occ = pos.occupied();
        let own = PIECES.iter().fold(BitBoard::EMPTY, |acc, &p| acc | pos.pieces(color, p));
        let mut score = 0;
        for sq in pos.pieces(color, Piece::Knight) { score += 4 * (get_knight_moves(sq) & !own).len() as i32; }
        for sq in pos.pieces(color, Piece::Bishop) { score += 5 * (get_bishop_moves(sq, occ) & !own).len() as i32; }
        for sq in pos.pieces(color, Piece::Rook) { score += 2 * (get_rook_moves(sq, occ) & !own).len() as i32; }
        for sq in pos.pieces(color, Piece::Queen) {
            let reach = get_bishop_moves(sq, occ) | get_rook_moves(sq, occ);
            score += (reach & !own).len() as i32;
        }
        score
    }

    /// Drive pieces toward the enemy king and pawns toward promotion as the
    /// enemy runs out of pieces.
    fn endgame_bonus<P: PieceBoard>(&self, pos: &P, color: Color) -> i32 {
        let enemy = !color;
        let enemy_npm = non_pawn_material(pos, enemy).min(ENDGAME_MATERIAL_START);
        let weight = ENDGAME_MATERIAL_START - enemy_npm;
        if weight <= 0 { return 0; }
        let enemy_king = pos.king_square(enemy);
        let (ekf, ekr) = file_rank(enemy_king);
        let mut bonus = 0;
        for sq in pos.pieces(color, Piece::Pawn) { bonus += 50 - 10 * (7 - relative_rank(color, sq)); }
        for sq in pos.pieces(color, Piece::Rook) {
            let (f, r) = file_rank(sq);
            bonus += 50 - 10 * (f - ekf).abs().min((r - ekr).abs());
        }
        for piece in [Piece::Knight, Piece::Bishop, Piece::Queen, Piece::King] {
            for sq in pos.pieces(color, piece) { bonus += 50 - PROXIMITY_PENALTY[chebyshev(sq, enemy_king)]; }
        }
        if material(pos, color) - material(pos, enemy) >= MOP_UP_MARGIN {
            bonus += 10 * center_distance(enemy_king);
        }
        bonus * weight / ENDGAME_MATERIAL_START
    }

    /// White-minus-Black score before orienting to the side to move.
    pub fn white_relative<P: PieceBoard>(&self, pos: &P) -> i32 {
        let phase = game_phase(pos);
        let (wmg, weg) = self.side_terms(pos, Color::White);
        let (bmg, beg) = self.side_terms(pos, Color::Black);
        let mg = wmg - bmg;
        let eg = weg - beg;
        let mut score = (mg * phase + eg * (PHASE_MAX - phase)) / PHASE_MAX;
        if self.params.endgame_bonus {
            score += self.endgame_bonus(pos, Color::White) - self.endgame_bonus(pos, Color::Black);
        }
        score
    }
}

impl<P: PieceBoard> Evaluator<P> for PstEvaluator {
    fn evaluate(&self, pos: &P) -> i32 {
        let score = self.white_relative(pos);
        if pos.side_to_move() == Color::White { score } else { -score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_left_right_symmetric() {
        for (mg, eg) in PIECES.iter().map(|&p| tables(p)) {
            for t in [mg, eg] {
                for r in 0..8 {
                    for f in 0..4 { assert_eq!(t[r * 8 + f], t[r * 8 + 7 - f], "asymmetric at rank {r} file {f}"); }
                }
            }
        }
    }

    #[test]
    fn table_index_mirrors_ranks() {
        assert_eq!(table_index(Color::White, Square::E2), table_index(Color::Black, Square::E7));
        assert_eq!(table_index(Color::White, Square::A8), 0);
        assert_eq!(table_index(Color::Black, Square::A1), 0);
    }

    #[test]
    fn mate_scores_are_recognized() {
        assert!(is_mate_score(mated_in(3)));
        assert!(is_mate_score(-mated_in(3)));
        assert!(!is_mate_score(QUEEN * 3));
        assert!(mated_in(1) < mated_in(5), "shorter mates must be worse for the mated side");
    }
}
