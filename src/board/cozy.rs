use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves, BitBoard, Board as CozyBoard,
    Color, File, GameStatus, Move, Piece, Square,
};
use std::fmt;

use crate::error::{EngineError, Result};
use crate::position::{GamePosition, MoveMeta, PieceBoard};

/// A legal cozy-chess move plus the metadata captured at generation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CozyMove {
    mv: Move,
    moved: Piece,
    victim: Option<Piece>,
    castle: bool,
    en_passant: bool,
}

impl CozyMove {
    /// Standard UCI notation (`e1g1` for castling).
    pub fn to_uci(&self) -> String {
        if self.castle {
            let file = if self.mv.to.file() as usize > self.mv.from.file() as usize { File::G } else { File::C };
            let to = Square::new(file, self.mv.from.rank());
            return format!("{}{}", self.mv.from, to);
        }
        format!("{}", self.mv)
    }
}

impl fmt::Display for CozyMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_uci()) }
}

impl MoveMeta for CozyMove {
    fn from(&self) -> Square { self.mv.from }
    fn to(&self) -> Square { self.mv.to }
    fn piece(&self) -> Piece { self.moved }
    fn captured(&self) -> Option<Piece> { self.victim }
    fn promotion(&self) -> Option<Piece> { self.mv.promotion }
    fn is_castle(&self) -> bool { self.castle }
    fn is_en_passant(&self) -> bool { self.en_passant }
}

#[derive(Clone, Debug)]
struct Frame {
    board: CozyBoard,
    mv: Option<CozyMove>,
}

/// cozy-chess board with make/undo via a snapshot stack and a key history
/// for repetition detection.
#[derive(Clone, Debug)]
pub struct CozyPosition {
    board: CozyBoard,
    stack: Vec<Frame>,
    keys: Vec<u64>,
}

impl Default for CozyPosition {
    fn default() -> Self { Self::startpos() }
}

impl CozyPosition {
    pub fn startpos() -> Self { Self::from_board(CozyBoard::default()) }

    pub fn from_board(board: CozyBoard) -> Self {
        Self { board, stack: Vec::with_capacity(128), keys: Vec::with_capacity(256) }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen.trim(), false)
            .map(Self::from_board)
            .map_err(|e| EngineError::InvalidFen { fen: fen.to_string(), reason: format!("{e:?}") })
    }

    /// Start from `fen` (or the initial position) and play `moves` in UCI notation.
    pub fn from_moves(fen: Option<&str>, moves: &[String]) -> Result<Self> {
        let mut pos = match fen { Some(f) => Self::from_fen(f)?, None => Self::startpos() };
        for m in moves { pos.play_uci(m)?; }
        Ok(pos)
    }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    /// Find the legal move matching `uci`; accepts both `e1g1` and `e1h1` for castling.
    pub fn find_uci(&self, uci: &str) -> Option<CozyMove> {
        let uci = uci.trim();
        self.legal_moves(false).into_iter().find(|m| m.to_uci() == uci || format!("{}", m.mv) == uci)
    }

    pub fn play_uci(&mut self, uci: &str) -> Result<()> {
        let mv = self.find_uci(uci).ok_or_else(|| EngineError::IllegalMove(uci.to_string()))?;
        self.make(mv);
        Ok(())
    }

    fn is_repetition(&self) -> bool {
        let key = self.board.hash();
        let reversible = self.board.halfmove_clock() as usize;
        self.keys.iter().rev().take(reversible).any(|&k| k == key)
    }

    fn insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() { return false; }
        (b.pieces(Piece::Knight) | b.pieces(Piece::Bishop)).len() <= 1
    }

    fn has_non_pawn_material(&self, color: Color) -> bool {
        let b = &self.board;
        let minors_majors = b.pieces(Piece::Knight) | b.pieces(Piece::Bishop) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        !(minors_majors & b.colors(color)).is_empty()
    }
}

impl GamePosition for CozyPosition {
    type Move = CozyMove;

    fn legal_moves(&self, captures_only: bool) -> Vec<CozyMove> {
        let board = &self.board;
        let stm = board.side_to_move();
        let ours = board.colors(stm);
        let theirs = board.colors(!stm);
        let mut out = Vec::with_capacity(64);
        board.generate_moves(|moves| {
            let moved = moves.piece;
            for mv in moves {
                let castle = moved == Piece::King && ours.has(mv.to);
                let en_passant = moved == Piece::Pawn && mv.from.file() != mv.to.file() && !theirs.has(mv.to);
                let victim = if theirs.has(mv.to) {
                    board.piece_on(mv.to)
                } else if en_passant {
                    Some(Piece::Pawn)
                } else {
                    None
                };
                if captures_only && victim.is_none() { continue; }
                out.push(CozyMove { mv, moved, victim, castle, en_passant });
            }
            false
        });
        out
    }

    fn make(&mut self, mv: CozyMove) {
        let prev = self.board.clone();
        self.keys.push(prev.hash());
        self.board.play_unchecked(mv.mv);
        self.stack.push(Frame { board: prev, mv: Some(mv) });
    }

    fn undo(&mut self, mv: CozyMove) {
        if let Some(frame) = self.stack.pop() {
            debug_assert_eq!(frame.mv, Some(mv), "undo does not match the last move made");
            self.board = frame.board;
            self.keys.pop();
        } else {
            debug_assert!(false, "undo without a matching make");
        }
    }

    fn is_checkmate(&self) -> bool { matches!(self.board.status(), GameStatus::Won) }

    fn is_draw(&self) -> bool {
        matches!(self.board.status(), GameStatus::Drawn) || self.insufficient_material() || self.is_repetition()
    }

    fn is_in_check(&self) -> bool { !self.board.checkers().is_empty() }

    fn position_key(&self) -> u64 { self.board.hash() }

    fn square_is_attacked_by_opponent(&self, sq: Square) -> bool {
        let b = &self.board;
        let stm = b.side_to_move();
        let them = b.colors(!stm);
        let occ = b.occupied();
        let diag = (b.pieces(Piece::Bishop) | b.pieces(Piece::Queen)) & them;
        let ortho = (b.pieces(Piece::Rook) | b.pieces(Piece::Queen)) & them;
        !(get_pawn_attacks(sq, stm) & b.pieces(Piece::Pawn) & them).is_empty()
            || !(get_knight_moves(sq) & b.pieces(Piece::Knight) & them).is_empty()
            || !(get_king_moves(sq) & b.pieces(Piece::King) & them).is_empty()
            || !(get_bishop_moves(sq, occ) & diag).is_empty()
            || !(get_rook_moves(sq, occ) & ortho).is_empty()
    }

    fn make_null(&mut self) -> bool {
        if !self.has_non_pawn_material(self.board.side_to_move()) { return false; }
        match self.board.null_move() {
            Some(next) => {
                let prev = std::mem::replace(&mut self.board, next);
                self.keys.push(prev.hash());
                self.stack.push(Frame { board: prev, mv: None });
                true
            }
            None => false,
        }
    }

    fn undo_null(&mut self) {
        if let Some(frame) = self.stack.pop() {
            debug_assert!(frame.mv.is_none(), "undo_null does not match the last move made");
            self.board = frame.board;
            self.keys.pop();
        }
    }
}

impl PieceBoard for CozyPosition {
    fn side_to_move(&self) -> Color { self.board.side_to_move() }
    fn pieces(&self, color: Color, piece: Piece) -> BitBoard { self.board.colors(color) & self.board.pieces(piece) }
    fn occupied(&self) -> BitBoard { self.board.occupied() }
    fn king_square(&self, color: Color) -> Square { self.board.king(color) }
}
