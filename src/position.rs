//! The position interface the search runs against.
//!
//! The engine never owns game rules: move generation, terminal detection and
//! hashing come from whoever implements [`GamePosition`]. The search only
//! relies on `make`/`undo` being exact inverses, and enforces the pairing
//! itself through [`MoveGuard`].

use cozy_chess::{BitBoard, Color, Piece, Square};
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

/// Classification data carried by a move, so ordering and pruning never
/// have to re-derive it from the board.
pub trait MoveMeta: Copy + Eq + Debug {
    fn from(&self) -> Square;
    fn to(&self) -> Square;
    /// Piece being moved.
    fn piece(&self) -> Piece;
    /// Piece removed from the board by this move (the pawn for en passant).
    fn captured(&self) -> Option<Piece>;
    fn promotion(&self) -> Option<Piece>;
    fn is_castle(&self) -> bool;
    fn is_en_passant(&self) -> bool;

    fn is_capture(&self) -> bool { self.captured().is_some() }
    fn is_quiet(&self) -> bool { !self.is_capture() && self.promotion().is_none() }
}

/// Mutable game position driven by the search with strictly paired
/// `make`/`undo` calls.
pub trait GamePosition {
    type Move: MoveMeta;

    /// All legal moves, or only the legal captures.
    fn legal_moves(&self, captures_only: bool) -> Vec<Self::Move>;
    fn make(&mut self, mv: Self::Move);
    /// Must restore every queryable field, including the key, bit-for-bit.
    fn undo(&mut self, mv: Self::Move);
    fn is_checkmate(&self) -> bool;
    /// Stalemate and rule draws.
    fn is_draw(&self) -> bool;
    fn is_in_check(&self) -> bool;
    /// Transposition key; collisions are tolerated.
    fn position_key(&self) -> u64;
    fn square_is_attacked_by_opponent(&self, sq: Square) -> bool;

    /// Pass the turn. Returns false when the position refuses (in check,
    /// zugzwang-prone material, or no support at all).
    fn make_null(&mut self) -> bool { false }
    fn undo_null(&mut self) {}
}

/// Piece enumeration used by the static evaluator.
pub trait PieceBoard: GamePosition {
    fn side_to_move(&self) -> Color;
    fn pieces(&self, color: Color, piece: Piece) -> BitBoard;
    fn occupied(&self) -> BitBoard;
    fn king_square(&self, color: Color) -> Square;
}

/// Scoped `make`: the move is undone when the guard drops, on every exit
/// path of the frame that created it (cutoffs, cancellation, unwinding).
pub struct MoveGuard<'a, P: GamePosition> {
    pos: &'a mut P,
    mv: P::Move,
}

impl<'a, P: GamePosition> MoveGuard<'a, P> {
    pub fn new(pos: &'a mut P, mv: P::Move) -> Self {
        pos.make(mv);
        Self { pos, mv }
    }
}

impl<P: GamePosition> Deref for MoveGuard<'_, P> {
    type Target = P;
    fn deref(&self) -> &P { self.pos }
}

impl<P: GamePosition> DerefMut for MoveGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P { self.pos }
}

impl<P: GamePosition> Drop for MoveGuard<'_, P> {
    fn drop(&mut self) { self.pos.undo(self.mv); }
}

/// Scoped null move; `None` when the position refused to pass.
pub struct NullGuard<'a, P: GamePosition> {
    pos: &'a mut P,
}

impl<'a, P: GamePosition> NullGuard<'a, P> {
    pub fn try_new(pos: &'a mut P) -> Option<Self> {
        if pos.make_null() { Some(Self { pos }) } else { None }
    }
}

impl<P: GamePosition> Deref for NullGuard<'_, P> {
    type Target = P;
    fn deref(&self) -> &P { self.pos }
}

impl<P: GamePosition> DerefMut for NullGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P { self.pos }
}

impl<P: GamePosition> Drop for NullGuard<'_, P> {
    fn drop(&mut self) { self.pos.undo_null(); }
}
