// src/position/mod.rs
// The position state machine: a stack of `BoardState`s (one per ply from
// root) plus the full per-ply key history needed for repetition detection
// even when callers trim the state stack itself.

pub mod boards;
pub mod fen;
pub mod legality;
pub(crate) mod state;

use crate::attacks::{self, rays};
use crate::bitboard;
use crate::moves::cuckoo;
use crate::moves::types::Move;
use crate::square::{Color, Piece, PieceType, Square};
use crate::zobrist::zobrist_keys;
use boards::PositionBoards;
use state::{BoardState, Kings};

/// Plies without a capture or pawn move before the position is drawn.
/// Shatranj's 140-ply rule, double the orthodox game's 100-ply limit.
pub const DRAW_PLY_LIMIT: u16 = 140;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    states: Vec<BoardState>,
    /// Zobrist key at every ply from the root, including plies whose
    /// `BoardState` has since been trimmed by `clear_state_history`. Needed
    /// so repetition detection keeps working across a trimmed stack.
    keys: Vec<u64>,
    black_to_move: bool,
    fullmove: u32,
}

impl Position {
    fn current(&self) -> &BoardState {
        self.states.last().expect("Position always has at least one state")
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        if self.black_to_move {
            Color::Black
        } else {
            Color::White
        }
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.current().boards.piece_at(square)
    }

    #[inline]
    pub fn occupancy(&self) -> u64 {
        self.current().boards.occupancy()
    }

    #[inline]
    pub fn color_occupancy(&self, color: Color) -> u64 {
        self.current().boards.color_occupancy(color)
    }

    #[inline]
    pub fn pieces(&self, piece_type: PieceType, color: Color) -> u64 {
        self.current().boards.pieces(piece_type, color)
    }

    #[inline]
    pub fn pieces_of_type(&self, piece_type: PieceType) -> u64 {
        self.current().boards.pieces_of_type(piece_type)
    }

    #[inline]
    pub fn checkers(&self) -> u64 {
        self.current().checkers
    }

    #[inline]
    pub fn pinned(&self) -> u64 {
        self.current().pinned
    }

    #[inline]
    pub fn threats(&self) -> u64 {
        self.current().threats
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.current().checkers != 0
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.current().kings.white,
            Color::Black => self.current().kings.black,
        }
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.current().key
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.current().halfmove
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove
    }

    #[inline]
    pub fn ply(&self) -> usize {
        self.states.len() - 1
    }

    /// All pieces, of either color, currently attacking `square` given a
    /// caller-supplied `occupancy` (used by SEE, which peels pieces off the
    /// board one at a time without ever mutating the real position).
    pub fn all_attackers_to(&self, square: Square, occupancy: u64) -> u64 {
        let boards = &self.current().boards;
        let mut attackers = 0u64;
        attackers |= attacks::piece_attacks(PieceType::Alfil, square.index(), occupancy)
            & boards.pieces_of_type(PieceType::Alfil);
        attackers |= attacks::piece_attacks(PieceType::Ferz, square.index(), occupancy)
            & boards.pieces_of_type(PieceType::Ferz);
        attackers |= attacks::piece_attacks(PieceType::Knight, square.index(), occupancy)
            & boards.pieces_of_type(PieceType::Knight);
        attackers |= attacks::piece_attacks(PieceType::King, square.index(), occupancy)
            & boards.pieces_of_type(PieceType::King);
        attackers |= attacks::piece_attacks(PieceType::Rook, square.index(), occupancy)
            & boards.pieces_of_type(PieceType::Rook);
        attackers |= attacks::pawn_attacks(square.index(), Color::White) & boards.pieces(PieceType::Pawn, Color::Black);
        attackers |= attacks::pawn_attacks(square.index(), Color::Black) & boards.pieces(PieceType::Pawn, Color::White);
        attackers & occupancy
    }

    /// Validates `mv` against the current board without running full
    /// generation: a piece of the side to move must sit on `src`; the
    /// destination must hold neither a friendly piece nor the enemy king;
    /// the promotion flag must match whether a pawn actually lands on the
    /// promotion rank; pawns must obey their one-step-forward/capture-only
    /// shape; every other piece's destination must lie in its precomputed
    /// (or, for the rook, magic) attack set for the current occupancy.
    pub fn is_pseudolegal(&self, mv: Move) -> bool {
        let color = self.side_to_move();
        let state = self.current();
        let src = mv.src();
        let dst = mv.dst();

        let piece = match state.boards.piece_at(src) {
            Some(p) => p,
            None => return false,
        };
        if piece.color() != color {
            return false;
        }

        if let Some(target) = state.boards.piece_at(dst) {
            if target.color() == color || target.piece_type() == PieceType::King {
                return false;
            }
        }

        match piece.piece_type() {
            PieceType::Pawn => {
                let promo_rank = bitboard::promotion_rank(color);
                if mv.is_promotion() != (dst.bit() & promo_rank != 0) {
                    return false;
                }
                if bitboard::shift_forward(src.bit(), color) == dst.bit() {
                    return state.boards.piece_at(dst).is_none();
                }
                let captures_left = bitboard::shift_up_left_relative(src.bit(), color) == dst.bit();
                let captures_right = bitboard::shift_up_right_relative(src.bit(), color) == dst.bit();
                if captures_left || captures_right {
                    return state.boards.piece_at(dst).is_some_and(|p| p.color() != color);
                }
                false
            }
            piece_type => {
                !mv.is_promotion() && attacks::piece_attacks(piece_type, src.index(), state.boards.occupancy()) & dst.bit() != 0
            }
        }
    }

    /// Whether a pseudo-legal `mv` (own piece on `src`, legal destination
    /// shape, not landing on a friendly piece) is fully legal: king moves
    /// must not land on a threatened square, non-king moves during check
    /// must capture the checker or interpose, and pinned pieces may only
    /// slide along their pin ray.
    pub fn is_legal(&self, mv: Move) -> bool {
        let color = self.side_to_move();
        let state = self.current();
        let piece = match state.boards.piece_at(mv.src()) {
            Some(p) => p,
            None => return false,
        };
        debug_assert_eq!(piece.color(), color, "is_legal called with the wrong side's move");

        if piece.piece_type() == PieceType::King {
            return state.threats & mv.dst().bit() == 0;
        }

        if bitboard::multiple(state.checkers) {
            return false;
        }

        if state.checkers != 0 {
            let checker_sq = bitboard::lowest_square(state.checkers);
            let king_sq = self.king_square(color);
            let evasion = state.checkers | rays::between(king_sq.index(), checker_sq.index());
            if evasion & mv.dst().bit() == 0 {
                return false;
            }
        }

        if state.pinned & mv.src().bit() != 0 {
            let king_sq = self.king_square(color);
            let line = rays::intersecting(king_sq.index(), mv.src().index());
            if line & mv.dst().bit() == 0 {
                return false;
            }
        }

        true
    }

    /// Applies `mv`, pushing a new state onto the stack. Assumes `mv` is
    /// legal in the current position; undefined in release builds, a
    /// debug assertion in debug builds, if it is not.
    pub fn apply_move(&mut self, mv: Move) {
        let color = self.side_to_move();
        let enemy = color.opposite();
        let zobrist = zobrist_keys();

        let prev = self.current();
        let mut boards = prev.boards.clone();
        let mut key = prev.key;
        let mut kings = prev.kings;
        let mut halfmove = prev.halfmove + 1;

        let src = mv.src();
        let dst = mv.dst();
        let moving_piece = boards.piece_at(src).expect("apply_move: no piece on source square");
        debug_assert_eq!(moving_piece.color(), color);

        if let Some(captured) = boards.piece_at(dst) {
            debug_assert_eq!(captured.color(), enemy, "cannot capture a friendly piece");
            key ^= zobrist.piece_square(captured, dst);
            boards.remove_piece(dst, captured);
            halfmove = 0;
        }

        key ^= zobrist.piece_square(moving_piece, src);
        if mv.is_promotion() {
            debug_assert_eq!(moving_piece.piece_type(), PieceType::Pawn);
            let promoted = Piece::new(PieceType::Ferz, color);
            boards.move_and_change_piece(src, dst, moving_piece, promoted);
            key ^= zobrist.piece_square(promoted, dst);
        } else {
            boards.move_piece(src, dst, moving_piece);
            key ^= zobrist.piece_square(moving_piece, dst);
        }

        if moving_piece.piece_type() == PieceType::Pawn {
            halfmove = 0;
        }
        if moving_piece.piece_type() == PieceType::King {
            match color {
                Color::White => kings.white = dst,
                Color::Black => kings.black = dst,
            }
        }

        key ^= zobrist.side_to_move();

        let king_sq = match enemy {
            Color::White => kings.white,
            Color::Black => kings.black,
        };
        let checkers = legality::compute_checkers(&boards, king_sq, enemy);
        let pinned = legality::compute_pinned(&boards, king_sq, enemy);
        let threats = legality::compute_threats(&boards, king_sq, enemy);

        self.states.push(BoardState { boards, key, checkers, pinned, threats, kings, halfmove });
        self.keys.push(key);
        self.black_to_move = !self.black_to_move;
        if !self.black_to_move {
            self.fullmove += 1;
        }
    }

    /// Pops the most recently applied move. Debug-asserts against undoing
    /// past the root; in release builds this would simply panic on the
    /// `expect` inside `current`/`pop`.
    pub fn undo_move(&mut self) {
        debug_assert!(self.states.len() > 1, "cannot undo past the root position");
        self.states.pop();
        self.keys.pop();
        self.black_to_move = !self.black_to_move;
        if self.black_to_move {
            self.fullmove -= 1;
        }
    }

    /// Applies a null move: flip side to move, bump the halfmove clock,
    /// and recompute checkers/pinned/threats for the new side. Recomputing
    /// checkers here (not just pinned/threats) is a deliberate broadening:
    /// movegen's check-evasion masking reads `checkers`, and a null move
    /// can change whether the side to move is in check (e.g. a discovered
    /// check that only existed because it was that side's own move to
    /// make) just as surely as a real move can.
    pub fn apply_null_move(&mut self) {
        let prev = self.current();
        let boards = prev.boards.clone();
        let kings = prev.kings;
        let key = prev.key ^ zobrist_keys().side_to_move();
        let halfmove = prev.halfmove + 1;

        let next_color = self.side_to_move().opposite();
        let king_sq = match next_color {
            Color::White => kings.white,
            Color::Black => kings.black,
        };
        let checkers = legality::compute_checkers(&boards, king_sq, next_color);
        let pinned = legality::compute_pinned(&boards, king_sq, next_color);
        let threats = legality::compute_threats(&boards, king_sq, next_color);

        self.states.push(BoardState { boards, key, checkers, pinned, threats, kings, halfmove });
        self.keys.push(key);
        self.black_to_move = !self.black_to_move;
    }

    pub fn undo_null_move(&mut self) {
        debug_assert!(self.states.len() > 1, "cannot undo past the root position");
        self.states.pop();
        self.keys.pop();
        self.black_to_move = !self.black_to_move;
    }

    pub fn is_bare_kings_draw(&self) -> bool {
        let boards = &self.current().boards;
        boards.occupancy() == boards.pieces_of_type(PieceType::King)
    }

    /// Checks for a repetition of the current key among same-side-to-move
    /// predecessors within the current halfmove window. `threefold` selects
    /// the required number of prior matches: two (the usual end-of-game
    /// rule) or one (the looser bound search-layer callers use mid-tree,
    /// where seeing a position twice total is already enough to treat a
    /// line as going nowhere).
    pub fn is_repetition_draw(&self, threefold: bool) -> bool {
        let keys = &self.keys;
        let len = keys.len() as i64;
        let halfmove = self.current().halfmove as i64;
        let current_key = keys[keys.len() - 1];

        let limit = (len - halfmove - 3).max(0);
        let mut repetitions_left = if threefold { 2 } else { 1 };

        let mut i = len - 5;
        while i >= limit {
            if keys[i as usize] == current_key {
                repetitions_left -= 1;
                if repetitions_left == 0 {
                    return true;
                }
            }
            i -= 2;
        }
        false
    }

    /// True if the position is a draw by the 140-ply rule, bare-kings
    /// insufficient material, or repetition. Once the halfmove clock has
    /// expired, the ply-count rule takes over entirely: it reports a draw
    /// exactly when the side to move has some legal reply, and not at all
    /// when there is none, whether that is because the side is stalemated
    /// or because it is mated outright (mate is reported separately by
    /// `status`, not folded into this predicate).
    pub fn is_drawn(&self, threefold: bool) -> bool {
        if self.current().halfmove >= DRAW_PLY_LIMIT {
            let mut legal = crate::moves::types::MoveList::new();
            crate::moves::generate::generate_legal(&mut legal, self);
            return !legal.is_empty();
        }
        self.is_repetition_draw(threefold) || self.is_bare_kings_draw()
    }

    /// Cuckoo-based cycle detector: does some reversible single move, if
    /// played `ply` or fewer plies from now, recreate a position already on
    /// the path to the current one? A running XOR of complemented key diffs
    /// (`other`) cheaply rules out most candidate distances before the
    /// expensive cuckoo-table probe runs; a hit only needs confirming that
    /// the move's path is currently clear and, for a cycle that would land
    /// at or before the search root, that the reversing piece belongs to
    /// the side that would be making it.
    pub fn has_cycle(&self, ply: i32) -> bool {
        let keys = &self.keys;
        let len = keys.len();
        let halfmove = self.current().halfmove as usize;
        let end = halfmove.min(len - 1);
        if end < 3 {
            return false;
        }

        let key_at = |dist: usize| keys[len - 1 - dist];
        let original_key = keys[len - 1];
        let occ = self.occupancy();

        let mut other = !(original_key ^ key_at(1));

        let mut d = 3usize;
        while d <= end {
            let curr_key = key_at(d);
            other ^= !(curr_key ^ key_at(d - 1));
            if other != 0 {
                d += 2;
                continue;
            }

            let diff = original_key ^ curr_key;
            if let Some(mv) = cuckoo::cuckoo_table().lookup(diff) {
                if occ & rays::between(mv.src().index(), mv.dst().index()) == 0 {
                    if ply > d as i32 {
                        return true;
                    }
                    let piece = self.current().boards.piece_at(mv.src()).or_else(|| self.current().boards.piece_at(mv.dst()));
                    return piece.is_some_and(|p| p.color() == self.side_to_move());
                }
            }
            d += 2;
        }
        false
    }

    /// Truncates the state stack down to just the current position,
    /// keeping the key history (needed for repetition detection) intact.
    /// Lets a long-lived search session bound its memory without losing
    /// the ability to detect a repetition against moves made before the
    /// search root.
    pub fn clear_state_history(&mut self) {
        if let Some(last) = self.states.pop() {
            self.states.clear();
            self.states.push(last);
        }
    }

    pub(crate) fn empty_at(black_to_move: bool, fullmove: u32) -> Self {
        Self {
            states: vec![BoardState::empty()],
            keys: vec![0],
            black_to_move,
            fullmove,
        }
    }

    pub(crate) fn push_initial_state(&mut self, state: BoardState) {
        let key = state.key;
        self.states = vec![state];
        self.keys = vec![key];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_then_undo_restores_key_and_side_to_move() {
        let mut position = Position::from_fen(crate::position::fen::STARTING_FEN).unwrap();
        let key_before = position.key();
        let side_before = position.side_to_move();
        let mv = Move::standard(Square::from_index(8), Square::from_index(16)); // a2-a3
        position.apply_move(mv);
        assert_ne!(position.key(), key_before);
        assert_ne!(position.side_to_move(), side_before);
        position.undo_move();
        assert_eq!(position.key(), key_before);
        assert_eq!(position.side_to_move(), side_before);
    }

    #[test]
    fn fullmove_increments_only_after_black_moves() {
        let mut position = Position::from_fen(crate::position::fen::STARTING_FEN).unwrap();
        let start_fullmove = position.fullmove_number();
        position.apply_move(Move::standard(Square::from_index(8), Square::from_index(16)));
        assert_eq!(position.fullmove_number(), start_fullmove);
        position.apply_move(Move::standard(Square::from_index(48), Square::from_index(40)));
        assert_eq!(position.fullmove_number(), start_fullmove + 1);
    }

    #[test]
    fn bare_kings_position_is_drawn() {
        let position = Position::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        assert!(position.is_drawn(false));
    }
}
