// src/position/legality.rs
// Checkers/pinned/threats computation, grounded in the reference engine's
// `calcCheckers`/`calcPinned`/`calcThreats`. Only rooks pin or x-ray in
// Shatranj: there is no bishop or queen, and the alfil/ferz/knight/king
// never reveal a second attacker when removed from the board.

use crate::attacks::{self, rays};
use crate::position::boards::PositionBoards;
use crate::square::{Color, PieceType, Square};

/// Enemy pieces currently giving check to `king_square`.
pub fn compute_checkers(boards: &PositionBoards, king_square: Square, king_color: Color) -> u64 {
    let enemy = king_color.opposite();
    let occ = boards.occupancy();
    let mut checkers = 0u64;

    checkers |= attacks::piece_attacks(PieceType::Alfil, king_square.index(), occ)
        & boards.pieces(PieceType::Alfil, enemy);
    checkers |= attacks::piece_attacks(PieceType::Ferz, king_square.index(), occ)
        & boards.pieces(PieceType::Ferz, enemy);
    checkers |= attacks::piece_attacks(PieceType::Knight, king_square.index(), occ)
        & boards.pieces(PieceType::Knight, enemy);
    checkers |= attacks::piece_attacks(PieceType::Rook, king_square.index(), occ)
        & boards.pieces(PieceType::Rook, enemy);
    // Pawn checkers: use our own color's pawn-attack table from the king
    // square (symmetric — a square a white pawn attacks from X is exactly
    // the set of squares from which a black pawn would attack X).
    checkers |= attacks::pawn_attacks(king_square.index(), king_color) & boards.pieces(PieceType::Pawn, enemy);

    checkers
}

/// Our pieces pinned to our own king along a rook ray.
pub fn compute_pinned(boards: &PositionBoards, king_square: Square, king_color: Color) -> u64 {
    let enemy = king_color.opposite();
    let own_occ = boards.color_occupancy(king_color);
    let enemy_rooks = boards.pieces(PieceType::Rook, enemy);
    let occ = boards.occupancy();

    let mut pinned = 0u64;
    let mut rooks = enemy_rooks & attacks::piece_attacks(PieceType::Rook, king_square.index(), 0);
    while rooks != 0 {
        let rook_sq = crate::bitboard::pop_lowest_square(&mut rooks);
        let between = rays::between(rook_sq.index(), king_square.index());
        let blockers = between & occ;
        if blockers != 0 && !crate::bitboard::multiple(blockers) && blockers & own_occ != 0 {
            pinned |= blockers;
        }
    }
    pinned
}

/// Squares attacked by the side not to move, computed with our own king
/// removed from the occupancy so that the king cannot "hide" behind itself
/// while stepping back along a rook's line of attack.
pub fn compute_threats(boards: &PositionBoards, king_square: Square, king_color: Color) -> u64 {
    let enemy = king_color.opposite();
    let occ_without_king = boards.occupancy() & !king_square.bit();

    let mut threats = 0u64;
    for piece_type in [PieceType::Alfil, PieceType::Ferz, PieceType::Knight, PieceType::King, PieceType::Rook] {
        let mut pieces = boards.pieces(piece_type, enemy);
        while pieces != 0 {
            let sq = crate::bitboard::pop_lowest_square(&mut pieces);
            threats |= attacks::piece_attacks(piece_type, sq.index(), occ_without_king);
        }
    }
    let mut pawns = boards.pieces(PieceType::Pawn, enemy);
    while pawns != 0 {
        let sq = crate::bitboard::pop_lowest_square(&mut pawns);
        threats |= attacks::pawn_attacks(sq.index(), enemy);
    }

    threats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Piece;

    fn boards_with(pieces: &[(Square, Piece)]) -> PositionBoards {
        let mut b = PositionBoards::empty();
        for &(sq, p) in pieces {
            b.set_piece(sq, p);
        }
        b
    }

    #[test]
    fn rook_gives_check_along_open_file() {
        let king = Square::from_index(4); // e1
        let rook_sq = Square::from_index(60); // e8
        let boards = boards_with(&[
            (king, Piece::new(PieceType::King, Color::White)),
            (rook_sq, Piece::new(PieceType::Rook, Color::Black)),
        ]);
        let checkers = compute_checkers(&boards, king, Color::White);
        assert_eq!(checkers, rook_sq.bit());
    }

    #[test]
    fn single_blocker_between_king_and_rook_is_pinned() {
        let king = Square::from_index(4); // e1
        let rook_sq = Square::from_index(60); // e8
        let blocker = Square::from_index(28); // e4
        let boards = boards_with(&[
            (king, Piece::new(PieceType::King, Color::White)),
            (rook_sq, Piece::new(PieceType::Rook, Color::Black)),
            (blocker, Piece::new(PieceType::Knight, Color::White)),
        ]);
        let pinned = compute_pinned(&boards, king, Color::White);
        assert_eq!(pinned, blocker.bit());
    }

    #[test]
    fn two_blockers_between_king_and_rook_pin_nobody() {
        let king = Square::from_index(4);
        let rook_sq = Square::from_index(60);
        let b1 = Square::from_index(20); // e3
        let b2 = Square::from_index(28); // e4
        let boards = boards_with(&[
            (king, Piece::new(PieceType::King, Color::White)),
            (rook_sq, Piece::new(PieceType::Rook, Color::Black)),
            (b1, Piece::new(PieceType::Knight, Color::White)),
            (b2, Piece::new(PieceType::Knight, Color::White)),
        ]);
        assert_eq!(compute_pinned(&boards, king, Color::White), 0);
    }

    #[test]
    fn threats_exclude_the_kings_own_square_from_occupancy() {
        // Black rook on e8, white king on e1: the king cannot step to d1 and
        // claim it's safe from the rook, because removing the king from
        // occupancy still leaves the e-file open.
        let king = Square::from_index(4);
        let rook_sq = Square::from_index(60);
        let boards = boards_with(&[
            (king, Piece::new(PieceType::King, Color::White)),
            (rook_sq, Piece::new(PieceType::Rook, Color::Black)),
        ]);
        let threats = compute_threats(&boards, king, Color::White);
        assert_ne!(threats & king.bit(), 0);
    }
}
