// src/moves/see.rs
// Static exchange evaluation: does the side to move gain at least
// `threshold` centipawns from the capture sequence starting on
// `move.dst()`? Ported in spirit (negamax-threshold with least-valuable-
// attacker iteration and rook x-ray revelation) from the reference engine
// this variant was modeled on, which itself credits Ethereal/Weiss for the
// algorithm shape.

use crate::attacks;
use crate::bitboard;
use crate::moves::types::Move;
use crate::position::Position;
use crate::square::{Color, Piece, PieceType};

pub mod values {
    pub const PAWN: i32 = 100;
    pub const ALFIL: i32 = 125;
    pub const FERZ: i32 = 160;
    pub const KNIGHT: i32 = 330;
    pub const ROOK: i32 = 500;
    pub const KING: i32 = 0;
}

#[inline]
pub fn piece_type_value(piece_type: PieceType) -> i32 {
    match piece_type {
        PieceType::Pawn => values::PAWN,
        PieceType::Alfil => values::ALFIL,
        PieceType::Ferz => values::FERZ,
        PieceType::Knight => values::KNIGHT,
        PieceType::Rook => values::ROOK,
        PieceType::King => values::KING,
    }
}

#[inline]
pub fn piece_value(piece: Piece) -> i32 {
    piece_type_value(piece.piece_type())
}

/// Finds the lowest-value attacker among `attackers` belonging to `color`,
/// removes it from `occupancy`, and returns its type. Iterates piece types
/// from cheapest to most valuable, matching the reference algorithm.
fn pop_least_valuable_attacker(
    position: &Position,
    occupancy: &mut u64,
    attackers: u64,
    color: Color,
) -> Option<PieceType> {
    for piece_type in PieceType::ALL {
        let subset = attackers & position.pieces(piece_type, color);
        if subset != 0 {
            *occupancy &= !bitboard::lowest_bit(subset);
            return Some(piece_type);
        }
    }
    None
}

pub fn see_ge(position: &Position, mv: Move, threshold: i32) -> bool {
    let src = mv.src();
    let dst = mv.dst();

    let captured_value = position
        .piece_at(dst)
        .map(piece_value)
        .unwrap_or(0);
    let mut score = captured_value;
    if mv.is_promotion() {
        score += values::FERZ - values::PAWN;
    }
    score -= threshold;
    if score < 0 {
        return false;
    }

    let mut next = if mv.is_promotion() {
        PieceType::Ferz
    } else {
        position.piece_at(src).expect("SEE called on a move with no mover").piece_type()
    };
    score -= piece_type_value(next);
    if score >= 0 {
        return true;
    }

    let mut occupancy = position.occupancy() ^ src.bit() ^ dst.bit();
    let mut attackers = position.all_attackers_to(dst, occupancy);

    let mut side_to_move = position
        .piece_at(src)
        .map(|p| p.color())
        .unwrap_or_else(|| position.side_to_move());
    let initial_color = side_to_move;
    side_to_move = side_to_move.opposite();

    loop {
        let our_attackers = attackers & position.color_occupancy(side_to_move) & occupancy;
        if our_attackers == 0 {
            break;
        }

        let Some(popped) = pop_least_valuable_attacker(position, &mut occupancy, our_attackers, side_to_move) else {
            break;
        };
        next = popped;

        if next == PieceType::Rook {
            attackers |= attacks::piece_attacks(PieceType::Rook, dst.index(), occupancy)
                & position.pieces_of_type(PieceType::Rook);
        }
        attackers &= occupancy;

        score = -score - 1 - piece_type_value(next);
        side_to_move = side_to_move.opposite();

        if score >= 0 {
            // If the piece that just captured was the king and the
            // opponent still has an attacker, that king capture would have
            // been illegal; undo the side flip before breaking.
            if next == PieceType::King && attackers & position.color_occupancy(side_to_move) != 0 {
                side_to_move = side_to_move.opposite();
            }
            break;
        }
    }

    initial_color != side_to_move
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn pawn_takes_undefended_rook_gains_at_least_zero() {
        // White pawn on e5 captures a black rook on f6 defended only by a
        // knight on h7 (one recapture, which then loses the knight too —
        // net still favorable for White taking the rook outright is >= 0
        // at minimum).
        let fen = "8/7n/5r2/4P3/8/8/8/4K2k w - - 0 1";
        let position = Position::from_fen(fen).unwrap();
        let mv = Move::standard("e5".parse().unwrap(), "f6".parse().unwrap());
        assert!(see_ge(&position, mv, 0));
    }

    #[test]
    fn pawn_takes_rook_defended_by_knight_does_not_clear_full_rook_value() {
        let fen = "8/7n/5r2/4P3/8/8/8/4K2k w - - 0 1";
        let position = Position::from_fen(fen).unwrap();
        let mv = Move::standard("e5".parse().unwrap(), "f6".parse().unwrap());
        assert!(!see_ge(&position, mv, values::ROOK));
    }
}
