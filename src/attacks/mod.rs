pub mod leapers;
pub mod magic;
pub mod rays;

use crate::square::{Color, PieceType};

/// Attacks for a non-pawn piece from `square` given `occupancy` (ignored by
/// every piece but the rook).
#[inline]
pub fn piece_attacks(piece_type: PieceType, square: u8, occupancy: u64) -> u64 {
    match piece_type {
        PieceType::Alfil => leapers::alfil_attacks(square),
        PieceType::Ferz => leapers::ferz_attacks(square),
        PieceType::Knight => leapers::knight_attacks(square),
        PieceType::King => leapers::king_attacks(square),
        PieceType::Rook => magic::rook_attacks(square, occupancy),
        PieceType::Pawn => unreachable!("pawn attacks are color-dependent; use pawn_attacks"),
    }
}

#[inline(always)]
pub fn pawn_attacks(square: u8, color: Color) -> u64 {
    leapers::pawn_attacks(square, color)
}
