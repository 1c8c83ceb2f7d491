// src/moves/cuckoo.rs
// Cuckoo hashing table for upcoming-repetition detection. Maps a reversible
// single-move zobrist delta back to the move that produced it, so a
// three-fold (or upcoming) repetition can be spotted in O(1) without
// enumerating moves.
//
// Populated once, at first use, for every (non-pawn piece type, src, dst)
// pair where that piece attacks `dst` from `src` on an empty board. Pawns
// are excluded because a pawn move is never reversible (it cannot move
// backward), so it can never be the single move that closes a cycle.

use crate::attacks;
use crate::moves::types::Move;
use crate::square::{Color, Piece, PieceType, Square};
use crate::zobrist::zobrist_keys;
use once_cell::sync::Lazy;

const TABLE_SIZE: usize = 8192;
const H1_MASK: u64 = 0x1FFF;

#[inline(always)]
fn h1(diff: u64) -> usize {
    (diff & H1_MASK) as usize
}

#[inline(always)]
fn h2(diff: u64) -> usize {
    ((diff >> 13) & H1_MASK) as usize
}

pub struct CuckooTable {
    keys: Box<[u64; TABLE_SIZE]>,
    moves: Box<[Move; TABLE_SIZE]>,
}

impl CuckooTable {
    fn build() -> Self {
        let mut keys = Box::new([0u64; TABLE_SIZE]);
        let mut moves = Box::new([Move::default(); TABLE_SIZE]);
        let zobrist = zobrist_keys();

        for piece_type in [PieceType::Alfil, PieceType::Ferz, PieceType::Knight, PieceType::Rook, PieceType::King] {
            for color in [Color::White, Color::Black] {
                let piece = Piece::new(piece_type, color);
                for src_idx in 0..64u8 {
                    let src = Square::from_index(src_idx);
                    let reach = if piece_type == PieceType::Rook {
                        attacks::piece_attacks(PieceType::Rook, src_idx, 0)
                    } else {
                        attacks::piece_attacks(piece_type, src_idx, 0)
                    };
                    let mut targets = reach;
                    while targets != 0 {
                        let dst = crate::bitboard::pop_lowest_square(&mut targets);
                        if dst.index() <= src_idx {
                            // Each (src, dst) unordered pair only needs to be
                            // inserted once; the move is reversible either way.
                            continue;
                        }
                        let diff = zobrist.piece_square(piece, src)
                            ^ zobrist.piece_square(piece, dst)
                            ^ zobrist.side_to_move();
                        let mv = Move::standard(src, dst);
                        insert(&mut keys, &mut moves, diff, mv);
                    }
                }
            }
        }

        Self { keys, moves }
    }

    pub fn lookup(&self, diff: u64) -> Option<Move> {
        let slot1 = h1(diff);
        if self.keys[slot1] == diff {
            return Some(self.moves[slot1]);
        }
        let slot2 = h2(diff);
        if self.keys[slot2] == diff {
            return Some(self.moves[slot2]);
        }
        None
    }
}

fn insert(keys: &mut [u64; TABLE_SIZE], moves: &mut [Move; TABLE_SIZE], diff: u64, mv: Move) {
    let mut diff = diff;
    let mut mv = mv;
    let mut slot = h1(diff);
    loop {
        std::mem::swap(&mut keys[slot], &mut diff);
        std::mem::swap(&mut moves[slot], &mut mv);
        if diff == 0 {
            return;
        }
        slot = if slot == h1(diff) { h2(diff) } else { h1(diff) };
    }
}

static CUCKOO_TABLE: Lazy<CuckooTable> = Lazy::new(CuckooTable::build);

pub fn cuckoo_table() -> &'static CuckooTable {
    &CUCKOO_TABLE
}
