// src/zobrist.rs
// Deterministic Zobrist keys. Unlike `rand::StdRng` (whose algorithm is not
// guaranteed stable across crate versions, which would silently change
// every key on a dependency bump) this uses a small hand-rolled Jenkins
// small-fast (JSF) 64-bit generator seeded with a fixed constant, so keys
// are bit-for-bit identical across platforms, runs, and crate versions.

use crate::square::{Piece, Square};
use once_cell::sync::Lazy;

const SEED: u64 = 0xD06C_6599_54EC_904A;

/// Jenkins' small fast 64-bit PRNG. Deterministic, not cryptographic.
struct Jsf64Rng {
    a: u64,
    b: u64,
    c: u64,
    d: u64,
}

impl Jsf64Rng {
    fn new(seed: u64) -> Self {
        let mut rng = Self {
            a: 0xF1EA_5EED,
            b: seed,
            c: seed,
            d: seed,
        };
        for _ in 0..20 {
            rng.next_u64();
        }
        rng
    }

    fn next_u64(&mut self) -> u64 {
        let e = self.a.wrapping_sub(self.b.rotate_left(7));
        self.a = self.b ^ self.c.rotate_left(13);
        self.b = self.c.wrapping_add(self.d.rotate_left(37));
        self.c = self.d.wrapping_add(e);
        self.d = e.wrapping_add(self.a);
        self.d
    }
}

const PIECE_SQUARE_KEYS: usize = 12 * 64;
const SIDE_TO_MOVE_KEY: usize = PIECE_SQUARE_KEYS;
const TOTAL_KEYS: usize = PIECE_SQUARE_KEYS + 1;

pub struct ZobristKeys {
    keys: [u64; TOTAL_KEYS],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = Jsf64Rng::new(SEED);
        let mut keys = [0u64; TOTAL_KEYS];
        for key in keys.iter_mut() {
            *key = rng.next_u64();
        }
        Self { keys }
    }

    #[inline(always)]
    pub fn piece_square(&self, piece: Piece, square: Square) -> u64 {
        self.keys[square.index() as usize * 12 + piece.index()]
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> u64 {
        self.keys[SIDE_TO_MOVE_KEY]
    }
}

static KEYS: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::generate);

pub fn zobrist_keys() -> &'static ZobristKeys {
    &KEYS
}
