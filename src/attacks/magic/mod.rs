pub mod precompute;
pub mod scan;
pub mod search;
pub mod structs;

use once_cell::sync::Lazy;
use structs::RookMagicTable;

static ROOK_MAGIC_TABLE: Lazy<RookMagicTable> = Lazy::new(|| {
    precompute::generate_rook_magic_table().expect("failed to build rook magic table")
});

#[inline(always)]
pub fn rook_attacks(square: u8, occupancy: u64) -> u64 {
    ROOK_MAGIC_TABLE.get_attacks(square as usize, occupancy)
}
