// src/attacks/magic/precompute.rs
// Builds the rook magic table once per process. Chooses between the
// PEXT-indexed path (no magic search needed — PEXT is a perfect hash by
// construction) and the black-magic multiplication path (needs a randomized
// search for a multiplier that does not collide) at compile time, based on
// target-feature detection.

use super::scan::{rook_attacks_per_square, rook_relevance_mask};
use super::structs::{MagicEntry, RookMagicTable};
use crate::bitboard::pdep;

/// Every subset of `mask`, enumerated via the standard "subset of a subset"
/// trick: `n = (n - mask) & mask` starting from `n = 0`.
fn subsets_of(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

#[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
fn build_entry(square: usize) -> Result<MagicEntry, String> {
    let mask = rook_relevance_mask(square);
    let bits = mask.count_ones();
    let mut table = vec![0u64; 1usize << bits];
    for index in 0..table.len() {
        let occupancy = pdep(index as u64, mask);
        table[index] = rook_attacks_per_square(square, occupancy);
    }
    Ok(MagicEntry {
        magic: 0,
        shift: 0,
        mask,
        table: table.into_boxed_slice(),
    })
}

#[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
fn build_entry(square: usize) -> Result<MagicEntry, String> {
    use super::search::find_magic_number_for_square;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let mask = rook_relevance_mask(square);
    let bits = mask.count_ones();
    let shift = 64 - bits;

    let blockers = subsets_of(mask);
    let attacks: Vec<u64> = blockers
        .iter()
        .map(|&b| rook_attacks_per_square(square, b))
        .collect();

    // Deterministic per-square seed so the search (and thus the resulting
    // magic numbers and table contents) never changes between builds.
    let mut rng = StdRng::seed_from_u64(0x5DA1_AB7E_u64.wrapping_add(square as u64));
    let magic = find_magic_number_for_square(&blockers, &attacks, shift, &mut rng)?;

    let mut table = vec![0u64; 1usize << bits];
    for (&b, &a) in blockers.iter().zip(attacks.iter()) {
        let index = ((b.wrapping_mul(magic)) >> shift) as usize;
        table[index] = a;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask,
        table: table.into_boxed_slice(),
    })
}

pub fn generate_rook_magic_table() -> Result<RookMagicTable, String> {
    let mut entries = Vec::with_capacity(64);
    for square in 0..64 {
        entries.push(build_entry(square)?);
    }
    Ok(RookMagicTable { entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsets_of_enumerates_every_combination() {
        let mask = 0b1011u64;
        let subsets = subsets_of(mask);
        assert_eq!(subsets.len(), 1 << mask.count_ones());
        assert!(subsets.contains(&0));
        assert!(subsets.contains(&mask));
    }
}
