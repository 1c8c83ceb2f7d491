// src/moves/perft.rs
// Move-path counting used to validate the move generator against known
// node counts. Per-ply buffers are allocated once and reused across the
// whole recursion so a deep perft run does no allocation in its hot path.

use crate::moves::generate::generate_legal;
use crate::moves::types::{Move, MoveList};
use crate::position::Position;
use tracing::instrument;

const MAX_PERFT_DEPTH: usize = 20;

fn create_buffers() -> Box<[MoveList; MAX_PERFT_DEPTH]> {
    Box::new(std::array::from_fn(|_| MoveList::new()))
}

fn perft_recursive(position: &mut Position, depth: u32, ply: usize, buffers: &mut [MoveList; MAX_PERFT_DEPTH]) -> u64 {
    if depth == 0 {
        return 1;
    }

    buffers[ply].clear();
    {
        // SAFETY-free: `generate_legal` only reads `position`, the mutable
        // borrow below is released before it is called.
        let mut moves = MoveList::new();
        generate_legal(&mut moves, position);
        buffers[ply] = moves;
    }

    let move_count = buffers[ply].len();
    let mut nodes = 0u64;

    for i in 0..move_count {
        let mv = buffers[ply][i];
        position.apply_move(mv);
        nodes += perft_recursive(position, depth - 1, ply + 1, buffers);
        position.undo_move();
    }

    nodes
}

#[instrument(skip(position), fields(depth))]
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    assert!(depth as usize <= MAX_PERFT_DEPTH, "depth {depth} exceeds MAX_PERFT_DEPTH {MAX_PERFT_DEPTH}");
    let mut buffers = create_buffers();
    perft_recursive(position, depth, 0, &mut buffers)
}

/// Per-root-move node counts, the classic `go perft` divide output used to
/// bisect a movegen bug down to the first diverging branch.
#[instrument(skip(position), fields(depth))]
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    assert!(depth >= 1, "perft_divide needs depth >= 1");
    let mut root_moves = MoveList::new();
    generate_legal(&mut root_moves, position);

    let mut buffers = create_buffers();
    let mut divided = Vec::with_capacity(root_moves.len());
    for mv in root_moves {
        position.apply_move(mv);
        let nodes = perft_recursive(position, depth - 1, 0, &mut buffers);
        position.undo_move();
        divided.push((mv, nodes));
    }
    divided
}
