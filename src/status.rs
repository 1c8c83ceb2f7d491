// src/status.rs
// Game-outcome classification on top of `Position`'s draw predicates and
// legal move generation. Checkmate takes precedence over the 140-ply
// clock: a side with no legal reply is mated even if the clock has also
// expired, matching the reference engine's literal `isDrawn` ordering.

use crate::moves::generate::generate_legal;
use crate::moves::types::MoveList;
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InPlay,
    Checkmate,
    Stalemate,
    Draw140Ply,
    DrawInsufficientMaterial,
    DrawRepetition,
}

/// Priority (highest to lowest):
///  1) `Checkmate` / `Stalemate` (no legal move exists)
///  2) `Draw140Ply` (halfmove clock has reached the 140-ply limit)
///  3) `DrawInsufficientMaterial` (bare kings)
///  4) `DrawRepetition` (threefold)
///  5) `InPlay`
pub fn position_status(position: &Position) -> GameStatus {
    let mut legal = MoveList::new();
    generate_legal(&mut legal, position);

    if legal.is_empty() {
        return if position.in_check() {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        };
    }

    if position.halfmove_clock() >= crate::position::DRAW_PLY_LIMIT {
        return GameStatus::Draw140Ply;
    }
    if position.is_bare_kings_draw() {
        return GameStatus::DrawInsufficientMaterial;
    }
    if position.is_repetition_draw(true) {
        return GameStatus::DrawRepetition;
    }

    GameStatus::InPlay
}
