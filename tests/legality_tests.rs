use shatranj_core::moves::generate::generate_legal;
use shatranj_core::moves::types::{Move, MoveList};
use shatranj_core::position::Position;
use shatranj_core::square::Square;

fn legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    generate_legal(&mut moves, position);
    moves
}

#[test]
fn a_rook_pinned_to_its_own_king_may_only_slide_along_the_pin_ray() {
    // White rook on e4, pinned along the e-file by the black rook on e8,
    // with the white king on e1: the pinned rook may shuffle up and down
    // the e-file, but stepping off it (e.g. to d4 or f4) is illegal.
    let position = Position::from_fen("4r2k/8/8/8/4R3/8/8/4K3 w - - 0 1").unwrap();
    let pinned_src = Square::from_index(28); // e4

    for mv in legal_moves(&position) {
        if mv.src() == pinned_src {
            assert_eq!(mv.dst().file(), pinned_src.file(), "pinned rook left the pin ray: {mv}");
        }
    }
}

#[test]
fn a_single_checker_can_be_captured_or_the_check_can_be_blocked() {
    // Black rook checks the white king along the e-file from e8; white has
    // a rook on a4 that can interpose on e4, and nothing that can capture
    // the checker outright.
    let position = Position::from_fen("4r2k/8/8/8/R7/8/8/4K3 w - - 0 1").unwrap();
    let moves = legal_moves(&position);

    let blocks_on_e4 = moves
        .iter()
        .any(|mv| mv.src() == Square::from_index(24) && mv.dst() == Square::from_index(28));
    assert!(blocks_on_e4, "a4 rook should be able to interpose on e4");

    for mv in &moves {
        let is_king_move = mv.src() == Square::from_index(4);
        let is_interposition = mv.dst() == Square::from_index(28);
        assert!(is_king_move || is_interposition, "move does not resolve the check: {mv}");
    }
}

#[test]
fn double_check_only_permits_king_moves() {
    // A contrived double-check: white king on e1 attacked simultaneously by
    // a rook on e8 (file) and a knight on d3 (knight hop to e1).
    let position = Position::from_fen("4r2k/8/8/8/8/3n4/8/4K3 w - - 0 1").unwrap();
    let moves = legal_moves(&position);
    assert!(!moves.is_empty(), "the king must have at least one flight square");
    for mv in &moves {
        assert_eq!(mv.src(), Square::from_index(4), "only the king may move under double check: {mv}");
    }
}

#[test]
fn the_king_may_not_step_into_a_threatened_square() {
    // White king on e1, black rook on a2 covering the entire second rank:
    // Ke1-e2 would walk into check and must not be generated as legal.
    let position = Position::from_fen("7k/8/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
    let moves = legal_moves(&position);
    let steps_to_e2 = Move::standard(Square::from_index(4), Square::from_index(12));
    assert!(!moves.contains(&steps_to_e2), "king must not step onto a rook-covered rank");
}
