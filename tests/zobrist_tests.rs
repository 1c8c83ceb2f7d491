use shatranj_core::moves::types::Move;
use shatranj_core::position::fen::STARTING_FEN;
use shatranj_core::position::Position;
use shatranj_core::square::Square;

#[test]
fn incrementally_updated_key_matches_a_key_recomputed_from_scratch() {
    let mut position = Position::from_fen(STARTING_FEN).unwrap();
    position.apply_move(Move::standard(Square::from_index(12), Square::from_index(20))); // e2-e3
    position.apply_move(Move::standard(Square::from_index(52), Square::from_index(44))); // e7-e6
    position.apply_move(Move::standard(Square::from_index(6), Square::from_index(21))); // g1-f3

    let recomputed = Position::from_fen(&position.to_fen()).unwrap();
    assert_eq!(position.key(), recomputed.key());
}

#[test]
fn key_is_restored_after_undoing_a_run_of_moves() {
    let mut position = Position::from_fen(STARTING_FEN).unwrap();
    let root_key = position.key();

    let moves = [
        Move::standard(Square::from_index(12), Square::from_index(20)), // e2-e3
        Move::standard(Square::from_index(52), Square::from_index(44)), // e7-e6
        Move::standard(Square::from_index(6), Square::from_index(21)),  // g1-f3
        Move::standard(Square::from_index(62), Square::from_index(45)), // g8-f6
    ];
    for mv in moves {
        position.apply_move(mv);
    }
    assert_ne!(position.key(), root_key);

    for _ in 0..moves.len() {
        position.undo_move();
    }
    assert_eq!(position.key(), root_key);
}

#[test]
fn two_positions_reached_by_different_move_orders_share_a_key() {
    let mut by_e_first = Position::from_fen(STARTING_FEN).unwrap();
    by_e_first.apply_move(Move::standard(Square::from_index(12), Square::from_index(20))); // e2-e3
    by_e_first.apply_move(Move::standard(Square::from_index(6), Square::from_index(21))); // g1-f3

    let mut by_knight_first = Position::from_fen(STARTING_FEN).unwrap();
    by_knight_first.apply_move(Move::standard(Square::from_index(6), Square::from_index(21))); // g1-f3
    by_knight_first.apply_move(Move::standard(Square::from_index(12), Square::from_index(20))); // e2-e3

    assert_eq!(by_e_first.key(), by_knight_first.key());
}
