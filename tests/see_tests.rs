use shatranj_core::moves::see::{see_ge, values};
use shatranj_core::moves::types::Move;
use shatranj_core::position::Position;

#[test]
fn capturing_an_undefended_rook_clears_any_reasonable_threshold() {
    let position = Position::from_fen("8/8/5r2/4P3/8/8/8/4K2k w - - 0 1").unwrap();
    let mv = Move::standard("e5".parse().unwrap(), "f6".parse().unwrap());
    assert!(see_ge(&position, mv, values::PAWN));
}

#[test]
fn a_pawn_trade_of_equal_value_clears_a_zero_threshold() {
    let position = Position::from_fen("8/8/5p2/4P3/8/8/8/4K2k w - - 0 1").unwrap();
    let mv = Move::standard("e5".parse().unwrap(), "f6".parse().unwrap());
    assert!(see_ge(&position, mv, 0));
}

#[test]
fn a_rook_capturing_a_pawn_defended_by_another_pawn_fails_a_positive_threshold() {
    // White rook on d3 takes the black pawn on d5, but a black pawn on e6
    // recaptures: net material is -400 for White, so the exchange fails
    // even a threshold of +1.
    let position = Position::from_fen("7k/8/4p3/3p4/8/3R4/8/K7 w - - 0 1").unwrap();
    let mv = Move::standard("d3".parse().unwrap(), "d5".parse().unwrap());
    assert!(!see_ge(&position, mv, 1));
    assert!(see_ge(&position, mv, values::PAWN - values::ROOK));
}
