// src/position/fen.rs
// FEN parsing/printing and UCI move string conversion. Shatranj reuses
// standard chess FEN field order, but the castling and en-passant fields
// are always "-": there is no castling and pawns never double-step, so
// there is nothing for either field to ever encode.

use super::boards::PositionBoards;
use super::legality;
use super::state::{BoardState, Kings};
use super::Position;
use crate::error::{FenError, UciMoveError};
use crate::moves::types::Move;
use crate::square::{Color, Piece, PieceType, Square};
use crate::zobrist::zobrist_keys;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

fn piece_from_char(c: char) -> Result<Piece, FenError> {
    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
    let piece_type = match c.to_ascii_lowercase() {
        'p' => PieceType::Pawn,
        'b' => PieceType::Alfil,
        'q' => PieceType::Ferz,
        'n' => PieceType::Knight,
        'r' => PieceType::Rook,
        'k' => PieceType::King,
        _ => return Err(FenError::InvalidPieceChar(c)),
    };
    Ok(Piece::new(piece_type, color))
}

fn parse_placement(field: &str) -> Result<(PositionBoards, Kings), FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    let mut boards = PositionBoards::empty();
    let mut white_kings = 0u32;
    let mut black_kings = 0u32;
    let mut total_pieces = 0u32;
    let mut kings = Kings { white: Square::from_index(0), black: Square::from_index(0) };

    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top as u8;
        let mut file = 0u32;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip;
                continue;
            }
            if file >= 8 {
                return Err(FenError::WrongFileCount { rank: rank_from_top, found: file + 1 });
            }
            let piece = piece_from_char(c)?;
            let square = Square::from_rank_file(rank, file as u8);
            boards.set_piece(square, piece);
            total_pieces += 1;
            if piece.piece_type() == PieceType::King {
                match piece.color() {
                    Color::White => {
                        white_kings += 1;
                        kings.white = square;
                    }
                    Color::Black => {
                        black_kings += 1;
                        kings.black = square;
                    }
                }
            }
            file += 1;
        }
        if file != 8 {
            return Err(FenError::WrongFileCount { rank: rank_from_top, found: file });
        }
    }

    if white_kings != 1 {
        return Err(FenError::WrongKingCount { color: Color::White, found: white_kings });
    }
    if black_kings != 1 {
        return Err(FenError::WrongKingCount { color: Color::Black, found: black_kings });
    }
    if total_pieces > 32 {
        return Err(FenError::TooManyPieces { found: total_pieces });
    }

    Ok((boards, kings))
}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let (boards, kings) = parse_placement(fields[0])?;

        let black_to_move = match fields[1] {
            "w" => false,
            "b" => true,
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        };

        if fields[2] != "-" {
            return Err(FenError::CastlingFieldNotDash(fields[2].to_string()));
        }
        if fields[3] != "-" {
            return Err(FenError::EnPassantFieldNotDash(fields[3].to_string()));
        }

        let halfmove: u16 = fields[4]
            .parse()
            .map_err(|_| FenError::InvalidHalfmoveClock(fields[4].to_string()))?;
        let fullmove: u32 = fields[5]
            .parse()
            .map_err(|_| FenError::InvalidFullmoveNumber(fields[5].to_string()))?;

        let side_to_move = if black_to_move { Color::Black } else { Color::White };
        let waiting_side = side_to_move.opposite();
        let waiting_king = match waiting_side {
            Color::White => kings.white,
            Color::Black => kings.black,
        };
        if legality::compute_checkers(&boards, waiting_king, waiting_side) != 0 {
            return Err(FenError::OpponentInCheck);
        }

        let key = zobrist_key_for(&boards, black_to_move);
        let king_sq = match side_to_move {
            Color::White => kings.white,
            Color::Black => kings.black,
        };
        let checkers = legality::compute_checkers(&boards, king_sq, side_to_move);
        let pinned = legality::compute_pinned(&boards, king_sq, side_to_move);
        let threats = legality::compute_threats(&boards, king_sq, side_to_move);

        let mut position = Position::empty_at(black_to_move, fullmove);
        position.push_initial_state(BoardState { boards, key, checkers, pinned, threats, kings, halfmove });
        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let state = self.current();
        let mut placement = String::new();
        for rank in (0..8u8).rev() {
            let mut empty_run = 0u32;
            for file in 0..8u8 {
                let square = Square::from_rank_file(rank, file);
                match state.boards.piece_at(square) {
                    Some(piece) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        placement.push_str(&piece.to_string());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank != 0 {
                placement.push('/');
            }
        }

        format!(
            "{} {} - - {} {}",
            placement,
            if self.black_to_move { "b" } else { "w" },
            state.halfmove,
            self.fullmove,
        )
    }
}

fn zobrist_key_for(boards: &PositionBoards, black_to_move: bool) -> u64 {
    let zobrist = zobrist_keys();
    let mut key = 0u64;
    for color in [Color::White, Color::Black] {
        for piece_type in PieceType::ALL {
            let mut bb = boards.pieces(piece_type, color);
            while bb != 0 {
                let sq = crate::bitboard::pop_lowest_square(&mut bb);
                key ^= zobrist.piece_square(Piece::new(piece_type, color), sq);
            }
        }
    }
    if black_to_move {
        key ^= zobrist.side_to_move();
    }
    key
}

/// Parses a UCI long-algebraic move string ("e2e4", promotions "e7e8q").
/// Shatranj only ever promotes to ferz, so a trailing promotion character
/// other than 'q' is rejected outright rather than silently ignored.
pub fn move_from_uci(uci: &str) -> Result<Move, UciMoveError> {
    let bytes = uci.as_bytes();
    if bytes.len() != 4 && bytes.len() != 5 {
        return Err(UciMoveError::WrongLength { found: bytes.len() });
    }
    let src: Square = uci[0..2].parse().map_err(|_| UciMoveError::BadSquare)?;
    let dst: Square = uci[2..4].parse().map_err(|_| UciMoveError::BadSquare)?;
    if bytes.len() == 5 {
        let promo = bytes[4] as char;
        if promo != 'q' {
            return Err(UciMoveError::BadPromotionChar(promo));
        }
        Ok(Move::promotion(src, dst))
    } else {
        Ok(Move::standard(src, dst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_round_trips_through_to_fen() {
        let position = Position::from_fen(STARTING_FEN).unwrap();
        assert_eq!(position.to_fen(), STARTING_FEN);
    }

    #[test]
    fn non_dash_castling_field_is_rejected() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(Position::from_fen(fen), Err(FenError::CastlingFieldNotDash("KQkq".to_string())));
    }

    #[test]
    fn opponent_already_in_check_is_rejected() {
        // Black to move, but White's king on e1 sits in check from the
        // rook on e8: the side not moving can never legally be in check.
        let fen = "4r3/8/8/8/8/8/8/4K2k b - - 0 1";
        assert_eq!(Position::from_fen(fen), Err(FenError::OpponentInCheck));
    }

    #[test]
    fn move_from_uci_rejects_non_ferz_promotion_char() {
        assert_eq!(move_from_uci("e7e8n"), Err(UciMoveError::BadPromotionChar('n')));
    }

    #[test]
    fn move_from_uci_parses_a_promotion() {
        let mv = move_from_uci("e7e8q").unwrap();
        assert!(mv.is_promotion());
    }
}

#[cfg(feature = "frc")]
pub mod frc {
    //! Scharnagl-index back-rank generation (Chess960-style shuffle)
    //! applied to the Shatranj piece set: alfil takes the bishop's
    //! opposite-color-square constraint (an alfil never leaves the color
    //! of square it started on, exactly like a bishop), and the ferz
    //! fills the queen's slot. Gated behind this feature: SPEC_FULL.md
    //! leaves single/double FRC support as an Open Question, resolved in
    //! favor of keeping it but off by default.

    use super::*;

    const KNIGHT_PLACEMENTS: [[usize; 2]; 10] =
        [[0, 1], [0, 2], [0, 3], [0, 4], [1, 2], [1, 3], [1, 4], [2, 3], [2, 4], [3, 4]];

    /// Builds the back-rank piece order for Scharnagl index `0..960`.
    fn back_rank(mut index: u32) -> Result<[PieceType; 8], FenError> {
        if index >= 960 {
            return Err(FenError::InvalidFullmoveNumber(index.to_string()));
        }
        let mut slots: [Option<PieceType>; 8] = [None; 8];

        let light_bishop_file = (index % 4) * 2 + 1;
        index /= 4;
        let dark_bishop_file = (index % 4) * 2;
        index /= 4;
        slots[light_bishop_file as usize] = Some(PieceType::Alfil);
        slots[dark_bishop_file as usize] = Some(PieceType::Alfil);

        let mut empties: Vec<usize> = (0..8).filter(|&f| slots[f].is_none()).collect();
        let queen_slot = (index % 6) as usize;
        index /= 6;
        slots[empties.remove(queen_slot)] = Some(PieceType::Ferz);

        let knight_slots = KNIGHT_PLACEMENTS[index as usize];
        slots[empties[knight_slots[0]]] = Some(PieceType::Knight);
        slots[empties[knight_slots[1]]] = Some(PieceType::Knight);

        let remaining: Vec<usize> = (0..8).filter(|&f| slots[f].is_none()).collect();
        slots[remaining[0]] = Some(PieceType::Rook);
        slots[remaining[1]] = Some(PieceType::King);
        slots[remaining[2]] = Some(PieceType::Rook);

        let mut rank = [PieceType::Pawn; 8];
        for (file, slot) in slots.into_iter().enumerate() {
            rank[file] = slot.expect("every back-rank file must be assigned exactly once");
        }
        Ok(rank)
    }

    pub fn from_scharnagl_index(index: u32) -> Result<Position, FenError> {
        from_dfrc_indices(index, index)
    }

    /// Double-FRC: white and black back ranks are generated independently,
    /// allowing asymmetric starting setups.
    pub fn from_dfrc_indices(white_index: u32, black_index: u32) -> Result<Position, FenError> {
        let white_rank = back_rank(white_index)?;
        let black_rank = back_rank(black_index)?;

        let mut boards = PositionBoards::empty();
        let mut kings = Kings { white: Square::from_index(0), black: Square::from_index(0) };

        for file in 0..8u8 {
            let w_piece = Piece::new(white_rank[file as usize], Color::White);
            boards.set_piece(Square::from_rank_file(0, file), w_piece);
            boards.set_piece(Square::from_rank_file(1, file), Piece::new(PieceType::Pawn, Color::White));
            if white_rank[file as usize] == PieceType::King {
                kings.white = Square::from_rank_file(0, file);
            }

            let b_piece = Piece::new(black_rank[file as usize], Color::Black);
            boards.set_piece(Square::from_rank_file(7, file), b_piece);
            boards.set_piece(Square::from_rank_file(6, file), Piece::new(PieceType::Pawn, Color::Black));
            if black_rank[file as usize] == PieceType::King {
                kings.black = Square::from_rank_file(7, file);
            }
        }

        let key = zobrist_key_for(&boards, false);
        let checkers = legality::compute_checkers(&boards, kings.white, Color::White);
        let pinned = legality::compute_pinned(&boards, kings.white, Color::White);
        let threats = legality::compute_threats(&boards, kings.white, Color::White);

        let mut position = Position::empty_at(false, 1);
        position.push_initial_state(BoardState { boards, key, checkers, pinned, threats, kings, halfmove: 0 });
        Ok(position)
    }
}
