//! FEN (Forsyth-Edwards Notation) parsing and emission for the `Board`.
//!
//! Six space-separated fields: piece placement, side to move, castling
//! rights, en-passant square, halfmove clock and fullmove number. A
//! malformed string is reported through [`FenParseError`]; the board is
//! only replaced on success.

use thiserror::Error;

use super::Board;
use crate::core::*;

/******************************************\
|==========================================|
|            Useful fen strings            |
|==========================================|
\******************************************/

/// FEN string for the standard chess starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
/// FEN string for a complex position often used for testing ("Kiwipete").
pub const TRICKY_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/******************************************\
|==========================================|
|               Parse Fen                  |
|==========================================|
\******************************************/

impl Board {
    pub const FEN_SECTIONS: usize = 6;

    /// # Set Board State from FEN String
    ///
    /// Parses a FEN string and replaces the board state with it.
    ///
    /// ## Errors
    /// Returns `FenParseError` if:
    /// * The FEN string does not have exactly 6 fields.
    /// * Any field contains invalid characters or formatting.
    /// * The position itself is unusable: a missing or duplicated king,
    ///   more than sixteen pieces of one colour, or a castling right
    ///   without its rook.
    pub fn set(&mut self, fen: &str) -> Result<(), FenParseError> {
        let parts: Vec<&str> = fen.split_whitespace().take(Self::FEN_SECTIONS).collect();

        if parts.len() != Self::FEN_SECTIONS {
            return Err(FenParseError::InvalidNumberOfFields);
        }

        *self = Board::new();

        // --- 1. Parse Piece Placements ---

        let mut file: u8 = 0;
        let mut rank: u8 = 7;

        for token in parts[0].chars() {
            if file > 8 {
                return Err(FenParseError::InvalidRankFormat(
                    "Too many pieces on a rank or the skip was too big".to_string(),
                ));
            }

            match token {
                '/' => {
                    if file != 8 {
                        return Err(FenParseError::InvalidRankFormat(
                            "Rank ended prematurely before '/'".to_string(),
                        ));
                    }

                    file = 0;

                    if rank == 0 {
                        return Err(FenParseError::InvalidRankFormat(
                            "Too many rank separators ('/')".to_string(),
                        ));
                    }

                    rank -= 1;
                }
                '1'..='8' => {
                    file += token.to_digit(10).unwrap() as u8;
                }
                _ => {
                    if token.is_ascii_digit() {
                        return Err(FenParseError::InvalidRankFormat(format!(
                            "Invalid skip digit '{}' (must be 1-8)",
                            token,
                        )));
                    }

                    if file >= 8 {
                        return Err(FenParseError::InvalidRankFormat(format!(
                            "Piece placement '{}' attempted beyond file H on rank {}",
                            token,
                            rank + 1
                        )));
                    }

                    let square = Square::from_unchecked(rank * 8 + file);
                    let piece = token
                        .to_string()
                        .parse::<Piece>()
                        .map_err(|_| FenParseError::InvalidPiecePlacementChar(token))?;

                    if self.add_piece(piece, square).is_none() {
                        return Err(FenParseError::InvalidPosition(format!(
                            "More than {} {:?} pieces on the board",
                            crate::board::PieceSet::CAPACITY,
                            piece.colour(),
                        )));
                    }

                    file += 1;
                }
            }
        }

        if file != 8 || rank != 0 {
            return Err(FenParseError::InvalidRankFormat(
                "Fen string does not cover all 64 squares".to_string(),
            ));
        }

        for col in Colour::iter() {
            if self.piece_set(col).count_of(PieceType::King) != 1 {
                return Err(FenParseError::InvalidPosition(format!(
                    "There should be exactly one {:?} king on the board",
                    col
                )));
            }
        }

        // --- 2. Parse Side To Move ---
        let stm = match parts[1] {
            "w" => Colour::White,
            "b" => Colour::Black,
            _ => return Err(FenParseError::InvalidSideToMove(parts[1].to_string())),
        };

        // --- 3. Parse Castling Rights ---
        self.parse_castling(parts[2])?;

        // --- 4. Parse En Passant Square ---
        match parts[3] {
            "-" => self.enpassant = None,
            _ => {
                let ep_sq: Square = parts[3]
                    .parse()
                    .map_err(|_| FenParseError::InvalidEnPassantSquare(parts[3].to_string()))?;

                if ep_sq.rank() != Rank::Rank3 && ep_sq.rank() != Rank::Rank6 {
                    return Err(FenParseError::InvalidEnPassantSquare(format!(
                        "{ep_sq} is not a valid en passant square"
                    )));
                }

                self.enpassant = Some(ep_sq);
            }
        }

        // --- 5. Parse Halfmove Clock (Fifty-move rule counter) ---
        self.fifty_move = parts[4]
            .parse()
            .map_err(|_| FenParseError::InvalidHalfmoveClock(parts[4].to_string()))?;

        // --- 6. Parse Fullmove Number ---
        let full_move_number: u16 = parts[5]
            .parse()
            .map_err(|_| FenParseError::InvalidFullmoveNumber(parts[5].to_string()))?;

        if full_move_number == 0 {
            return Err(FenParseError::InvalidFullmoveNumber(format!(
                "Fullmove number cannot be 0, found: {}",
                parts[5]
            )));
        }

        // Ply = (full moves - 1) * 2 + (0 if White to move, 1 if Black)
        self.halfmove = (full_move_number - 1) * 2 + stm as u16;

        // --- 7. Build the snapshot ---
        self.update_masks();

        Ok(())
    }

    /// # Board constructor from a FEN string
    ///
    /// ## Errors
    /// Same conditions as [`Board::set`].
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let mut board = Board::new();
        board.set(fen)?;
        Ok(board)
    }

    /// # Get FEN String
    ///
    /// Emits the current position in FEN. Parsing the result reproduces
    /// the same board.
    ///
    /// ## Example
    ///
    /// ```
    /// use chess::board::{Board, START_FEN};
    /// let board = Board::default();
    /// assert_eq!(board.fen(), START_FEN);
    /// ```
    pub fn fen(&self) -> String {
        let mut fen = String::new();

        // --- 1. Piece Placement ---
        for rank in Rank::iter().rev() {
            let mut empty_count = 0;
            for file in File::iter() {
                let square = Square::from_parts(file, rank);
                match self.on(square) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push_str(&piece.to_string());
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank != Rank::Rank1 {
                fen.push('/');
            }
        }

        // --- 2. Side to Move ---
        fen.push(' ');
        fen.push_str(match self.stm() {
            Colour::White => "w",
            Colour::Black => "b",
        });

        // --- 3. Castling Rights ---
        fen.push_str(&format!(" {}", self.castling()));

        // --- 4. En Passant Square ---
        fen.push(' ');
        match self.ep() {
            Some(square) => fen.push_str(&square.to_string()),
            None => fen.push('-'),
        }

        // --- 5. Halfmove Clock ---
        fen.push_str(&format!(" {}", self.fifty_move));

        // --- 6. Fullmove Number ---
        fen.push_str(&format!(" {}", (self.halfmove / 2) + 1));

        fen
    }

    /// # Parse Castling Rights Field
    ///
    /// Accepts a subset of `KQkq` or `-`. Each right requires its rook on
    /// the canonical starting square.
    fn parse_castling(&mut self, castling: &str) -> Result<(), FenParseError> {
        self.rights = Castling::NONE;

        if castling == "-" {
            return Ok(());
        }

        for c in castling.chars() {
            let (right, col, rook_sq) = match c {
                'K' => (Castling::WK, Colour::White, Square::H1),
                'Q' => (Castling::WQ, Colour::White, Square::A1),
                'k' => (Castling::BK, Colour::Black, Square::H8),
                'q' => (Castling::BQ, Colour::Black, Square::A8),
                // '-' is only valid on its own, handled above
                _ => return Err(FenParseError::InvalidCastlingChar(c)),
            };

            if self.rights.has(right) {
                return Err(FenParseError::InvalidCastlingChar(c));
            }

            if self.on(rook_sq) != Some(Piece::from_parts(col, PieceType::Rook)) {
                return Err(FenParseError::InvalidPosition(format!(
                    "Castling right '{}' without a rook on {}",
                    c, rook_sq
                )));
            }
            if self.on(Square::E1.relative(col))
                != Some(Piece::from_parts(col, PieceType::King))
            {
                return Err(FenParseError::InvalidPosition(format!(
                    "Castling right '{}' with the king off its starting square",
                    c
                )));
            }

            self.rights.set(right);
        }

        Ok(())
    }
}

/******************************************\
|==========================================|
|             Fen Parse Errors             |
|==========================================|
\******************************************/

/// Errors that can occur while parsing a FEN string.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FenParseError {
    #[error("FEN string must have 6 fields separated by spaces")]
    InvalidNumberOfFields,
    #[error("Invalid character in FEN piece placement: '{0}'")]
    InvalidPiecePlacementChar(char),
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
    #[error("Invalid rank format: {0}")]
    InvalidRankFormat(String),
    #[error("Invalid halfmove clock value: {0}")]
    InvalidHalfmoveClock(String),
    #[error("Invalid fullmove number value: {0}")]
    InvalidFullmoveNumber(String),
    #[error("Invalid en passant target square: {0}")]
    InvalidEnPassantSquare(String),
    #[error("Invalid side to move: {0}")]
    InvalidSideToMove(String),
    #[error("Invalid character in FEN castling availability: {0}")]
    InvalidCastlingChar(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_fen() {
        let mut board = Board::new();
        assert!(board.set(START_FEN).is_ok());

        assert_eq!(board.on(Square::A1), Some(Piece::WhiteRook));
        assert_eq!(board.on(Square::E1), Some(Piece::WhiteKing));
        assert_eq!(board.on(Square::H8), Some(Piece::BlackRook));
        assert_eq!(board.on(Square::D8), Some(Piece::BlackQueen));
        assert_eq!(board.on(Square::E4), None);
        assert_eq!(board.stm(), Colour::White);
        assert_eq!(board.castling(), Castling::ALL);
        assert_eq!(board.ep(), None);
        assert_eq!(board.fifty_move(), 0);
        assert_eq!(board.half_moves(), 0);
        assert_eq!(board.fen(), START_FEN);
    }

    #[test]
    fn test_parse_tricky_fen() {
        let mut board = Board::new();
        assert!(board.set(TRICKY_FEN).is_ok());

        assert_eq!(board.on(Square::A8), Some(Piece::BlackRook));
        assert_eq!(board.on(Square::E8), Some(Piece::BlackKing));
        assert_eq!(board.on(Square::F3), Some(Piece::WhiteQueen));
        assert_eq!(board.on(Square::C3), Some(Piece::WhiteKnight));
        assert_eq!(board.on(Square::H3), Some(Piece::BlackPawn));
        assert_eq!(board.stm(), Colour::White);
        assert_eq!(board.castling(), Castling::ALL);
        assert_eq!(board.ep(), None);
        assert_eq!(board.fen(), TRICKY_FEN);
    }

    #[test]
    fn test_parse_seeds_snapshot() {
        let board = Board::from_fen(TRICKY_FEN).unwrap();
        assert_eq!(board.generate_full_set(), board.bitboards);
    }

    #[test]
    fn test_fen_invalid_piece() {
        let mut board = Board::new();
        let fen = "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidPiecePlacementChar('x'))
        ));
    }

    #[test]
    fn test_fen_invalid_rank_lengths() {
        let mut board = Board::new();

        // rank 2 has only seven files before '/'
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidRankFormat(_))
        ));

        // rank 1 ends short at the end of the string
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN w KQkq - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidRankFormat(_))
        ));

        // nine files implied
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidRankFormat(_))
        ));

        // bad skip digits
        let fen = "rnbqkbnr/pppp0ppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidRankFormat(_))
        ));
        let fen = "rnbqkbnr/pppp9ppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidRankFormat(_))
        ));
    }

    #[test]
    fn test_fen_wrong_rank_count() {
        let mut board = Board::new();

        let fen = "8/8/8/8/8/8/8/8/8 w - - 0 1"; // 9 ranks
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidRankFormat(_))
        ));

        let fen = "8/8/8/8/8/8/8 w - - 0 1"; // 7 ranks
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidRankFormat(_))
        ));
    }

    #[test]
    fn test_fen_missing_fields() {
        let mut board = Board::new();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidNumberOfFields)
        ));
    }

    #[test]
    fn test_fen_invalid_side() {
        let mut board = Board::new();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1";
        assert!(matches!(board.set(fen), Err(FenParseError::InvalidSideToMove(s)) if s == "x"));
    }

    #[test]
    fn test_fen_invalid_castling() {
        let mut board = Board::new();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQXkq - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidCastlingChar('X'))
        ));

        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w K-q - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidCastlingChar('-'))
        ));
    }

    #[test]
    fn test_fen_castling_needs_rook_in_place() {
        let mut board = Board::new();
        // kingside right claimed but the h1 rook is missing
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN1 w K - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_fen_requires_both_kings() {
        let mut board = Board::new();
        let fen = "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidPosition(_))
        ));

        let fen = "rnbqkbnr/pppppppp/8/8/2k5/8/PPPPPPPP/RNBQKBNR w - - 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_fen_invalid_enpassant() {
        let mut board = Board::new();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1";
        assert!(
            matches!(board.set(fen), Err(FenParseError::InvalidEnPassantSquare(s)) if s == "e9")
        );
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq zz 0 1";
        assert!(
            matches!(board.set(fen), Err(FenParseError::InvalidEnPassantSquare(s)) if s == "zz")
        );
        // right format, impossible rank
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn test_fen_invalid_clocks() {
        let mut board = Board::new();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - fifty 1";
        assert!(
            matches!(board.set(fen), Err(FenParseError::InvalidHalfmoveClock(s)) if s == "fifty")
        );
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 zero";
        assert!(
            matches!(board.set(fen), Err(FenParseError::InvalidFullmoveNumber(s)) if s == "zero")
        );
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0";
        assert!(matches!(
            board.set(fen),
            Err(FenParseError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn test_fen_ply_calculation() {
        let mut board = Board::new();

        // after 1. e4, Black to move (move 1) -> ply 1
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert!(board.set(fen).is_ok());
        assert_eq!(board.half_moves(), 1);
        assert_eq!(board.stm(), Colour::Black);
        assert_eq!(board.fen(), fen);

        // after 1. e4 c5, White to move (move 2) -> ply 2
        let fen = "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2";
        assert!(board.set(fen).is_ok());
        assert_eq!(board.half_moves(), 2);
        assert_eq!(board.stm(), Colour::White);
        assert_eq!(board.fen(), fen);

        // move 10, White to move -> ply 18
        let fen = "r1bqkbnr/pp1ppppp/2n5/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 1 10";
        assert!(board.set(fen).is_ok());
        assert_eq!(board.half_moves(), 18);

        // move 10, Black to move -> ply 19
        let fen = "r1bqkbnr/pp1ppppp/2n5/2p5/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq d3 0 10";
        assert!(board.set(fen).is_ok());
        assert_eq!(board.half_moves(), 19);
        assert_eq!(board.stm(), Colour::Black);
    }

    #[test]
    fn test_fen_round_trip_on_perft_suite() {
        let fens = [
            START_FEN,
            TRICKY_FEN,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        ];

        for fen in fens {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(board.fen(), fen, "round trip failed for {}", fen);
            let reparsed = Board::from_fen(&board.fen()).unwrap();
            assert_eq!(board, reparsed);
        }
    }
}
