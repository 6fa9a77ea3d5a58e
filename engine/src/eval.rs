//! Hand-crafted evaluation: material plus piece-square tables, tapered
//! between a midgame and an endgame weighting by the non-pawn material
//! left on the board.

use chess::board::Board;
use chess::{Colour, PieceType, Square};

pub type Eval = i32;

/******************************************\
|==========================================|
|               Piece Values               |
|==========================================|
\******************************************/

// Modified Larry Kaufman scoring, bishops slightly ahead of knights:
// B > N > 3P, B + N > R + P.
const PAWN_MID: Eval = 100;
const KNIGHT_MID: Eval = 325;
const BISHOP_MID: Eval = 360;
const ROOK_MID: Eval = 525;
const QUEEN_MID: Eval = 1000;

const PAWN_END: Eval = 108;
const KNIGHT_END: Eval = 334;
const BISHOP_END: Eval = 378;
const ROOK_END: Eval = 556;
const QUEEN_END: Eval = 1070;

const MID_VALUES: [Eval; PieceType::NUM] =
    [PAWN_MID, KNIGHT_MID, BISHOP_MID, ROOK_MID, QUEEN_MID, 0];
const END_VALUES: [Eval; PieceType::NUM] =
    [PAWN_END, KNIGHT_END, BISHOP_END, ROOK_END, QUEEN_END, 0];

/// Phase contribution per piece type, 24 at full material
const PHASE_WEIGHTS: [i32; PieceType::NUM] = [0, 1, 1, 2, 4, 0];
const FULL_PHASE: i32 = 24;

/******************************************\
|==========================================|
|            Piece-Square Tables           |
|==========================================|
\******************************************/

// Index 0 is a1, so the tables read upside-down relative to a printed
// board. Black mirrors through a rank flip.
#[rustfmt::skip]
const PAWNS_MID: [Eval; Square::NUM] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-20,-20, 10, 10,  5,
     5, -5,-10,  0,  0,-10, -5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5,  5, 10, 25, 25, 10,  5,  5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWNS_END: [Eval; Square::NUM] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
    10, 10, 10, 10, 10, 10, 10, 10,
    10, 10, 10, 10, 10, 10, 10, 10,
    20, 20, 20, 20, 20, 20, 20, 20,
    30, 30, 30, 30, 30, 30, 30, 30,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHTS: [Eval; Square::NUM] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOPS: [Eval; Square::NUM] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOKS: [Eval; Square::NUM] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const QUEENS: [Eval; Square::NUM] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -10,  5,  5,  5,  5,  5,  0,-10,
      0,  0,  5,  5,  5,  5,  0, -5,
     -5,  0,  5,  5,  5,  5,  0, -5,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MID: [Eval; Square::NUM] = [
     20, 30, 10,  0,  0, 10, 30, 20,
     20, 20,  0,  0,  0,  0, 20, 20,
    -10,-20,-20,-20,-20,-20,-20,-10,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
];

#[rustfmt::skip]
const KING_END: [Eval; Square::NUM] = [
    -50,-30,-30,-30,-30,-30,-30,-50,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -50,-40,-30,-20,-20,-30,-40,-50,
];

#[inline]
fn table_mid(pt: PieceType) -> &'static [Eval; Square::NUM] {
    match pt {
        PieceType::Pawn => &PAWNS_MID,
        PieceType::Knight => &KNIGHTS,
        PieceType::Bishop => &BISHOPS,
        PieceType::Rook => &ROOKS,
        PieceType::Queen => &QUEENS,
        PieceType::King => &KING_MID,
    }
}

#[inline]
fn table_end(pt: PieceType) -> &'static [Eval; Square::NUM] {
    match pt {
        PieceType::Pawn => &PAWNS_END,
        PieceType::Knight => &KNIGHTS,
        PieceType::Bishop => &BISHOPS,
        PieceType::Rook => &ROOKS,
        PieceType::Queen => &QUEENS,
        PieceType::King => &KING_END,
    }
}

/******************************************\
|==========================================|
|                Evaluation                |
|==========================================|
\******************************************/

/// Blend the midgame and endgame scores by remaining non-pawn material
#[inline]
fn two_phase_lerp(phase: i32, mid: Eval, end: Eval) -> Eval {
    (mid * phase + end * (FULL_PHASE - phase)) / FULL_PHASE
}

fn side_score(board: &Board, col: Colour, phase: i32) -> Eval {
    let mut score = 0;

    for (_, data) in board.piece_set(col).iter() {
        let sq = data.sq.relative(col).index();

        let mid = MID_VALUES[data.pt.index()] + table_mid(data.pt)[sq];
        let end = END_VALUES[data.pt.index()] + table_end(data.pt)[sq];

        score += two_phase_lerp(phase, mid, end);
    }

    score
}

fn game_phase(board: &Board) -> i32 {
    let mut phase = 0;

    for col in Colour::iter() {
        for (_, data) in board.piece_set(col).iter() {
            phase += PHASE_WEIGHTS[data.pt.index()];
        }
    }

    phase.min(FULL_PHASE)
}

/// Static evaluation from the side to move's perspective, in centipawns.
pub fn evaluate(board: &Board) -> Eval {
    let phase = game_phase(board);

    let white = side_score(board, Colour::White, phase);
    let black = side_score(board, Colour::Black, phase);

    match board.stm() {
        Colour::White => white - black,
        Colour::Black => black - white,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::board::START_FEN;

    #[test]
    fn test_start_position_is_balanced() {
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(evaluate(&board), 0);
    }

    #[test]
    fn test_symmetric_for_both_sides() {
        // same position with the move handed over scores the negation
        let white = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&white), -evaluate(&black));
        assert!(evaluate(&white) > 0);
    }

    #[test]
    fn test_material_dominates() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let score = evaluate(&board);
        assert!(score > 400, "a clean rook up should score at least a rook");
    }

    #[test]
    fn test_eval_stays_inside_search_bounds() {
        // even an absurd material imbalance stays far from the mate range
        let board = Board::from_fen("QQQQQQQQ/QQQQQQQ1/8/8/k7/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&board).abs() < 25_000);
    }
}
