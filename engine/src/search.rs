//! Fixed-depth negamax over the core's legal move generator, wrapped in an
//! iterative-deepening loop with a deadline check between depths.

use std::time::{Duration, Instant};

use chess::board::Board;
use chess::Move;

use crate::eval::{evaluate, Eval};

/// Finite score sentinel. Kept well inside `i32` so negating a child score
/// can never overflow, and well outside anything the evaluation returns.
pub const INF: Eval = 30_000;

/// Scores at or beyond this are forced mates
pub const MATE_BOUND: Eval = INF - 1_000;

/// The outcome of one search: wall time spent, the score from the side to
/// move's perspective and the move to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub time: Duration,
    pub score: Eval,
    pub best: Move,
}

fn negamax(board: &mut Board, depth: u32, ply: u16) -> Eval {
    if depth == 0 {
        return evaluate(board);
    }

    let moves = board.generate_moves();

    if moves.is_empty() {
        // mate scores carry the ply so nearer mates compare higher
        return if board.in_check() {
            -INF + ply as Eval
        } else {
            0
        };
    }

    let mut best = -INF;

    for move_ in moves.iter() {
        board.make_move(*move_);
        let score = -negamax(board, depth - 1, ply + 1);
        board.unmake_move();

        if score > best {
            best = score;
        }
    }

    best
}

/// Search to `depth`, deepening one ply at a time.
///
/// A depth of 0 searches until the deadline; `max_time` is checked between
/// iterations only, a started iteration runs to completion.
pub fn get_best_move(board: &Board, depth: u32, max_time: Option<Duration>) -> SearchResult {
    debug_assert!(
        depth > 0 || max_time.is_some(),
        "unbounded search needs a deadline"
    );

    let start = Instant::now();
    let mut board = board.clone();

    let mut result = SearchResult {
        time: Duration::ZERO,
        score: -INF,
        best: Move::NONE,
    };

    let max_depth = if depth == 0 { u32::MAX } else { depth };

    for current_depth in 1..=max_depth {
        if max_time.is_some_and(|limit| start.elapsed() >= limit) {
            break;
        }

        let mut best_move = Move::NONE;
        let mut best_score = -INF;

        for move_ in board.generate_moves().iter() {
            board.make_move(*move_);
            let score = -negamax(&mut board, current_depth - 1, 1);
            board.unmake_move();

            if score > best_score {
                best_score = score;
                best_move = *move_;
            }
        }

        result = SearchResult {
            time: start.elapsed(),
            score: best_score,
            best: best_move,
        };

        log::info!(
            "depth {current_depth}: best {} score {} ({} ms)",
            result.best,
            result.score,
            result.time.as_millis()
        );

        if best_score.abs() >= MATE_BOUND {
            // a forced mate does not get better with more depth
            break;
        }
    }

    result.time = start.elapsed();
    result
}
