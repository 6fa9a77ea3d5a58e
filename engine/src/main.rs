use std::env::args;
use std::time::Duration;

use chess::board::{Board, START_FEN};
use chess::utils::{perft, perft_bench, perft_test};
use log::LevelFilter;
use oriel::get_best_move;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const DEFAULT_SEARCH_TIME_MS: u64 = 5_000;

fn init_logging() {
    // logging is best-effort, the engine works fine without it
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// The remaining arguments as a FEN string, or the starting position
fn fen_from_args(cli_args: impl Iterator<Item = String>) -> String {
    let rest: Vec<String> = cli_args.collect();
    if rest.is_empty() {
        START_FEN.to_string()
    } else {
        rest.join(" ")
    }
}

fn parse_board(fen: &str) -> Board {
    match Board::from_fen(fen) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("invalid FEN '{fen}': {err}");
            std::process::exit(1);
        }
    }
}

fn usage() -> ! {
    eprintln!("usage: oriel <command>");
    eprintln!("  perft <depth> [fen]    count leaf nodes to <depth>");
    eprintln!("  divide <depth> [fen]   perft split by root move");
    eprintln!("  search <depth> [fen]   pick a move, depth 0 = timed");
    eprintln!("  bench                  run the perft suite");
    std::process::exit(2);
}

fn parse_depth(arg: Option<String>) -> usize {
    match arg.and_then(|s| s.parse().ok()) {
        Some(depth) => depth,
        None => usage(),
    }
}

fn main() {
    init_logging();

    let mut cli_args = args();
    cli_args.next();

    match cli_args.next().as_deref() {
        Some("perft") => {
            let depth = parse_depth(cli_args.next());
            let mut board = parse_board(&fen_from_args(cli_args));

            let start = std::time::Instant::now();
            let nodes = perft(&mut board, depth);
            let elapsed = start.elapsed();

            println!("perft({depth}) = {nodes} in {}ms", elapsed.as_millis());
        }

        Some("divide") => {
            let depth = parse_depth(cli_args.next());
            let mut board = parse_board(&fen_from_args(cli_args));
            perft_test(&mut board, depth);
        }

        Some("search") => {
            let depth = parse_depth(cli_args.next()) as u32;
            let board = parse_board(&fen_from_args(cli_args));

            let deadline =
                (depth == 0).then(|| Duration::from_millis(DEFAULT_SEARCH_TIME_MS));
            let result = get_best_move(&board, depth, deadline);

            println!(
                "bestmove {} score {} time {}ms",
                result.best,
                result.score,
                result.time.as_millis()
            );
        }

        Some("bench") => {
            if !perft_bench() {
                std::process::exit(1);
            }
        }

        _ => usage(),
    }
}
