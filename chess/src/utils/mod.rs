pub mod perft;

pub use perft::{perft, perft_bench, perft_test, PERFT_SUITE};
