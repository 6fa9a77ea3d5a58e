//! # oriel chess core
//!
//! Board representation, an incrementally maintained bitboard snapshot
//! (occupancy, visibility, check and pin lines) and a legal move generator
//! with the make/unmake machinery that keeps the snapshot consistent
//! across recursive search. Search, evaluation and the CLI live in the
//! `engine` crate on top of this one.
#![allow(dead_code)]
pub mod board;
pub mod core;
pub mod utils;

pub use crate::core::*;
pub use board::Board;
