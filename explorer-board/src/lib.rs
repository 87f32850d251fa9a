//! Trick-play state for exploring a single deal.
//!
//! A [`Board`] starts from a notation string and advances one card at a
//! time. Every operation validates before it mutates, so a rejected play
//! leaves the board exactly as it was.

mod board;
mod trick;

pub use board::{Board, BoardError, BoardState};
pub use trick::{Play, Trick};
