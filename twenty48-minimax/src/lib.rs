#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! This crate picks moves for the sliding tile game 2048. The board model and move rules live in
//! [board] and [moves], a heuristic evaluation in [heuristic], and the search itself in
//! [alpha_beta].
//!
//! [wire] is the JSON form boards travel in, and [worker] runs searches on a background thread
//! so a caller can hand off a board and keep going.

pub mod alpha_beta;
pub mod board;
pub mod heuristic;
pub mod moves;
pub mod wire;
pub mod worker;
