//! Move selection for chess: a material evaluator, alpha-beta search under
//! iterative deepening, and a per-player value table that learns from
//! every move and from the final result of each game.

pub mod engine;
pub mod learning;
pub mod logic;
