use crate::learning::qtable::QTable;
use crate::logic::Position;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod move_order;
pub mod score_table;
pub mod search;


pub use score_table::ScoreTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Deepest depth that fully completed.
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
    /// White-referenced value of the chosen move at `depth`.
    pub score: i32,
}

/// Static evaluation, always from White's point of view.
pub trait Evaluator<P: Position> {
    fn evaluate(&self, position: &P) -> i32;
}

pub trait Searcher<P: Position> {
    /// Pick a move for the side to move. `position` is returned unchanged.
    fn search(
        &mut self,
        position: &mut P,
        table: &QTable,
    ) -> (Option<P::Move>, Option<ScoreTable>);
}
