use crate::learning::qtable::QTable;
use crate::logic::Position;

/// Legal moves sorted by learned preference, best first.
///
/// The sort is stable, so moves with equal preference (including every move
/// the table has never seen) keep the rules engine's enumeration order.
pub fn order_moves<P: Position>(position: &P, table: &QTable) -> Vec<P::Move> {
    let fen = position.identity();
    let mut scored: Vec<(f64, P::Move)> = position
        .legal_moves()
        .into_iter()
        .map(|mv| (table.get_q(&fen, &position.move_identity(&mv)), mv))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, mv)| mv).collect()
}
