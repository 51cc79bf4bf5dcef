use crate::engine::config::EngineConfig;
use crate::engine::eval::MaterialEvaluator;
use crate::engine::move_order::order_moves;
use crate::engine::score_table::ScoreTable;
use crate::engine::{Evaluator, SearchStats, Searcher};
use crate::learning::qtable::QTable;
use crate::logic::eval_constants::INFINITY;
use crate::logic::{Position, Side};
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Depth-limited minimax with alpha-beta pruning, driven by iterative
/// deepening under a wall-clock budget.
///
/// All scores are White-referenced. The position is mutated in place with
/// `apply`/`revert` and is identical to its input once a call returns.
pub struct AlphaBetaEngine<E = MaterialEvaluator> {
    config: Arc<EngineConfig>,
    evaluator: E,
    stats: SearchStats,
}

impl AlphaBetaEngine<MaterialEvaluator> {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self::with_evaluator(config.clone(), MaterialEvaluator::new(config))
    }
}

impl<E> AlphaBetaEngine<E> {
    pub fn with_evaluator(config: Arc<EngineConfig>, evaluator: E) -> Self {
        Self {
            config,
            evaluator,
            stats: SearchStats::default(),
        }
    }

    pub const fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    pub const fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Statistics of the most recent `iterative_deepening` call.
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Fail-soft alpha-beta. `maximizing` alternates every ply and is not
    /// derived from the side to move.
    pub fn alpha_beta<P>(
        &mut self,
        position: &mut P,
        table: &QTable,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.stats.nodes += 1;

        if depth == 0 || position.is_game_over() {
            return self.evaluator.evaluate(position);
        }

        let moves = order_moves(position, table);
        if moves.is_empty() {
            return self.evaluator.evaluate(position);
        }

        if maximizing {
            let mut value = -INFINITY;
            for mv in moves {
                position.apply(mv);
                let score = self.alpha_beta(position, table, depth - 1, alpha, beta, false);
                position.revert();
                value = value.max(score);
                alpha = alpha.max(value);
                if alpha >= beta {
                    break; // beta cut-off
                }
            }
            value
        } else {
            let mut value = INFINITY;
            for mv in moves {
                position.apply(mv);
                let score = self.alpha_beta(position, table, depth - 1, alpha, beta, true);
                position.revert();
                value = value.min(score);
                beta = beta.min(value);
                if alpha >= beta {
                    break; // alpha cut-off
                }
            }
            value
        }
    }

    /// Search depth 1, 2, ... up to `max_depth` and keep the best move of the
    /// deepest depth that finished. The time budget is only checked before a
    /// depth starts, so a depth is never cut short.
    ///
    /// Returns `(None, None)` when there are no legal moves.
    pub fn iterative_deepening<P>(
        &mut self,
        position: &mut P,
        table: &QTable,
    ) -> (Option<P::Move>, Option<ScoreTable>)
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.iterative_deepening_from(position, table, Instant::now())
    }

    pub(crate) fn iterative_deepening_from<P>(
        &mut self,
        position: &mut P,
        table: &QTable,
        start_time: Instant,
    ) -> (Option<P::Move>, Option<ScoreTable>)
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.stats = SearchStats::default();

        let root_moves = order_moves(position, table);
        if root_moves.is_empty() {
            return (None, None);
        }

        // White keeps the highest reply value, Black the lowest.
        let root_maximizes = position.side_to_move() == Side::White;
        let time_limit = Duration::from_millis(self.config.time_limit_ms);

        let mut best_move = None;
        let mut scores = ScoreTable::new(position.side_to_move());

        for depth in 1..=self.config.max_depth {
            if start_time.elapsed() > time_limit {
                debug!("Time limit ({time_limit:?}) reached before depth {depth}");
                break;
            }

            let mut current_best = None;
            let mut current_value = if root_maximizes { -INFINITY } else { INFINITY };

            for &mv in &root_moves {
                position.apply(mv);
                let value = self.alpha_beta(
                    position,
                    table,
                    depth - 1,
                    -INFINITY,
                    INFINITY,
                    !root_maximizes,
                );
                position.revert();

                scores.record(depth, position.move_identity(&mv), value);

                let improves = if root_maximizes {
                    value > current_value
                } else {
                    value < current_value
                };
                if improves {
                    current_value = value;
                    current_best = Some(mv);
                }
            }

            if let Some(mv) = current_best {
                best_move = Some(mv);
                self.stats.depth = depth;
                self.stats.score = current_value;
                debug!(
                    "depth {depth}: best {} score {current_value} nodes {}",
                    position.move_identity(&mv),
                    self.stats.nodes
                );
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        {
            self.stats.time_ms = start_time.elapsed().as_millis() as u64;
        }

        (best_move, Some(scores))
    }
}

impl<P, E> Searcher<P> for AlphaBetaEngine<E>
where
    P: Position,
    E: Evaluator<P>,
{
    fn search(&mut self, position: &mut P, table: &QTable) -> (Option<P::Move>, Option<ScoreTable>) {
        self.iterative_deepening(position, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::ChessBoard;

    fn engine(max_depth: u8) -> AlphaBetaEngine {
        AlphaBetaEngine::new(Arc::new(EngineConfig {
            max_depth,
            time_limit_ms: 60_000,
            ..EngineConfig::default()
        }))
    }

    #[test]
    fn test_depth_zero_is_static_eval() {
        let mut engine = engine(1);
        let mut board = ChessBoard::new();
        let table = QTable::default();
        let value = engine.alpha_beta(&mut board, &table, 0, -INFINITY, INFINITY, true);
        assert_eq!(value, 0);
        assert_eq!(engine.stats().nodes, 1);
    }

    #[test]
    fn test_alpha_beta_leaves_position_unchanged() {
        let mut engine = engine(3);
        let mut board = ChessBoard::new();
        let before = board.clone();
        let table = QTable::default();

        let _ = engine.alpha_beta(&mut board, &table, 3, -INFINITY, INFINITY, true);

        assert_eq!(board, before);
    }

    #[test]
    fn test_opening_search_has_two_full_rows() {
        let mut engine = engine(2);
        let mut board = ChessBoard::new();
        let before = board.clone();
        let table = QTable::default();

        let (best, scores) = engine.iterative_deepening(&mut board, &table);

        let best = best.unwrap();
        let scores = scores.unwrap();
        assert!(board.legal_moves().contains(&best));
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.row(1).unwrap().len(), 20);
        assert_eq!(scores.row(2).unwrap().len(), 20);
        assert_eq!(engine.stats().depth, 2);
        assert!(engine.stats().nodes > 20);
        assert_eq!(board, before);
    }

    #[test]
    fn test_no_moves_returns_none_without_searching() {
        let mut engine = engine(3);
        let mut board = ChessBoard::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        let table = QTable::default();

        let (best, scores) = engine.iterative_deepening(&mut board, &table);

        assert!(best.is_none());
        assert!(scores.is_none());
        assert_eq!(engine.stats().nodes, 0);
    }

    #[test]
    fn test_best_move_matches_deepest_row() {
        let mut engine = engine(3);
        let mut board = ChessBoard::new();
        let table = QTable::default();

        let (best, scores) = engine.iterative_deepening(&mut board, &table);
        let best = board.move_identity(&best.unwrap());
        let scores = scores.unwrap();

        let deepest = scores.deepest().unwrap();
        assert_eq!(deepest, 3);
        assert_eq!(scores.best(deepest).map(|e| e.mv.clone()), Some(best));
    }

    #[test]
    fn test_best_move_matches_deepest_row_for_black() {
        let mut engine = engine(2);
        let mut board = ChessBoard::from_fen("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
        let table = QTable::default();

        let (best, scores) = engine.iterative_deepening(&mut board, &table);
        let best = board.move_identity(&best.unwrap());
        let scores = scores.unwrap();

        assert_eq!(best, "a8a1");
        assert_eq!(scores.root(), Side::Black);
        for depth in scores.depths() {
            assert_eq!(scores.best(depth).map(|e| e.mv.clone()), Some(best.clone()));
        }
    }

    #[test]
    fn test_depth_one_scores_are_static_evals() {
        let mut engine = engine(1);
        let mut board = ChessBoard::new();
        let table = QTable::default();

        let (_, scores) = engine.iterative_deepening(&mut board, &table);
        let scores = scores.unwrap();

        // Pawn to a centre square earns the centre bonus, anything else is level
        assert_eq!(scores.get(1, "e2e4"), Some(20));
        assert_eq!(scores.get(1, "d2d4"), Some(20));
        assert_eq!(scores.get(1, "e2e3"), Some(0));
        assert_eq!(scores.get(1, "g1f3"), Some(0));
    }
}
