use crate::engine::config::EngineConfig;
use crate::engine::eval::MaterialEvaluator;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Evaluator, ScoreTable, SearchStats, Searcher};
use crate::learning::qtable::{QTable, QTableError};
use crate::logic::game::{classify, GameRecord, Outcome};
use crate::logic::{Position, Side};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// One player: a search engine plus the value table it learns into.
///
/// Each `decide` writes a one-step shaping reward for the chosen move; at the
/// end of a game the caller credits the terminal reward to every move the
/// agent played.
pub struct LearningAgent<E = MaterialEvaluator> {
    side: Side,
    engine: AlphaBetaEngine<E>,
    qtable: QTable,
    learning_rate: f64,
}

impl LearningAgent<MaterialEvaluator> {
    pub fn new(side: Side, config: Arc<EngineConfig>, qtable: QTable) -> Self {
        Self::with_engine(side, AlphaBetaEngine::new(config), qtable)
    }

    /// Agent whose table is loaded from (and saved to) `path`.
    pub fn open(side: Side, config: Arc<EngineConfig>, path: impl Into<PathBuf>) -> Self {
        let qtable = QTable::open(path, config.qtable_max_size);
        Self::new(side, config, qtable)
    }
}

impl<E> LearningAgent<E> {
    pub fn with_engine(side: Side, engine: AlphaBetaEngine<E>, qtable: QTable) -> Self {
        let learning_rate = engine.config().learning_rate;
        Self {
            side,
            engine,
            qtable,
            learning_rate,
        }
    }

    pub const fn side(&self) -> Side {
        self.side
    }

    pub const fn qtable(&self) -> &QTable {
        &self.qtable
    }

    pub const fn engine(&self) -> &AlphaBetaEngine<E> {
        &self.engine
    }

    pub const fn stats(&self) -> SearchStats {
        self.engine.stats()
    }

    /// Pick a move for the side to move and learn from its immediate effect.
    ///
    /// The reward is the evaluation change caused by the move, in pawns:
    /// `(post - pre) / 100` when White moves, and its negation when Black
    /// moves, since evaluations are White-referenced and Black's root
    /// minimizes. `position` is unchanged on return; applying the move is up
    /// to the caller.
    pub fn decide<P>(&mut self, position: &mut P) -> (Option<P::Move>, Option<ScoreTable>)
    where
        P: Position,
        E: Evaluator<P>,
    {
        let fen = position.identity();
        let mover = position.side_to_move();
        let prev_score = self.engine.evaluator().evaluate(position);

        let (best_move, scores) = self.engine.search(position, &self.qtable);
        let Some(mv) = best_move else {
            info!("[{}] No best move found.", self.side);
            return (None, scores);
        };

        position.apply(mv);
        let new_score = self.engine.evaluator().evaluate(position);
        position.revert();

        let reward = f64::from(mover.sign() * (new_score - prev_score)) / 100.0;
        let uci = position.move_identity(&mv);
        self.qtable.update(&fen, &uci, reward, self.learning_rate);

        let stats = self.engine.stats();
        info!(
            "[{}] Move: {uci}, Q-reward: {reward:.2} (depth {}, {} nodes, {} ms)",
            self.side, stats.depth, stats.nodes, stats.time_ms
        );

        (Some(mv), scores)
    }

    /// Game state from this agent's point of view.
    pub fn goal_test<P: Position>(&self, position: &P) -> Outcome {
        classify(position, self.side)
    }

    /// Apply `reward` to every move in `record` with the same update rule as
    /// `decide`. Every move gets the same credit regardless of when it was
    /// played.
    pub fn credit_outcome(&mut self, record: &GameRecord, reward: f64) {
        for entry in record {
            self.qtable
                .update(&entry.position, &entry.mv, reward, self.learning_rate);
        }
        info!(
            "[{}] Credited reward {reward:+} to {} moves",
            self.side,
            record.len()
        );
    }

    /// Classify the final position and, if the game is over, credit the
    /// matching reward to `record`.
    pub fn finish_game<P: Position>(&mut self, position: &P, record: &GameRecord) -> Outcome {
        let outcome = self.goal_test(position);
        if outcome.is_terminal() {
            self.credit_outcome(record, outcome.reward());
        }
        outcome
    }

    pub fn save(&self) -> Result<(), QTableError> {
        self.qtable.save()
    }
}
