use crate::app::{default_table, result_label};
use anyhow::{Context, Result};
use clap::Args;
use qchess_core::engine::config::EngineConfig;
use qchess_core::learning::agent::LearningAgent;
use qchess_core::logic::board::ChessBoard;
use qchess_core::logic::game::{GameRecord, Outcome};
use qchess_core::logic::{Position, Side};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SelfPlayArgs {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    pub games: u32,

    /// Value table of the White agent
    #[arg(long, default_value = default_table(Side::White))]
    pub white_table: PathBuf,

    /// Value table of the Black agent
    #[arg(long, default_value = default_table(Side::Black))]
    pub black_table: PathBuf,

    /// Random plies played before the agents take over
    #[arg(long, default_value_t = 0)]
    pub opening_plies: u32,

    /// Stop a game unfinished after this many plies
    #[arg(long, default_value_t = 300)]
    pub max_plies: u32,
}

pub struct GameSummary {
    /// Result for White; `Ongoing` when the ply cap was hit.
    pub outcome: Outcome,
    pub plies: u32,
    pub final_fen: String,
}

pub fn run(args: &SelfPlayArgs, config: &Arc<EngineConfig>) -> Result<()> {
    let mut white = LearningAgent::open(Side::White, config.clone(), &args.white_table);
    let mut black = LearningAgent::open(Side::Black, config.clone(), &args.black_table);
    let mut rng = rand::thread_rng();

    for game in 1..=args.games {
        let summary = play_game(&mut white, &mut black, args, &mut rng);

        white
            .save()
            .with_context(|| format!("saving {}", args.white_table.display()))?;
        black
            .save()
            .with_context(|| format!("saving {}", args.black_table.display()))?;

        info!(
            game,
            result = result_label(summary.outcome),
            plies = summary.plies,
            fen = %summary.final_fen,
            "game finished"
        );
        info!(
            white_avg_q = white.qtable().average_q(),
            white_entries = white.qtable().len(),
            black_avg_q = black.qtable().average_q(),
            black_entries = black.qtable().len(),
            max_size = white.qtable().max_size(),
            "value tables"
        );
    }

    Ok(())
}

/// Play one game and credit both agents with the result.
pub fn play_game<R: Rng>(
    white: &mut LearningAgent,
    black: &mut LearningAgent,
    args: &SelfPlayArgs,
    rng: &mut R,
) -> GameSummary {
    let mut board = ChessBoard::new();
    let mut white_record = GameRecord::new();
    let mut black_record = GameRecord::new();
    let mut plies = 0;

    // Random opening, not credited to anyone
    while plies < args.opening_plies.min(args.max_plies) && !board.is_game_over() {
        let Some(&mv) = board.legal_moves().choose(rng) else {
            break;
        };
        board.apply(mv);
        board.commit();
        plies += 1;
    }

    while plies < args.max_plies && !board.is_game_over() {
        let side = board.side_to_move();
        let (agent, record) = match side {
            Side::White => (&mut *white, &mut white_record),
            Side::Black => (&mut *black, &mut black_record),
        };

        let (best_move, _) = agent.decide(&mut board);
        let Some(mv) = best_move else {
            break;
        };
        record.record(&board, &mv);
        board.apply(mv);
        board.commit();
        plies += 1;
    }

    // Black's outcome mirrors White's, so its reward is the negation.
    let outcome = white.finish_game(&board, &white_record);
    let black_outcome = black.finish_game(&board, &black_record);
    debug_assert_eq!(black_outcome, outcome.opposite());

    GameSummary {
        outcome,
        plies,
        final_fen: board.identity(),
    }
}
