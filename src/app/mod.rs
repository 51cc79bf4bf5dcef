use clap::{Parser, Subcommand, ValueEnum};
use qchess_core::logic::game::Outcome;
use qchess_core::logic::Side;

pub mod config;
pub mod human;
pub mod self_play;

use config::EngineArgs;
use human::PlayArgs;
use self_play::SelfPlayArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chess engine that learns its move ordering", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub mode: GameMode,
}

#[derive(Subcommand, Debug)]
pub enum GameMode {
    /// Two learning agents play each other and keep what they learn
    SelfPlay(SelfPlayArgs),
    /// Play against a learning agent on stdin
    Play(PlayArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerSide {
    White,
    Black,
}

impl From<PlayerSide> for Side {
    fn from(side: PlayerSide) -> Self {
        match side {
            PlayerSide::White => Self::White,
            PlayerSide::Black => Self::Black,
        }
    }
}

/// PGN-style result from White's point of view.
pub const fn result_label(white_outcome: Outcome) -> &'static str {
    match white_outcome {
        Outcome::Win => "1-0",
        Outcome::Loss => "0-1",
        Outcome::Draw => "1/2-1/2",
        Outcome::Ongoing => "*",
    }
}

/// Default table file for the agent playing `side`.
pub const fn default_table(side: Side) -> &'static str {
    match side {
        Side::White => "q1.json",
        Side::Black => "q2.json",
    }
}
