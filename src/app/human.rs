use crate::app::{default_table, result_label, PlayerSide};
use anyhow::{Context, Result};
use clap::Args;
use qchess_core::engine::config::EngineConfig;
use qchess_core::engine::ScoreTable;
use qchess_core::learning::agent::LearningAgent;
use qchess_core::logic::board::ChessBoard;
use qchess_core::logic::game::GameRecord;
use qchess_core::logic::{Position, Side};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Side the human plays
    #[arg(long, value_enum, default_value_t = PlayerSide::White)]
    pub side: PlayerSide,

    /// Value table of the engine (defaults to q1.json or q2.json by its side)
    #[arg(long)]
    pub table: Option<PathBuf>,
}

/// What the human typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(String),
    Hint,
    Tree,
    New,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "hint" => Self::Hint,
            "tree" => Self::Tree,
            "new" => Self::New,
            "quit" | "exit" => Self::Quit,
            text => Self::Move(text.to_ascii_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// Human against one learning agent. A finished game is credited, saved and
/// replaced by a fresh one until the human quits.
pub struct Session {
    agent: LearningAgent,
    board: ChessBoard,
    record: GameRecord,
    last_scores: Option<ScoreTable>,
    games_played: u32,
}

impl Session {
    pub fn new(agent: LearningAgent) -> Self {
        Self::from_position(agent, ChessBoard::new())
    }

    fn from_position(agent: LearningAgent, board: ChessBoard) -> Self {
        Self {
            agent,
            board,
            record: GameRecord::new(),
            last_scores: None,
            games_played: 0,
        }
    }

    pub const fn board(&self) -> &ChessBoard {
        &self.board
    }

    pub const fn agent(&self) -> &LearningAgent {
        &self.agent
    }

    pub const fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Let the engine move while it is its turn, finishing and restarting
    /// games as they end.
    pub fn play_engine(&mut self, out: &mut impl Write) -> Result<()> {
        loop {
            if self.board.is_game_over() {
                self.end_game(out)?;
            }
            if self.board.side_to_move() != self.agent.side() {
                return Ok(());
            }

            let (best_move, scores) = self.agent.decide(&mut self.board);
            self.last_scores = scores;
            let Some(mv) = best_move else {
                return Ok(());
            };
            writeln!(out, "Engine plays {}", self.board.move_identity(&mv))?;
            self.record.record(&self.board, &mv);
            self.board.apply(mv);
            self.board.commit();
        }
    }

    pub fn handle(&mut self, command: Command, out: &mut impl Write) -> Result<Step> {
        match command {
            Command::Empty => {}
            Command::Quit => return Ok(Step::Quit),
            Command::New => {
                writeln!(out, "Starting a new game.")?;
                self.reset();
            }
            Command::Hint => {
                let (best_move, scores) = self.agent.decide(&mut self.board);
                self.last_scores = scores;
                match best_move {
                    Some(mv) => writeln!(out, "Hint: {}", self.board.move_identity(&mv))?,
                    None => writeln!(out, "No legal moves.")?,
                }
            }
            Command::Tree => match &self.last_scores {
                Some(scores) => writeln!(out, "{}", serde_json::to_string_pretty(scores)?)?,
                None => writeln!(out, "No search yet.")?,
            },
            Command::Move(text) => match self.board.parse_move(&text) {
                Some(mv) => {
                    self.board.apply(mv);
                    self.board.commit();
                    if self.board.is_game_over() {
                        self.end_game(out)?;
                    }
                }
                None => {
                    warn!(input = %text, "illegal move");
                    writeln!(out, "Illegal move: {text}")?;
                }
            },
        }
        Ok(Step::Continue)
    }

    fn end_game(&mut self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", self.board)?;
        let outcome = self.agent.finish_game(&self.board, &self.record);
        let white_outcome = match self.agent.side() {
            Side::White => outcome,
            Side::Black => outcome.opposite(),
        };
        writeln!(out, "Game over: {}", result_label(white_outcome))?;

        self.games_played += 1;
        self.save()?;
        info!(
            games = self.games_played,
            result = result_label(white_outcome),
            avg_q = self.agent.qtable().average_q(),
            entries = self.agent.qtable().len(),
            "game finished"
        );

        writeln!(out, "Starting a new game.")?;
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.board = ChessBoard::new();
        self.record.clear();
        self.last_scores = None;
    }

    pub fn save(&self) -> Result<()> {
        self.agent.save().with_context(|| {
            let path = self.agent.qtable().path().map(|p| p.display().to_string());
            format!("saving {}", path.unwrap_or_default())
        })
    }
}

pub fn run(args: &PlayArgs, config: &Arc<EngineConfig>) -> Result<()> {
    let human_side = Side::from(args.side);
    let engine_side = human_side.opposite();
    let table = args
        .table
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_table(engine_side)));
    let mut session = Session::new(LearningAgent::open(engine_side, config.clone(), table));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    println!("You play {human_side}. Enter moves in UCI (e2e4), or hint, tree, new, quit.");

    loop {
        session.play_engine(&mut stdout)?;

        println!("{}", session.board());
        print!("Your move: ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            info!("end of input");
            break;
        };
        if session.handle(Command::parse(&line?), &mut stdout)? == Step::Quit {
            break;
        }
    }

    session.save()?;
    info!(
        games = session.games_played(),
        avg_q = session.agent().qtable().average_q(),
        entries = session.agent().qtable().len(),
        "value table"
    );
    Ok(())
}
