use serde::{Deserialize, Serialize};
use std::fmt;

pub mod board;
pub mod eval_constants;
pub mod game;
pub mod rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// +1 for White, -1 for Black. Scores are always White-referenced,
    /// so multiplying by this turns them into the side's own perspective.
    pub const fn sign(self) -> i32 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [Self; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];
}

/// The four central squares rewarded by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CenterSquare {
    D4,
    D5,
    E4,
    E5,
}

impl CenterSquare {
    pub const ALL: [Self; 4] = [Self::D4, Self::D5, Self::E4, Self::E5];
}

/// Contract the engine needs from a rules engine.
///
/// `apply` and `revert` form a stack: every `apply` must be matched by exactly
/// one `revert`, in reverse order. After a balanced sequence the position must
/// be identical to where it started. The search relies on this and never
/// checks it.
pub trait Position {
    type Move: Copy + Eq + fmt::Debug;

    fn side_to_move(&self) -> Side;

    /// Legal moves in a deterministic order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn apply(&mut self, mv: Self::Move);

    fn revert(&mut self);

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    fn is_insufficient_material(&self) -> bool;

    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_stalemate() || self.is_insufficient_material()
    }

    /// Canonical key for this position.
    fn identity(&self) -> String;

    fn move_identity(&self, mv: &Self::Move) -> String;

    fn parse_move(&self, text: &str) -> Option<Self::Move> {
        self.legal_moves()
            .into_iter()
            .find(|mv| self.move_identity(mv) == text)
    }
}

/// Board queries used by the material evaluator.
pub trait Material {
    fn piece_count(&self, kind: PieceKind, side: Side) -> u32;

    fn occupant(&self, square: CenterSquare) -> Option<Side>;
}
