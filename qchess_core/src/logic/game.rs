use crate::logic::{Position, Side};
use serde::{Deserialize, Serialize};

/// Game result seen from one player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    Ongoing,
}

impl Outcome {
    /// Terminal reward credited to every move of the finished game.
    pub const fn reward(self) -> f64 {
        match self {
            Self::Win => 1.0,
            Self::Loss => -1.0,
            Self::Draw | Self::Ongoing => 0.0,
        }
    }

    /// The same result seen from the other player.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Loss => Self::Win,
            other => other,
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Classify `position` for the player `owner`. The side to move in a
/// checkmate is the mated side.
pub fn classify<P: Position>(position: &P, owner: Side) -> Outcome {
    if position.is_checkmate() {
        if position.side_to_move() == owner {
            Outcome::Loss
        } else {
            Outcome::Win
        }
    } else if position.is_stalemate() || position.is_insufficient_material() {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Identity of the position the move was played from.
    pub position: String,
    pub mv: String,
}

/// Moves one player made during a game, in play order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    moves: Vec<MoveRecord>,
}

impl GameRecord {
    #[must_use]
    pub const fn new() -> Self {
        Self { moves: Vec::new() }
    }

    pub fn push(&mut self, position: impl Into<String>, mv: impl Into<String>) {
        self.moves.push(MoveRecord {
            position: position.into(),
            mv: mv.into(),
        });
    }

    /// Record `mv` as played from `position`. Call before applying the move.
    pub fn record<P: Position>(&mut self, position: &P, mv: &P::Move) {
        self.push(position.identity(), position.move_identity(mv));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveRecord> {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

impl<'a> IntoIterator for &'a GameRecord {
    type Item = &'a MoveRecord;
    type IntoIter = std::slice::Iter<'a, MoveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
