use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::{CenterSquare, Material, PieceKind, Position, Side};
use std::sync::Arc;

/// Material count plus a flat centre-occupation bonus.
pub struct MaterialEvaluator {
    config: Arc<EngineConfig>,
}

impl MaterialEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

impl<P: Position + Material> Evaluator<P> for MaterialEvaluator {
    fn evaluate(&self, position: &P) -> i32 {
        // 1. Terminal positions
        if position.is_checkmate() {
            // The side to move is the one being mated
            return -position.side_to_move().sign() * self.config.mate_score;
        }
        if position.is_stalemate() || position.is_insufficient_material() {
            return 0;
        }

        // 2. Material
        let mut score = 0;
        for kind in PieceKind::ALL {
            let white = i64::from(position.piece_count(kind, Side::White));
            let black = i64::from(position.piece_count(kind, Side::Black));
            #[allow(clippy::cast_possible_truncation)]
            {
                score += ((white - black) as i32) * self.config.piece_value(kind);
            }
        }

        // 3. Centre control
        for square in CenterSquare::ALL {
            if let Some(side) = position.occupant(square) {
                score += side.sign() * self.config.center_bonus;
            }
        }

        score
    }
}
