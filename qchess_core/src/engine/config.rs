use crate::learning::qtable::DEFAULT_MAX_SIZE;
use crate::logic::eval_constants::{
    BONUS_CENTER, MATE_SCORE, VAL_BISHOP, VAL_KING, VAL_KNIGHT, VAL_PAWN, VAL_QUEEN, VAL_ROOK,
};
use crate::logic::PieceKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_rook: i32,
    pub val_queen: i32,
    pub val_king: i32,
    pub center_bonus: i32,
    pub mate_score: i32,

    // Search Parameters
    pub max_depth: u8,
    pub time_limit_ms: u64,

    // Learning Parameters
    pub learning_rate: f64,
    pub qtable_max_size: usize, // advisory only
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,
            center_bonus: BONUS_CENTER,
            mate_score: MATE_SCORE,

            max_depth: 4,
            time_limit_ms: 1000,

            learning_rate: 0.1,
            qtable_max_size: DEFAULT_MAX_SIZE,
        }
    }
}

/// Tuning file format: piece values and the centre bonus are scale factors
/// applied to the defaults, everything else is absolute.
#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_knight: Option<f32>,
    val_bishop: Option<f32>,
    val_rook: Option<f32>,
    val_queen: Option<f32>,
    val_king: Option<f32>,
    center_bonus: Option<f32>,
    mate_score: Option<i32>,

    max_depth: Option<u8>,
    time_limit_ms: Option<u64>,

    learning_rate: Option<f64>,
    qtable_max_size: Option<usize>,
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_rook: apply_scale(default.val_rook, json_config.val_rook),
            val_queen: apply_scale(default.val_queen, json_config.val_queen),
            val_king: apply_scale(default.val_king, json_config.val_king),
            center_bonus: apply_scale(default.center_bonus, json_config.center_bonus),
            mate_score: json_config.mate_score.unwrap_or(default.mate_score),

            max_depth: json_config.max_depth.unwrap_or(default.max_depth),
            time_limit_ms: json_config.time_limit_ms.unwrap_or(default.time_limit_ms),

            learning_rate: json_config.learning_rate.unwrap_or(default.learning_rate),
            qtable_max_size: json_config
                .qtable_max_size
                .unwrap_or(default.qtable_max_size),
        })
    }

    /// Value of one piece of `kind`.
    pub const fn piece_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.val_pawn,
            PieceKind::Knight => self.val_knight,
            PieceKind::Bishop => self.val_bishop,
            PieceKind::Rook => self.val_rook,
            PieceKind::Queen => self.val_queen,
            PieceKind::King => self.val_king,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let json = "{}";
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.val_pawn, VAL_PAWN);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.time_limit_ms, 1000);
        assert_eq!(config.qtable_max_size, 10_000);
    }

    #[test]
    fn test_load_config_scaled() {
        let json = r#"{
            "val_pawn": 1.5,
            "center_bonus": 0.5
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.val_pawn, 150);
        assert_eq!(config.center_bonus, 10);
        assert_eq!(config.val_rook, VAL_ROOK);
    }

    #[test]
    fn test_load_config_invalid_json() {
        let json = "{ invalid json }";
        let result = EngineConfig::load_from_json(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_search_fields_are_absolute() {
        let json = r#"{
            "max_depth": 6,
            "time_limit_ms": 250,
            "learning_rate": 0.5,
            "qtable_max_size": 42
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();

        assert_eq!(config.max_depth, 6);
        assert_eq!(config.time_limit_ms, 250);
        assert!((config.learning_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.qtable_max_size, 42);
        assert_eq!(config.val_queen, VAL_QUEEN);
    }

    #[test]
    fn test_load_config_terminal_and_centre_fields() {
        // Centre bonus scales like a piece value, mate score is taken as is
        let json = r#"{
            "center_bonus": 0.0,
            "mate_score": 30000,
            "val_king": 3.0
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();

        assert_eq!(config.center_bonus, 0);
        assert_eq!(config.mate_score, 30_000);
        assert_eq!(config.val_king, 0);
        assert_eq!(config.piece_value(PieceKind::Bishop), VAL_BISHOP);
    }

    #[test]
    fn test_serde_round_trip_keeps_absolute_values() {
        let config = EngineConfig {
            center_bonus: 35,
            mate_score: 20_000,
            learning_rate: 0.25,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();

        // Serialized configs are absolute, unlike tuning files
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: EngineConfig = serde_json::from_str(r#"{"center_bonus": 35}"#).unwrap();
        assert_eq!(partial.center_bonus, 35);
        assert_eq!(partial.mate_score, MATE_SCORE);
        assert!((partial.learning_rate - 0.1).abs() < f64::EPSILON);
    }
}
