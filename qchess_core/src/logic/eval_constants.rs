// Piece Values
pub const VAL_PAWN: i32 = 100;
pub const VAL_KNIGHT: i32 = 300;
pub const VAL_BISHOP: i32 = 350;
pub const VAL_ROOK: i32 = 500;
pub const VAL_QUEEN: i32 = 900;
pub const VAL_KING: i32 = 0;

// Flat bonus per occupied centre square (d4, d5, e4, e5)
pub const BONUS_CENTER: i32 = 20;

pub const MATE_SCORE: i32 = 10_000;

// Search window bound. Every reachable evaluation is far inside it.
pub const INFINITY: i32 = 1_000_000;
