pub mod agent;
pub mod qtable;

pub use agent::LearningAgent;
pub use qtable::{QTable, QTableError};
