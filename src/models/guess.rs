//! Guess model

use serde::{Deserialize, Serialize};

/// One submitted guess, immutable once recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    pub id: i64,
    pub game_id: i64,
    pub user_id: i64,
    /// The text the player submitted
    pub guess: String,
    pub is_correct: bool,
    /// Creation timestamp (unix seconds)
    pub created_at: i64,
}
