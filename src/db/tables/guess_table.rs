//! Guess table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::Guess;

/// Database row for guess table, shared with the game table's
/// transactional guess insert
#[derive(Debug, FromRow)]
pub(crate) struct GuessRow {
    id: i64,
    game_id: i64,
    user_id: i64,
    guess: String,
    is_correct: i64,
    created_at: i64,
}

impl GuessRow {
    pub(crate) fn into_guess(self) -> Guess {
        Guess {
            id: self.id,
            game_id: self.game_id,
            user_id: self.user_id,
            guess: self.guess,
            is_correct: self.is_correct != 0,
            created_at: self.created_at,
        }
    }
}

/// Guess table operations
pub struct GuessTable;

impl GuessTable {
    /// All guesses for a game in submission order
    pub async fn list_by_game(game_id: i64) -> Result<Vec<Guess>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let rows: Vec<GuessRow> = sqlx::query_as(
            "SELECT * FROM guess WHERE game_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(game_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_guess()).collect())
    }
}
