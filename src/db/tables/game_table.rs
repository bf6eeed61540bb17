//! Game table operations
//!
//! Guess application runs in a single transaction with a guarded update so
//! concurrent submissions against one game cannot drive `guesses_left`
//! negative or produce two terminal transitions.

use anyhow::Result;
use sqlx::FromRow;

use crate::db::tables::guess_table::GuessRow;
use crate::db::DbEngine;
use crate::models::{Game, Guess};

/// Database row for game table
#[derive(Debug, FromRow)]
struct GameRow {
    id: i64,
    user_id: i64,
    album_id: i64,
    day: String,
    guesses_left: i64,
    pixelation: i64,
    is_completed: i64,
    is_won: i64,
    created_at: i64,
}

impl GameRow {
    fn into_game(self) -> Game {
        Game {
            id: self.id,
            user_id: self.user_id,
            album_id: self.album_id,
            day: self.day,
            guesses_left: self.guesses_left,
            pixelation: self.pixelation,
            is_completed: self.is_completed != 0,
            is_won: self.is_won != 0,
            created_at: self.created_at,
        }
    }
}

/// Game table operations
pub struct GameTable;

impl GameTable {
    /// Get a user's game for a given calendar day
    pub async fn get_for_user_on_day(user_id: i64, day: &str) -> Result<Option<Game>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<GameRow> =
            sqlx::query_as("SELECT * FROM game WHERE user_id = ? AND day = ?")
                .bind(user_id)
                .bind(day)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|r| r.into_game()))
    }

    /// Create a game for (user, day) unless one already exists. The unique
    /// index on (user_id, day) makes this safe against concurrent requests;
    /// losing the race is fine because the caller re-reads afterwards.
    pub async fn create_for_day(user_id: i64, album_id: i64, day: &str) -> Result<()> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        sqlx::query(
            "INSERT INTO game (user_id, album_id, day) VALUES (?, ?, ?) \
             ON CONFLICT(user_id, day) DO NOTHING",
        )
        .bind(user_id)
        .bind(album_id)
        .bind(day)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get a game by id, scoped to its owner
    pub async fn get_by_id_for_user(game_id: i64, user_id: i64) -> Result<Option<Game>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<GameRow> =
            sqlx::query_as("SELECT * FROM game WHERE id = ? AND user_id = ?")
                .bind(game_id)
                .bind(user_id)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|r| r.into_game()))
    }

    /// Atomically consume one guess: decrement counters, mark terminal state,
    /// and append the guess record. Returns None when the guard fails (game
    /// already terminal or out of guesses, e.g. a lost concurrent race).
    pub async fn apply_guess(
        game_id: i64,
        user_id: i64,
        text: &str,
        is_correct: bool,
    ) -> Result<Option<(Game, Guess)>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE game SET \
                guesses_left = guesses_left - 1, \
                pixelation = MAX(1, pixelation - 1), \
                is_won = ?, \
                is_completed = CASE WHEN ? OR guesses_left - 1 <= 0 THEN 1 ELSE 0 END \
             WHERE id = ? AND user_id = ? AND is_completed = 0 AND guesses_left > 0",
        )
        .bind(is_correct)
        .bind(is_correct)
        .bind(game_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let insert = sqlx::query(
            "INSERT INTO guess (game_id, user_id, guess, is_correct) VALUES (?, ?, ?, ?)",
        )
        .bind(game_id)
        .bind(user_id)
        .bind(text)
        .bind(is_correct)
        .execute(&mut *tx)
        .await?;

        let guess_id = insert.last_insert_rowid();

        let game_row: GameRow = sqlx::query_as("SELECT * FROM game WHERE id = ?")
            .bind(game_id)
            .fetch_one(&mut *tx)
            .await?;

        let guess_row: GuessRow = sqlx::query_as("SELECT * FROM guess WHERE id = ?")
            .bind(guess_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some((game_row.into_game(), guess_row.into_guess())))
    }

    /// Paginated history for a user, newest first. Returns (games, total).
    pub async fn list_by_user(user_id: i64, page: i64, limit: i64) -> Result<(Vec<Game>, i64)> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let offset = (page - 1) * limit;

        let rows: Vec<GameRow> = sqlx::query_as(
            "SELECT * FROM game WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM game WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok((rows.into_iter().map(|r| r.into_game()).collect(), total))
    }
}
