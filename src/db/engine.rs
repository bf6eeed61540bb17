//! Database engine and connection management

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Paths;

static DB_ENGINE: OnceCell<Arc<DbEngine>> = OnceCell::new();

/// Database engine wrapper
pub struct DbEngine {
    pool: SqlitePool,
}

impl DbEngine {
    /// Get the global database engine instance
    pub fn get() -> Result<Arc<DbEngine>> {
        DB_ENGINE
            .get()
            .map(Arc::clone)
            .context("Database not initialized")
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Setup the SQLite database at the configured path
pub async fn setup_sqlite() -> Result<()> {
    let paths = Paths::get()?;
    setup_sqlite_at(&paths.app_db_path()).await
}

/// Setup the SQLite database at an explicit path (tests use a temp dir)
pub async fn setup_sqlite_at(db_path: &Path) -> Result<()> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30))
        .pragma("foreign_keys", "ON");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    let engine = DbEngine { pool };

    DB_ENGINE
        .set(Arc::new(engine))
        .map_err(|_| anyhow::anyhow!("Database already initialized"))?;

    create_tables().await?;

    Ok(())
}

/// Create all database tables
async fn create_tables() -> Result<()> {
    let engine = DbEngine::get()?;
    let pool = engine.pool();

    // Album table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            cover_url TEXT NOT NULL,
            spotify_id TEXT,
            created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_album_spotify_id
            ON album(spotify_id) WHERE spotify_id IS NOT NULL;
        CREATE INDEX IF NOT EXISTS idx_album_title ON album(title);
        "#,
    )
    .execute(pool)
    .await?;

    // User table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_user_email ON user(email);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_user_username ON user(username);
        "#,
    )
    .execute(pool)
    .await?;

    // Game table. The (user_id, day) unique index is what makes
    // "one game per user per day" hold under concurrent requests.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            album_id INTEGER NOT NULL,
            day TEXT NOT NULL,
            guesses_left INTEGER NOT NULL DEFAULT 5,
            pixelation INTEGER NOT NULL DEFAULT 7,
            is_completed INTEGER NOT NULL DEFAULT 0,
            is_won INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
            FOREIGN KEY (user_id) REFERENCES user(id) ON DELETE CASCADE,
            FOREIGN KEY (album_id) REFERENCES album(id)
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_game_user_day ON game(user_id, day);
        CREATE INDEX IF NOT EXISTS idx_game_user ON game(user_id);
        "#,
    )
    .execute(pool)
    .await?;

    // Guess table, append-only
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS guess (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            guess TEXT NOT NULL,
            is_correct INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
            FOREIGN KEY (game_id) REFERENCES game(id) ON DELETE CASCADE,
            FOREIGN KEY (user_id) REFERENCES user(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_guess_game ON guess(game_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
