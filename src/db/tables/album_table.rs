//! Album table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::Album;

/// Database row for album table
#[derive(Debug, FromRow)]
struct AlbumRow {
    id: i64,
    title: String,
    artist: String,
    cover_url: String,
    spotify_id: Option<String>,
    created_at: i64,
}

impl AlbumRow {
    fn into_album(self) -> Album {
        Album {
            id: self.id,
            title: self.title,
            artist: self.artist,
            cover_url: self.cover_url,
            spotify_id: self.spotify_id,
            created_at: self.created_at,
        }
    }
}

/// Album table operations
pub struct AlbumTable;

impl AlbumTable {
    /// Get album by ID
    pub async fn get_by_id(id: i64) -> Result<Option<Album>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<AlbumRow> = sqlx::query_as("SELECT * FROM album WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_album()))
    }

    /// Get album by Spotify ID
    pub async fn get_by_spotify_id(spotify_id: &str) -> Result<Option<Album>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<AlbumRow> = sqlx::query_as("SELECT * FROM album WHERE spotify_id = ?")
            .bind(spotify_id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_album()))
    }

    /// Pick one album uniformly at random
    pub async fn random() -> Result<Option<Album>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<AlbumRow> =
            sqlx::query_as("SELECT * FROM album ORDER BY RANDOM() LIMIT 1")
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|r| r.into_album()))
    }

    /// Paginated listing with an optional case-insensitive title/artist
    /// substring filter, ordered by title. Returns (albums, total).
    pub async fn paginate(
        page: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<(Vec<Album>, i64)> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let offset = (page - 1) * limit;

        let (rows, total): (Vec<AlbumRow>, i64) = match search {
            Some(term) if !term.is_empty() => {
                let pattern = format!("%{}%", term.to_lowercase());
                let rows = sqlx::query_as(
                    "SELECT * FROM album \
                     WHERE LOWER(title) LIKE ? OR LOWER(artist) LIKE ? \
                     ORDER BY title ASC LIMIT ? OFFSET ?",
                )
                .bind(&pattern)
                .bind(&pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;

                let (total,): (i64,) = sqlx::query_as(
                    "SELECT COUNT(*) FROM album \
                     WHERE LOWER(title) LIKE ? OR LOWER(artist) LIKE ?",
                )
                .bind(&pattern)
                .bind(&pattern)
                .fetch_one(pool)
                .await?;

                (rows, total)
            }
            _ => {
                let rows =
                    sqlx::query_as("SELECT * FROM album ORDER BY title ASC LIMIT ? OFFSET ?")
                        .bind(limit)
                        .bind(offset)
                        .fetch_all(pool)
                        .await?;

                let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM album")
                    .fetch_one(pool)
                    .await?;

                (rows, total)
            }
        };

        Ok((rows.into_iter().map(|r| r.into_album()).collect(), total))
    }

    /// Insert an album
    pub async fn insert(album: &Album) -> Result<i64> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let result = sqlx::query(
            "INSERT INTO album (title, artist, cover_url, spotify_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.cover_url)
        .bind(&album.spotify_id)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a catalog album unless one with the same Spotify ID exists.
    /// Returns the stored album either way.
    pub async fn upsert_by_spotify_id(album: &Album) -> Result<Album> {
        let spotify_id = album
            .spotify_id
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Album has no Spotify ID"))?;

        let engine = DbEngine::get()?;
        let pool = engine.pool();

        sqlx::query(
            "INSERT INTO album (title, artist, cover_url, spotify_id) VALUES (?, ?, ?, ?) \
             ON CONFLICT(spotify_id) DO NOTHING",
        )
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.cover_url)
        .bind(spotify_id)
        .execute(pool)
        .await?;

        Self::get_by_spotify_id(spotify_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Album upsert did not persist"))
    }

    /// Check whether an album with this exact title and artist exists
    pub async fn exists_by_title_artist(title: &str, artist: &str) -> Result<bool> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM album WHERE title = ? AND artist = ?")
                .bind(title)
                .bind(artist)
                .fetch_one(pool)
                .await?;

        Ok(row.0 > 0)
    }

    /// Get album count
    pub async fn count() -> Result<i64> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM album")
            .fetch_one(pool)
            .await?;

        Ok(row.0)
    }
}
