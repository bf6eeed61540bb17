//! Spotify catalog client
//!
//! Client-credentials flow with a cached bearer token renewed one minute
//! before expiry. "Random" albums are an approximation of popular: one
//! search drawn from a rotating, hardcoded list of popularity-biased
//! queries, with one result picked at random.

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::UserConfig;
use crate::models::Album;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";

/// Renew this long before the token actually expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Spotify caps search page sizes at 50
const MAX_SEARCH_LIMIT: usize = 50;

static SPOTIFY_CLIENT: OnceCell<Arc<SpotifyClient>> = OnceCell::new();

const POPULAR_ARTISTS: &[&str] = &[
    "The Beatles",
    "Pink Floyd",
    "Led Zeppelin",
    "Queen",
    "The Rolling Stones",
    "AC/DC",
    "Nirvana",
    "Radiohead",
    "U2",
    "Coldplay",
    "Adele",
    "Taylor Swift",
    "Drake",
    "Kendrick Lamar",
    "Billie Eilish",
];

const POPULAR_GENRES: &[&str] = &[
    "rock", "pop", "hip-hop", "electronic", "jazz", "soul", "country", "blues",
];

const DECADES: &[(&str, &str)] = &[
    ("2020", "2024"),
    ("2015", "2019"),
    ("2010", "2014"),
    ("2005", "2009"),
    ("2000", "2004"),
    ("1995", "1999"),
    ("1990", "1994"),
    ("1985", "1989"),
    ("1980", "1984"),
    ("1975", "1979"),
    ("1970", "1974"),
    ("1965", "1969"),
    ("1960", "1964"),
];

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: AlbumPage,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    items: Vec<SpotifyAlbum>,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    #[serde(default)]
    images: Vec<SpotifyImage>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: String,
}

/// A catalog album in our shape
#[derive(Debug, Clone)]
pub struct AlbumInfo {
    pub spotify_id: String,
    pub title: String,
    pub artist: String,
    pub cover_url: String,
    pub spotify_url: String,
}

impl AlbumInfo {
    fn from_spotify(album: SpotifyAlbum) -> Self {
        Self {
            spotify_id: album.id.clone(),
            title: album.name,
            artist: album
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            cover_url: album
                .images
                .first()
                .map(|i| i.url.clone())
                .unwrap_or_default(),
            spotify_url: album.external_urls.spotify,
        }
    }

    /// Convert into a storable album
    pub fn to_album(&self) -> Album {
        Album::new(
            self.title.clone(),
            self.artist.clone(),
            self.cover_url.clone(),
        )
        .with_spotify_id(self.spotify_id.clone())
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Spotify API client with a cached application token
pub struct SpotifyClient {
    client: Client,
    client_id: String,
    client_secret: String,
    token: RwLock<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client: Client::new(),
            client_id,
            client_secret,
            token: RwLock::new(None),
        }
    }

    /// Get or initialize the shared client from config
    pub fn shared() -> Arc<SpotifyClient> {
        SPOTIFY_CLIENT
            .get_or_init(|| {
                let config = UserConfig::load().unwrap_or_default();
                Arc::new(SpotifyClient::new(
                    config.spotify_client_id,
                    config.spotify_client_secret,
                ))
            })
            .clone()
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Current bearer token, renewing it transparently when near expiry
    async fn access_token(&self) -> Result<String> {
        if !self.is_configured() {
            return Err(anyhow!("Spotify credentials not configured"));
        }

        {
            let cached = self.token.read();
            if let Some(token) = cached.as_ref() {
                if Instant::now() < token.expires_at {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?;

        let token: TokenResponse = resp.json().await?;
        let access_token = token.access_token.clone();

        // A concurrent renewal may race here; last writer wins and both
        // tokens are valid.
        *self.token.write() = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in)
                - TOKEN_EXPIRY_MARGIN,
        });

        Ok(access_token)
    }

    /// Search albums by free-text query
    pub async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<AlbumInfo>> {
        let token = self.access_token().await?;
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);

        let resp = self
            .client
            .get(format!("{}/search", API_BASE))
            .query(&[
                ("q", query),
                ("type", "album"),
                ("limit", &limit.to_string()),
            ])
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?;

        let search: SearchResponse = resp.json().await?;

        Ok(search
            .albums
            .items
            .into_iter()
            .map(AlbumInfo::from_spotify)
            .collect())
    }

    /// Popularity-biased "random" albums: one search from the query
    /// rotation, shuffled
    pub async fn random_albums(&self, limit: usize) -> Result<Vec<AlbumInfo>> {
        let query = {
            let queries = rotation_queries();
            queries
                .choose(&mut rand::thread_rng())
                .cloned()
                .ok_or_else(|| anyhow!("Empty query rotation"))?
        };

        let mut albums = self.search_albums(&query, limit.max(20)).await?;
        albums.shuffle(&mut rand::thread_rng());
        albums.truncate(limit);

        Ok(albums)
    }

    /// Look up one album by its Spotify ID
    pub async fn get_album_by_id(&self, id: &str) -> Result<AlbumInfo> {
        let token = self.access_token().await?;

        let resp = self
            .client
            .get(format!("{}/albums/{}", API_BASE, id))
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?;

        let album: SpotifyAlbum = resp.json().await?;
        Ok(AlbumInfo::from_spotify(album))
    }
}

/// The hardcoded query rotation: artist searches, genre + recent-years
/// searches, and decade windows
fn rotation_queries() -> Vec<String> {
    let mut queries: Vec<String> = POPULAR_ARTISTS
        .iter()
        .map(|artist| format!("artist:\"{}\"", artist))
        .collect();

    queries.extend(
        POPULAR_GENRES
            .iter()
            .map(|genre| format!("genre:\"{}\" year:2015-2024", genre)),
    );

    queries.extend(
        DECADES
            .iter()
            .map(|(from, to)| format!("album year:{}-{}", from, to)),
    );

    queries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_covers_all_three_query_families() {
        let queries = rotation_queries();
        assert_eq!(
            queries.len(),
            POPULAR_ARTISTS.len() + POPULAR_GENRES.len() + DECADES.len()
        );
        assert!(queries.iter().any(|q| q.starts_with("artist:")));
        assert!(queries.iter().any(|q| q.starts_with("genre:")));
        assert!(queries.iter().any(|q| q.starts_with("album year:")));
    }

    #[test]
    fn test_album_conversion_picks_first_artist_and_image() {
        let payload = serde_json::json!({
            "id": "4LH4d3cOWNNsVw41Gqt2kv",
            "name": "The Dark Side of the Moon",
            "artists": [{"name": "Pink Floyd"}, {"name": "Someone Else"}],
            "images": [
                {"url": "https://i.scdn.co/image/large.jpg"},
                {"url": "https://i.scdn.co/image/small.jpg"}
            ],
            "external_urls": {"spotify": "https://open.spotify.com/album/4LH4d3cOWNNsVw41Gqt2kv"}
        });

        let album: SpotifyAlbum = serde_json::from_value(payload).unwrap();
        let info = AlbumInfo::from_spotify(album);

        assert_eq!(info.title, "The Dark Side of the Moon");
        assert_eq!(info.artist, "Pink Floyd");
        assert_eq!(info.cover_url, "https://i.scdn.co/image/large.jpg");
        assert_eq!(info.spotify_id, "4LH4d3cOWNNsVw41Gqt2kv");

        let stored = info.to_album();
        assert_eq!(stored.spotify_id.as_deref(), Some("4LH4d3cOWNNsVw41Gqt2kv"));
    }

    #[test]
    fn test_album_conversion_handles_missing_fields() {
        let payload = serde_json::json!({
            "id": "abc",
            "name": "Untitled"
        });

        let album: SpotifyAlbum = serde_json::from_value(payload).unwrap();
        let info = AlbumInfo::from_spotify(album);

        assert_eq!(info.artist, "Unknown Artist");
        assert!(info.cover_url.is_empty());
    }

    #[test]
    fn test_unconfigured_client_reports_it() {
        let client = SpotifyClient::new(String::new(), String::new());
        assert!(!client.is_configured());
    }
}
