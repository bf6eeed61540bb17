//! Album model

use serde::{Deserialize, Serialize};

/// A catalog entry: the thing players are asked to name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Database ID
    pub id: i64,
    /// Album title (the answer)
    pub title: String,
    /// Primary artist
    pub artist: String,
    /// Cover image URL (pixelated client-side)
    pub cover_url: String,
    /// Spotify album ID, when sourced from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_id: Option<String>,
    /// Creation timestamp (unix seconds)
    #[serde(default)]
    pub created_at: i64,
}

impl Album {
    pub fn new(title: String, artist: String, cover_url: String) -> Self {
        Self {
            id: 0,
            title,
            artist,
            cover_url,
            spotify_id: None,
            created_at: 0,
        }
    }

    pub fn with_spotify_id(mut self, spotify_id: String) -> Self {
        self.spotify_id = Some(spotify_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_serializes_camel_case() {
        let album = Album::new(
            "Abbey Road".to_string(),
            "The Beatles".to_string(),
            "https://example.com/abbey.jpg".to_string(),
        );
        let json = serde_json::to_value(&album).unwrap();

        assert_eq!(json["title"], "Abbey Road");
        assert_eq!(json["coverUrl"], "https://example.com/abbey.jpg");
        // absent spotify id is omitted entirely
        assert!(json.get("spotifyId").is_none());
    }

    #[test]
    fn test_album_with_spotify_id() {
        let album = Album::new(
            "Rumours".to_string(),
            "Fleetwood Mac".to_string(),
            "https://example.com/rumours.png".to_string(),
        )
        .with_spotify_id("1bt6q2SruMsBtcerNVtpZB".to_string());

        let json = serde_json::to_value(&album).unwrap();
        assert_eq!(json["spotifyId"], "1bt6q2SruMsBtcerNVtpZB");
    }
}
