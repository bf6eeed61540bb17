//! Game model
//!
//! A game is one user's attempt at one day's album. Persisted games live in
//! the database; anonymous games are ephemeral and identified on the wire by
//! a `temp_`-prefixed string id, with their album echoed back by the client.

use serde::{Deserialize, Serialize};

/// Guesses a fresh game starts with
pub const STARTING_GUESSES: i64 = 5;
/// Pixelation level a fresh game starts with (1 = fully clear)
pub const STARTING_PIXELATION: i64 = 7;

/// A persisted game row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub user_id: i64,
    pub album_id: i64,
    /// Calendar day this game belongs to, server-local ("YYYY-MM-DD")
    pub day: String,
    pub guesses_left: i64,
    pub pixelation: i64,
    pub is_completed: bool,
    pub is_won: bool,
    /// Creation timestamp (unix seconds)
    pub created_at: i64,
}

/// Reference to a game as supplied by a client, parsed once at the handler
/// boundary so downstream code branches on capability instead of sniffing
/// id-string prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameRef {
    /// A database-backed game
    Persisted(i64),
    /// An anonymous game that only exists client-side
    Ephemeral(String),
}

impl GameRef {
    /// Parse a wire game id. Numbers (and numeric strings) are persisted
    /// game ids; `temp_*` strings are ephemeral.
    pub fn parse(raw: &GameIdParam) -> Option<GameRef> {
        match raw {
            GameIdParam::Number(id) => Some(GameRef::Persisted(*id)),
            GameIdParam::Text(s) => {
                if s.starts_with("temp_") {
                    Some(GameRef::Ephemeral(s.clone()))
                } else {
                    s.parse::<i64>().ok().map(GameRef::Persisted)
                }
            }
        }
    }
}

/// Raw wire form of a game id: persisted ids arrive as JSON numbers,
/// ephemeral ids as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GameIdParam {
    Number(i64),
    Text(String),
}

/// Wire form of a game id in responses
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GameId {
    Persisted(i64),
    Ephemeral(String),
}

/// Mint an ephemeral game id
pub fn ephemeral_game_id() -> String {
    format!("temp_{}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_ref_from_number() {
        let param: GameIdParam = serde_json::from_str("42").unwrap();
        assert_eq!(GameRef::parse(&param), Some(GameRef::Persisted(42)));
    }

    #[test]
    fn test_game_ref_from_temp_string() {
        let param: GameIdParam = serde_json::from_str("\"temp_1700000000000\"").unwrap();
        assert_eq!(
            GameRef::parse(&param),
            Some(GameRef::Ephemeral("temp_1700000000000".to_string()))
        );
    }

    #[test]
    fn test_game_ref_from_numeric_string() {
        // some clients stringify ids
        let param: GameIdParam = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(GameRef::parse(&param), Some(GameRef::Persisted(42)));
    }

    #[test]
    fn test_game_ref_rejects_garbage() {
        let param: GameIdParam = serde_json::from_str("\"not-an-id\"").unwrap();
        assert_eq!(GameRef::parse(&param), None);
    }

    #[test]
    fn test_game_id_serializes_untagged() {
        assert_eq!(
            serde_json::to_string(&GameId::Persisted(7)).unwrap(),
            "7"
        );
        assert_eq!(
            serde_json::to_string(&GameId::Ephemeral("temp_1".to_string())).unwrap(),
            "\"temp_1\""
        );
    }

    #[test]
    fn test_ephemeral_id_prefix() {
        assert!(ephemeral_game_id().starts_with("temp_"));
    }
}
