//! User configuration
//!
//! Settings persisted as settings.json in the config directory. Spotify
//! credentials may also come from SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET,
//! which take precedence on every load so container users can rotate them
//! between restarts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Paths;

/// User configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Server ID used as the JWT signing secret and password hash salt
    #[serde(default)]
    pub server_id: String,

    /// Spotify client credentials for the catalog integration
    #[serde(default)]
    pub spotify_client_id: String,

    #[serde(default)]
    pub spotify_client_secret: String,

    /// Seed the built-in album catalog when the album table is empty
    #[serde(default = "default_true")]
    pub seed_on_empty: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            server_id: String::new(),
            spotify_client_id: String::new(),
            spotify_client_secret: String::new(),
            seed_on_empty: true,
        }
    }
}

impl UserConfig {
    /// Load configuration from file, applying env overrides
    pub fn load() -> Result<Self> {
        let paths = Paths::get()?;
        let settings_path = paths.settings_path();

        let mut config = if settings_path.exists() {
            let content =
                std::fs::read_to_string(&settings_path).context("Failed to read settings file")?;
            serde_json::from_str(&content).context("Failed to parse settings file")?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        if let Ok(id) = std::env::var("SPOTIFY_CLIENT_ID") {
            if !id.is_empty() {
                config.spotify_client_id = id;
            }
        }
        if let Ok(secret) = std::env::var("SPOTIFY_CLIENT_SECRET") {
            if !secret.is_empty() {
                config.spotify_client_secret = secret;
            }
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let paths = Paths::get()?;
        let settings_path = paths.settings_path();

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&settings_path, content).context("Failed to write settings file")?;

        Ok(())
    }

    /// Whether Spotify credentials are configured
    pub fn has_spotify_credentials(&self) -> bool {
        !self.spotify_client_id.is_empty() && !self.spotify_client_secret.is_empty()
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert!(config.server_id.is_empty());
        assert!(config.seed_on_empty);
        assert!(!config.has_spotify_credentials());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut config = UserConfig::default();
        config.server_id = "abc".to_string();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: UserConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.server_id, deserialized.server_id);
        assert_eq!(config.seed_on_empty, deserialized.seed_on_empty);
    }
}
