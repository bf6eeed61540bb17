//! Path management
//!
//! Resolves and creates the config directory holding the database and
//! settings file.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static PATHS: OnceCell<Arc<Paths>> = OnceCell::new();

/// Manages filesystem paths for the application
#[derive(Debug, Clone)]
pub struct Paths {
    config_dir: PathBuf,
}

impl Paths {
    /// Initialize the paths singleton
    pub fn init(config: Option<PathBuf>) -> Result<Arc<Paths>> {
        let paths = PATHS.get_or_try_init(|| {
            let paths = Self::new(config)?;
            Ok::<_, anyhow::Error>(Arc::new(paths))
        })?;
        Ok(Arc::clone(paths))
    }

    /// Get the global paths instance
    pub fn get() -> Result<Arc<Paths>> {
        PATHS.get().map(Arc::clone).context("Paths not initialized")
    }

    fn new(config_override: Option<PathBuf>) -> Result<Self> {
        let config_dir = if let Some(path) = config_override {
            path
        } else {
            directories::ProjectDirs::from("", "", "coverdup")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".coverdup"))
        };

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config dir {:?}", config_dir))?;

        Ok(Self { config_dir })
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the main database path
    pub fn app_db_path(&self) -> PathBuf {
        self.config_dir.join("coverdup.db")
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_creation() {
        let temp_dir = TempDir::new().unwrap();
        let config = Some(temp_dir.path().join("conf"));

        // Note: Can't use init() in tests due to OnceCell
        let paths = Paths::new(config).unwrap();

        assert!(paths.config_dir().exists());
        assert_eq!(paths.app_db_path().file_name().unwrap(), "coverdup.db");
    }
}
