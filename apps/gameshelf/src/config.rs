//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/gameshelf/config.toml`
//! - Windows: `%APPDATA%/gameshelf/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use gameshelf_library::SortMode;
use serde::{Deserialize, Serialize};

/// Gameshelf configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameshelfConfig {
    /// Base URL of the game-organizer server.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Sort mode used when a command does not pass `--sort`.
    #[serde(default)]
    pub default_sort: SortMode,
}

fn default_server_url() -> String {
    "http://localhost:8080".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GameshelfConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_timeout_secs(),
            default_sort: SortMode::default(),
        }
    }
}

impl GameshelfConfig {
    /// Loads configuration from `path` (or the platform default), writing a
    /// default file if none exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: GameshelfConfig = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = GameshelfConfig::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA")?;
        Ok(PathBuf::from(appdata).join("gameshelf").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("gameshelf")
            .join("config.toml"))
    }
}
