//! Process-level settings loaded from an optional `config.toml`.
//!
//! Per-run knobs travel in `PipelineConfig`; this only covers ambient HTTP
//! behavior and where logs land.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 20,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file is absent.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load_from(Path::new("/no/such/config.toml")).unwrap();
        assert_eq!(config.http.timeout_seconds, 20);
        assert_eq!(config.http.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_seconds = 5\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.http.timeout_seconds, 5);
        assert_eq!(config.http.user_agent, "Mozilla/5.0");
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }
}
