//! Application configuration, loaded from YAML.

use std::path::{Path, PathBuf};

use sc_store::StoreOptions;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Top-level configuration file.
///
/// ```yaml
/// store:
///   path: scenarios.db
///   busy_timeout_ms: 2000
/// log_level: debug
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreOptions,
    /// Default filter for the log subscriber, e.g. "info" or "sc_app=debug".
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreOptions::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    /// Load a config file. Relative database paths resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_yaml(&content)?;
        if let (Some(db), Some(dir)) = (config.store.path.as_ref(), path.parent())
            && db.is_relative()
        {
            config.store.path = Some(dir.join(db));
        }
        Ok(config)
    }

    /// Command-line override for the database file.
    pub fn with_database(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.store.path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let config = AppConfig::from_yaml("log_level: debug\n").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.store, StoreOptions::default());
    }

    #[test]
    fn parses_store_section() {
        let config =
            AppConfig::from_yaml("store:\n  path: /tmp/s.db\n  busy_timeout_ms: 250\n").unwrap();
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/s.db")));
        assert_eq!(config.store.busy_timeout_ms, 250);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        assert!(matches!(
            AppConfig::from_yaml("store: [1, 2"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn cli_override_wins() {
        let config = AppConfig::default().with_database(Some(PathBuf::from("x.db")));
        assert_eq!(config.store.path, Some(PathBuf::from("x.db")));
        let config = config.with_database(None);
        assert_eq!(config.store.path, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn load_resolves_relative_database() {
        let dir = std::env::temp_dir().join("sc_app_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("scenaria.yaml");
        std::fs::write(&file, "store:\n  path: data.db\n").unwrap();

        let config = AppConfig::load(&file).unwrap();
        assert_eq!(config.store.path, Some(dir.join("data.db")));
        assert!(matches!(
            AppConfig::load(&dir.join("missing.yaml")),
            Err(AppError::FileRead { .. })
        ));
    }
}
