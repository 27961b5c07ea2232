use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::db::DB_FILE_NAME;
use crate::error::{AppError, Result};
use crate::models::ALL_CATEGORIES;
use crate::settings::SETTINGS_STORAGE_KEY;

const APP_DIR: &str = "bayna-yadayk";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    /// Part of speech preselected on the vocabulary tab.
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn data_dir() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    std::fs::create_dir_all(&data_dir).ok();
    data_dir
}

fn default_db_path() -> String {
    data_dir().join(DB_FILE_NAME).to_string_lossy().to_string()
}

fn default_settings_path() -> String {
    data_dir()
        .join(format!("{SETTINGS_STORAGE_KEY}.json"))
        .to_string_lossy()
        .to_string()
}

fn default_category() -> String {
    ALL_CATEGORIES.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            settings_path: default_settings_path(),
            default_category: default_category(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.db_path.trim().is_empty() {
            return Err(AppError::Config("db_path must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = Config::from_toml("db_path = \"/tmp/study.db\"\n").unwrap();
        assert_eq!(config.db_path, "/tmp/study.db");
        assert_eq!(config.default_category, "all");
        assert!(config.settings_path.ends_with("app.settings.v1.json"));
    }

    #[test]
    fn empty_db_path_is_rejected() {
        let err = Config::from_toml("db_path = \"  \"\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml("db_path = ").unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }
}
