use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::FEED_PAGE_SIZE;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_notification_timeout")]
    pub notification_timeout_secs: u64,

    /// strftime pattern for article and digest timestamps (local time zone)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_api_base() -> String {
    "http://127.0.0.1:5000/api".to_string()
}

fn default_per_page() -> u32 {
    FEED_PAGE_SIZE
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_notification_timeout() -> u64 {
    5
}

fn default_date_format() -> String {
    "%b %e, %Y %H:%M".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            per_page: default_per_page(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            notification_timeout_secs: default_notification_timeout(),
            date_format: default_date_format(),
        }
    }
}

impl Config {
    /// Parse config from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a TOML string
    pub fn to_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;

        // Environment variables override config file values
        if let Ok(base) = std::env::var("NEWSDESK_API_BASE") {
            config.api_base = base;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read the config at `path`, writing defaults there if it does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_str(&content)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string()?)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newsdesk")
            .join("config.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(AppError::Config("per_page must be at least 1".to_string()));
        }
        url::Url::parse(&self.api_base)
            .map_err(|e| AppError::Config(format!("api_base {:?}: {}", self.api_base, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    // ==================== Default values ====================

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api_base, "http://127.0.0.1:5000/api");
        assert_eq!(config.per_page, FEED_PAGE_SIZE);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.notification_timeout(), Duration::from_secs(5));
        assert_eq!(config.date_format, "%b %e, %Y %H:%M");
    }

    // ==================== TOML parsing ====================

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
api_base = "https://news.example.com/api"
per_page = 12
request_timeout_secs = 60
connect_timeout_secs = 5
notification_timeout_secs = 8
date_format = "%d/%m/%Y"
"#;

        let config = assert_ok!(Config::from_str(toml));

        assert_eq!(config.api_base, "https://news.example.com/api");
        assert_eq!(config.per_page, 12);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.notification_timeout_secs, 8);
        assert_eq!(config.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();

        assert_eq!(config.api_base, default_api_base());
        assert_eq!(config.per_page, 9);
        assert_eq!(config.notification_timeout_secs, 5);
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert_err!(Config::from_str("this is not valid toml [[["));
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = Config::from_str(r#"per_page = "nine""#);
        assert!(matches!(result, Err(AppError::Toml(_))));
    }

    #[test]
    fn test_zero_per_page_rejected() {
        let result = Config::from_str("per_page = 0");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_relative_api_base_rejected() {
        // A browser can resolve "/api" against the page origin; a standalone client cannot.
        let result = Config::from_str(r#"api_base = "/api""#);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    // ==================== Files ====================

    #[test]
    fn test_load_from_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = assert_ok!(Config::load_from(&path));

        assert_eq!(config.per_page, 9);
        assert!(path.exists());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("api_base = \"http://127.0.0.1:5000/api\""));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let original = Config {
            api_base: "http://localhost:8080/api".to_string(),
            per_page: 3,
            ..Config::default()
        };

        original.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.api_base, original.api_base);
        assert_eq!(loaded.per_page, 3);
    }

    #[test]
    fn test_config_path_contains_app_name() {
        let path = Config::config_path();
        assert!(path.to_string_lossy().contains("newsdesk"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
