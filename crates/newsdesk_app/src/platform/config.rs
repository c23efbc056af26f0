use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use newsdesk_engine::FetchSettings;
use newsdesk_logging::desk_info;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;
use crate::Cli;

/// Environment variable that overrides `api_key`.
pub const API_KEY_ENV: &str = "GNEWS_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub lang: String,
    pub country: String,
    pub max_articles: u32,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub tick_millis: u64,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            api_base_url: fetch.api_base_url,
            api_key: fetch.api_key,
            lang: fetch.lang,
            country: fetch.country,
            max_articles: fetch.max_articles,
            data_dir: PathBuf::from("newsdesk-data"),
            export_dir: PathBuf::from("."),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_response_bytes: fetch.max_bytes,
            tick_millis: 100,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    /// Reads a RON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        desk_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Applies the environment, then the command line, on top of the file.
    pub fn with_overrides(mut self, cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = env(API_KEY_ENV).filter(|key| !key.trim().is_empty()) {
            self.api_key = key;
        }
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(dir) = &cli.export_dir {
            self.export_dir = dir.clone();
        }
        if let Some(destination) = cli.log {
            self.log_destination = destination;
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(10))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            api_base_url: self.api_base_url.clone(),
            api_key: self.api_key.clone(),
            lang: self.lang.clone(),
            country: self.country.clone(),
            max_articles: self.max_articles,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("newsdesk").chain(args.iter().copied()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.max_articles, 50);
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("newsdesk.ron");
        fs::write(
            &path,
            r#"(country: "gb", max_articles: 10, log_destination: both)"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.country, "gb");
        assert_eq!(config.max_articles, 10);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("newsdesk.ron");
        fs::write(&path, "(max_articles: \"many\"").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn env_and_cli_override_file_values() {
        let config = AppConfig {
            api_key: "from-file".to_string(),
            ..AppConfig::default()
        }
        .with_overrides(
            &cli(&["--data-dir", "/tmp/news", "--log", "terminal"]),
            |name| (name == API_KEY_ENV).then(|| "from-env".to_string()),
        );

        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/news"));
        assert_eq!(config.log_destination, LogDestination::Terminal);

        let settings = config.fetch_settings();
        assert_eq!(settings.api_key, "from-env");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn cli_parses_category() {
        let parsed = cli(&["--category", "Science", "--query", "mars"]);
        assert_eq!(parsed.category, Some(newsdesk_core::Category::Science));
        assert_eq!(parsed.query.as_deref(), Some("mars"));
    }
}
