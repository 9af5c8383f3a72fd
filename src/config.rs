use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::feed::FeedSource;

pub const MAX_COLUMNS: u16 = 8;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid width in product tiles.
    pub columns: u16,
    /// Feed files or URLs, loaded in order.
    pub sources: Vec<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 2,
            sources: Vec::new(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("feed-grid").join("config.toml"))
    }

    /// Load the user config, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.columns == 0 || self.columns > MAX_COLUMNS {
            return Err(AppError::Config(format!(
                "columns must be between 1 and {MAX_COLUMNS}, got {}",
                self.columns
            )));
        }
        Ok(self)
    }

    pub fn feed_sources(&self) -> Result<Vec<FeedSource>> {
        self.sources.iter().map(|s| s.parse()).collect()
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("feed-grid")
                .join("feed-grid.log")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.columns, 2);
        assert!(config.sources.is_empty());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn reads_columns_and_sources() {
        let config = Config::from_toml(
            r#"
            columns = 3
            sources = ["feed.json", "https://example.com/feed.json"]
            log_file = "/tmp/feed-grid-test.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.columns, 3);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/feed-grid-test.log"));

        let sources = config.feed_sources().unwrap();
        assert_eq!(sources[0], FeedSource::File(PathBuf::from("feed.json")));
        assert!(matches!(sources[1], FeedSource::Url(_)));
    }

    #[test]
    fn rejects_zero_columns() {
        let err = Config::from_toml("columns = 0").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn rejects_too_many_columns() {
        let err = Config::from_toml("columns = 9").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn bad_toml_is_toml_error() {
        let err = Config::from_toml("columns = \"two\"").unwrap_err();
        assert!(matches!(err, AppError::Toml(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "columns = 4").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.columns, 4);
    }
}
