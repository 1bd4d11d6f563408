//! Application configuration loader.
//!
//! Settings come from, highest priority first:
//!
//! 1. Environment variables (`DATABASE_URL`, `ENTITY_CONSOLE_PAGE_SIZE`,
//!    `ENTITY_CONSOLE_LOG`), including those loaded from `.env`
//! 2. A YAML file: `$ENTITY_CONSOLE_CONFIG`, or `entity-console.yaml` in the
//!    working directory if present
//! 3. Built-in defaults
//!
//! ```yaml
//! database_url: library.db
//! page_size: 10
//! log_filter: info
//! pool:
//!   max_connections: 2
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::diesel_runtime::DatabaseConfig;

pub const DEFAULT_CONFIG_FILE: &str = "entity-console.yaml";
pub const DEFAULT_DATABASE_URL: &str = "entity_console.db";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime configuration for the console
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file
    pub database_url: String,
    /// Records shown per page when reading a table
    pub page_size: usize,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    pub pool: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            pool: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment and optional YAML file.
    pub fn load() -> Result<Self, String> {
        let config = match std::env::var("ENTITY_CONSOLE_CONFIG") {
            Ok(path) => Self::load_from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse configuration from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file can't be read or has an invalid format
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, String> {
        let config: AppConfig = serde_yaml::from_str(contents)
            .map_err(|e| format!("Failed to parse YAML: {}", e))?;
        config.validate()
    }

    /// Apply environment overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }

        if let Some(raw) = lookup("ENTITY_CONSOLE_PAGE_SIZE") {
            self.page_size = raw
                .trim()
                .parse()
                .map_err(|_| format!("ENTITY_CONSOLE_PAGE_SIZE must be a number, got '{}'", raw))?;
        }

        if let Some(filter) = lookup("ENTITY_CONSOLE_LOG") {
            self.log_filter = filter;
        }

        self.validate()
    }

    fn validate(self) -> Result<Self, String> {
        if self.page_size == 0 {
            return Err("page_size must be at least 1".to_string());
        }
        if self.database_url.trim().is_empty() {
            return Err("database_url must not be empty".to_string());
        }
        self.pool.validate()?;
        Ok(self)
    }
}
