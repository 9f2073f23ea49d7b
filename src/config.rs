//! Application configuration
//!
//! Configuration is an explicitly constructed value handed to each
//! component; there is no process-wide config singleton. Values are
//! loaded from an optional TOML file (path in `LINKVAULT_CONFIG`) and
//! then overridden by environment variables.

use std::env;
use std::fs;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{LinkVaultError, Result};

/// Storage backends selectable at startup.
pub const SUPPORTED_BACKENDS: &[&str] = &["memory", "file", "sqlite", "postgres", "mysql", "mariadb"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub delete_pipeline: DeletePipelineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// One of `SUPPORTED_BACKENDS`.
    pub backend: String,
    /// Connection URL for the relational backends.
    pub database_url: String,
    /// Path of the append-only log for the `file` backend.
    pub links_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: "sqlite://linkvault.db".to_string(),
            links_file: "links.jsonl".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeletePipelineConfig {
    /// Bounded request queue; a full queue backpressures producers.
    pub queue_capacity: usize,
    /// Buffer size that triggers an immediate flush.
    pub flush_threshold: usize,
    /// Interval of the periodic flush trigger, in seconds.
    pub flush_interval_secs: u64,
    /// Deadline for the final flush when shutting down, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for DeletePipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            flush_threshold: 10,
            flush_interval_secs: 10,
            shutdown_grace_secs: 5,
        }
    }
}

impl DeletePipelineConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or
    /// `linkvault=debug,sea_orm=warn`.
    pub level: String,
    /// Log file path; empty or absent logs to stdout.
    pub file: Option<String>,
    /// `plain` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: "plain".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the TOML file named by
    /// `LINKVAULT_CONFIG` (if set), then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match env::var("LINKVAULT_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_file(&path)?,
            _ => AppConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LinkVaultError::validation(format!("cannot read config file '{}': {}", path, e))
        })?;
        toml::from_str(&content).map_err(|e| {
            LinkVaultError::validation(format!("cannot parse config file '{}': {}", path, e))
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Ok(url) = env::var("DATABASE_URL") {
            self.storage.database_url = url;
        }
        if let Ok(path) = env::var("LINKS_FILE") {
            self.storage.links_file = path;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.logging.file = Some(file);
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_BACKENDS.contains(&self.storage.backend.as_str()) {
            return Err(LinkVaultError::storage_plugin_not_found(format!(
                "unknown storage backend: {}. Supported: {}",
                self.storage.backend,
                SUPPORTED_BACKENDS.join(", ")
            )));
        }
        if self.delete_pipeline.queue_capacity == 0 {
            return Err(LinkVaultError::validation(
                "delete_pipeline.queue_capacity must be at least 1",
            ));
        }
        if self.delete_pipeline.flush_threshold == 0 {
            return Err(LinkVaultError::validation(
                "delete_pipeline.flush_threshold must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.delete_pipeline.queue_capacity, 100);
        assert_eq!(config.delete_pipeline.flush_threshold, 10);
        assert_eq!(config.delete_pipeline.flush_interval(), Duration::from_secs(10));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let mut config = AppConfig::default();
        config.storage.backend = "carrier-pigeon".to_string();
        assert!(matches!(
            config.validate(),
            Err(LinkVaultError::StoragePluginNotFound(_))
        ));
    }

    #[test]
    fn toml_sections_are_optional() {
        let config: AppConfig = toml::from_str(
            r#"
            [storage]
            backend = "file"
            links_file = "/tmp/links.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, "file");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.delete_pipeline.flush_threshold, 10);
    }
}
