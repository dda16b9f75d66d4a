//! Configuration module for loading and parsing TOML configuration files.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Change and warning notification configuration.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// In-memory warning log configuration.
    #[serde(default)]
    pub warnings: WarningConfig,
    /// Optional warning persistence.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Messages buffered per subscriber before it starts lagging.
    pub channel_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1000,
        }
    }
}

/// Warning log configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WarningConfig {
    /// Warnings kept in memory; the oldest are evicted first.
    pub retention: usize,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self { retention: 10_000 }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. Warnings stay in memory when unset.
    #[serde(default)]
    pub url: Option<String>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads configuration from `path` if it exists, defaults otherwise.
    ///
    /// # Errors
    /// Returns error if an existing file cannot be read or parsed.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `HOST`, `PORT` and `DATABASE_URL` from the environment.
    ///
    /// # Errors
    /// Returns error if `PORT` is not a valid port number.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT must be a number: {}", port)))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        self.validate()?;
        Ok(self)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "server host cannot be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue(
                "server port must be positive".to_string(),
            ));
        }
        if self.notifications.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "notification channel_capacity must be positive".to_string(),
            ));
        }
        if self.warnings.retention == 0 {
            return Err(ConfigError::InvalidValue(
                "warning retention must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 3000

[notifications]
channel_capacity = 64

[warnings]
retention = 500

[database]
url = "postgres://localhost/status"
"#;

        let config = Config::parse(toml_content).expect("should parse");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.notifications.channel_capacity, 64);
        assert_eq!(config.warnings.retention, 500);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/status")
        );
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = Config::parse("").expect("should parse");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.notifications.channel_capacity, 1000);
        assert_eq!(config.warnings.retention, 10_000);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_validation_zero_capacity() {
        let result = Config::parse("[notifications]\nchannel_capacity = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validation_zero_retention() {
        let result = Config::parse("[warnings]\nretention = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("DATABASE_URL", "postgres://db/status"),
        ]);
        let config = Config::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .expect("should apply");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/status"));
    }

    #[test]
    fn test_env_override_bad_port() {
        let result = Config::default().with_overrides(|key| {
            (key == "PORT").then(|| "eighty".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/status-config.toml").unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
