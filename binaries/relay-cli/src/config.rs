//! CLI configuration.
//!
//! The file holds the environment settings at top level plus a `[logging]`
//! table; command-line flags override both.

use relay_env::EnvironmentConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Relay connection, strictness and routes.
    #[serde(flatten)]
    pub environment: EnvironmentConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Log format (pretty, json, compact).
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &super::CliArgs) {
        if let Some(ref host) = args.host {
            self.environment.relay.host = host.clone();
        }

        if let Some(port) = args.port {
            self.environment.relay.port = port;
        }

        if args.strict {
            self.environment.strict = true;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }

        if args.json_logs {
            self.logging.format = "json".to_string();
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        if self.environment.relay.host.is_empty() {
            anyhow::bail!("Relay host must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();

        assert_eq!(config.environment.relay.endpoint(), "http://127.0.0.1:50051");
        assert!(!config.environment.strict);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_config_validation() {
        let mut config = CliConfig::default();
        assert!(config.validate().is_ok());

        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "debug".to_string();

        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
        config.logging.format = "json".to_string();

        config.environment.relay.host.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_file_shape() {
        let input = r#"
strict = true

[relay]
host = "192.168.122.125"
port = 50051

[routes]
rfid = "rfid_reader_node"

[logging]
level = "debug"
"#;

        let config: CliConfig = toml::from_str(input).unwrap();
        assert!(config.environment.strict);
        assert_eq!(config.environment.relay.host, "192.168.122.125");
        assert_eq!(
            config.environment.routes.resolve("rfid_data").as_deref(),
            Some("rfid_reader_node")
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_config_serialization() {
        let config = CliConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: CliConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.environment, config.environment);
    }
}
