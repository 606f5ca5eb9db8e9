use crate::routing::RoutingTable;
use relay_transport::{ClientConfig, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment configuration.
///
/// ```toml
/// strict = false
///
/// [relay]
/// host = "192.168.122.125"
/// port = 50051
///
/// [routes]
/// rfid = "rfid_reader_node"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Relay connection.
    pub relay: ClientConfig,

    /// Fail a grouped call when any node gives no answer, instead of
    /// skipping that node.
    pub strict: bool,

    /// Prefix → node overrides.
    pub routes: RoutingTable,
}

impl EnvironmentConfig {
    pub fn new(relay: ClientConfig) -> Self {
        Self {
            relay,
            ..Self::default()
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_str = path_ref.display().to_string();
        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path_str,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn defaults_are_lenient() {
        let config = EnvironmentConfig::default();
        assert!(!config.strict);
        assert!(config.routes.is_empty());
        assert_eq!(config.relay.port, 50051);
    }

    #[test]
    fn parse_full_config() {
        let input = r#"
strict = true

[relay]
host = "192.168.122.125"
port = 50051

[routes]
rfid = "rfid_reader_node"
"#;

        let config = EnvironmentConfig::from_toml_str(input).expect("config should parse");
        assert!(config.strict);
        assert_eq!(config.relay.host, "192.168.122.125");
        assert_eq!(
            config.routes.resolve("rfid_data"),
            Some("rfid_reader_node".to_string())
        );
    }

    #[test]
    fn load_from_file() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        let path: PathBuf = std::env::temp_dir().join(format!("relay-env-{unique}.toml"));

        fs::write(&path, "[relay]\nport = 6000\n").expect("temporary config should be written");
        let loaded = EnvironmentConfig::from_file(&path).expect("config should load");
        assert_eq!(loaded.relay.port, 6000);
        assert_eq!(loaded.relay.host, "127.0.0.1");
        assert!(!loaded.strict);

        fs::remove_file(path).expect("temporary file should be removed");
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        let path: PathBuf = std::env::temp_dir().join(format!("relay-env-bad-{unique}.toml"));

        fs::write(&path, "strict = \"maybe\"\n").expect("temporary config should be written");
        let err = EnvironmentConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        fs::remove_file(path).expect("temporary file should be removed");
    }
}
