use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Environment variable holding the node endpoint
pub const RPC_URL_VAR: &str = "RPC_URL";
/// Environment variable re-read every cycle for the watched address
pub const ADDRESS_VAR: &str = "ADDRESS";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rpc: RpcConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

/// RPC client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL, required
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Attempts per RPC call within one cycle
    pub max_retries: u32,
    /// Initial retry delay in seconds
    pub retry_delay_seconds: u64,
    /// Maximum retry delay in seconds
    pub max_retry_delay_seconds: u64,
}

/// Poll loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sleep between poll cycles in seconds
    pub poll_interval_seconds: u64,
    /// Environment variable consulted every cycle for the address
    pub address_env_var: String,
    /// Address used when the environment variable is unset
    pub address: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 1,
            max_retry_delay_seconds: 8,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 10,
            address_env_var: ADDRESS_VAR.to_string(),
            address: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the file named by `CONFIG_FILE`, or `config.toml`.
    /// A missing file yields the defaults.
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if !Path::new(&config_path).exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Load from an explicit TOML file, which must exist
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parsing(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(endpoint) = env::var(RPC_URL_VAR) {
            self.rpc.endpoint = endpoint;
        }
        if let Ok(timeout) = env::var("RPC_TIMEOUT_SECONDS") {
            self.rpc.timeout_seconds = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RPC_TIMEOUT_SECONDS".to_string(),
                value: timeout,
            })?;
        }
        if let Ok(retries) = env::var("RPC_MAX_RETRIES") {
            self.rpc.max_retries = retries.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RPC_MAX_RETRIES".to_string(),
                value: retries,
            })?;
        }

        if let Ok(interval) = env::var("POLL_INTERVAL") {
            self.monitor.poll_interval_seconds =
                interval.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "POLL_INTERVAL".to_string(),
                    value: interval,
                })?;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar(RPC_URL_VAR.to_string()));
        }

        if !self.rpc.endpoint.starts_with("http://") && !self.rpc.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(self.rpc.endpoint.clone()));
        }

        if self.rpc.timeout_seconds == 0 || self.rpc.timeout_seconds > 300 {
            return Err(ConfigError::InvalidValue {
                key: "rpc.timeout_seconds".to_string(),
                value: self.rpc.timeout_seconds.to_string(),
            });
        }

        if self.rpc.max_retries == 0 || self.rpc.max_retries > 20 {
            return Err(ConfigError::InvalidValue {
                key: "rpc.max_retries".to_string(),
                value: self.rpc.max_retries.to_string(),
            });
        }

        if self.rpc.retry_delay_seconds > self.rpc.max_retry_delay_seconds {
            return Err(ConfigError::InvalidValue {
                key: "rpc.retry_delay_seconds".to_string(),
                value: self.rpc.retry_delay_seconds.to_string(),
            });
        }

        if self.monitor.poll_interval_seconds == 0 || self.monitor.poll_interval_seconds > 3600 {
            return Err(ConfigError::InvalidValue {
                key: "monitor.poll_interval_seconds".to_string(),
                value: self.monitor.poll_interval_seconds.to_string(),
            });
        }

        if self.monitor.address_env_var.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "monitor.address_env_var".to_string(),
                value: self.monitor.address_env_var.clone(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parsing(e.to_string()))
    }

    /// Generate a sample configuration file
    pub fn generate_sample_config() -> Result<String, ConfigError> {
        let mut config = Self::default();
        config.rpc.endpoint = "https://mainnet.infura.io/v3/YOUR_KEY".to_string();
        config.to_toml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::NamedTempFile;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.rpc.endpoint = "https://rpc.example.org".to_string();
        config
    }

    fn clear_env() {
        for var in [
            "CONFIG_FILE",
            RPC_URL_VAR,
            "RPC_TIMEOUT_SECONDS",
            "RPC_MAX_RETRIES",
            "POLL_INTERVAL",
            "LOG_LEVEL",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rpc.endpoint, "");
        assert_eq!(config.rpc.timeout_seconds, 30);
        assert_eq!(config.monitor.poll_interval_seconds, 10);
        assert_eq!(config.monitor.address_env_var, "ADDRESS");
        assert_eq!(config.monitor.address, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_endpoint_is_reported_by_name() {
        let config = AppConfig::default();
        match config.validate() {
            Err(ConfigError::MissingEnvVar(var)) => assert_eq!(var, "RPC_URL"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(valid_config().validate().is_ok());

        let mut config = valid_config();
        config.rpc.endpoint = "ws://node".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        let mut config = valid_config();
        config.rpc.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.rpc.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.monitor.poll_interval_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var(RPC_URL_VAR, "https://test-rpc.com/");
        env::set_var("POLL_INTERVAL", "5");
        env::set_var("RPC_MAX_RETRIES", "2");
        env::set_var("LOG_LEVEL", "debug");

        let mut config = AppConfig::default();
        config.apply_env_overrides().unwrap();

        assert_eq!(config.rpc.endpoint, "https://test-rpc.com/");
        assert_eq!(config.monitor.poll_interval_seconds, 5);
        assert_eq!(config.rpc.max_retries, 2);
        assert_eq!(config.logging.level, "debug");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_env_values() {
        clear_env();
        env::set_var("POLL_INTERVAL", "soon");

        let mut config = AppConfig::default();
        let result = config.apply_env_overrides();

        assert!(matches!(result, Err(ConfigError::InvalidValue { ref key, .. }) if key == "POLL_INTERVAL"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_file_loading() {
        clear_env();
        let config_content = r#"
[rpc]
endpoint = "https://custom-rpc.com/"
timeout_seconds = 45
max_retries = 4

[monitor]
poll_interval_seconds = 3
address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"

[logging]
level = "warn"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut temp_file, config_content.as_bytes()).unwrap();

        env::set_var("CONFIG_FILE", temp_file.path().to_str().unwrap());

        let config = AppConfig::load_from_file().unwrap();

        assert_eq!(config.rpc.endpoint, "https://custom-rpc.com/");
        assert_eq!(config.rpc.timeout_seconds, 45);
        assert_eq!(config.rpc.max_retries, 4);
        // unspecified keys keep their defaults
        assert_eq!(config.rpc.retry_delay_seconds, 1);
        assert_eq!(config.monitor.poll_interval_seconds, 3);
        assert_eq!(config.monitor.address_env_var, "ADDRESS");
        assert_eq!(
            config.monitor.address.as_deref(),
            Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")
        );
        assert_eq!(config.logging.level, "warn");

        clear_env();
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = AppConfig::load_from_path("/nonexistent/address-monitor.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_generate_sample_config() {
        let sample = AppConfig::generate_sample_config().unwrap();
        assert!(sample.contains("[rpc]"));
        assert!(sample.contains("[monitor]"));
        assert!(sample.contains("[logging]"));

        let parsed: AppConfig = toml::from_str(&sample).unwrap();
        assert!(parsed.validate().is_ok());
    }
}
