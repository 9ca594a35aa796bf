//! Configuration for ssvep-daemon

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Detection and retention settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Administrative access
    #[serde(default)]
    pub admin: AdminConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
            max_body_size: default_max_body_size(),
        }
    }
}

/// Detection and retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Maximum number of entries kept in the selection log
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    /// Lower bound of the simulated processing delay (inclusive)
    #[serde(default = "default_min_latency")]
    pub min_latency_ms: f64,

    /// Upper bound of the simulated processing delay (exclusive)
    #[serde(default = "default_max_latency")]
    pub max_latency_ms: f64,

    /// Probability that a detection reports a simulated fault
    #[serde(default = "default_fault_rate")]
    pub fault_rate: f64,

    /// Page size for log queries without a usable limit
    #[serde(default = "default_query_limit")]
    pub default_query_limit: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
            min_latency_ms: default_min_latency(),
            max_latency_ms: default_max_latency(),
            fault_rate: default_fault_rate(),
            default_query_limit: default_query_limit(),
        }
    }
}

impl DetectionConfig {
    /// Check the settings for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.log_capacity == 0 {
            return Err("log_capacity must be greater than zero".to_string());
        }
        if !(self.min_latency_ms >= 0.0 && self.min_latency_ms <= self.max_latency_ms) {
            return Err(format!(
                "latency bounds must satisfy 0 <= min <= max, got [{}, {})",
                self.min_latency_ms, self.max_latency_ms
            ));
        }
        if !self.max_latency_ms.is_finite() {
            return Err("max_latency_ms must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.fault_rate) {
            return Err(format!(
                "fault_rate must be within [0, 1], got {}",
                self.fault_rate
            ));
        }
        Ok(())
    }

    /// No artificial delay and no faults
    pub fn instant() -> Self {
        Self {
            min_latency_ms: 0.0,
            max_latency_ms: 0.0,
            fault_rate: 0.0,
            ..Default::default()
        }
    }
}

/// Administrative access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared secret required to clear the selection log
    #[serde(default = "default_admin_key")]
    pub key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            key: default_admin_key(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8080))
}

fn default_max_body_size() -> usize {
    64 * 1024
}

fn default_log_capacity() -> usize {
    1000
}

fn default_min_latency() -> f64 {
    50.0
}

fn default_max_latency() -> f64 {
    250.0
}

fn default_fault_rate() -> f64 {
    0.01
}

fn default_query_limit() -> usize {
    50
}

fn default_admin_key() -> String {
    "admin-secret-key".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file, and `SSVEP_*` env vars
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Nested keys use a double underscore: SSVEP_ADMIN__KEY
        builder = builder.add_source(
            config::Environment::with_prefix("SSVEP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert!(config.server.enable_cors);
        assert_eq!(config.admin.key, "admin-secret-key");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_detection_defaults() {
        let config = DetectionConfig::default();
        assert_eq!(config.log_capacity, 1000);
        assert_eq!(config.min_latency_ms, 50.0);
        assert_eq!(config.max_latency_ms, 250.0);
        assert_eq!(config.fault_rate, 0.01);
        assert_eq!(config.default_query_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_detection_validation() {
        let inverted = DetectionConfig {
            min_latency_ms: 300.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let bad_rate = DetectionConfig {
            fault_rate: 1.5,
            ..Default::default()
        };
        assert!(bad_rate.validate().is_err());

        let empty = DetectionConfig {
            log_capacity: 0,
            ..Default::default()
        };
        assert!(empty.validate().is_err());

        assert!(DetectionConfig::instant().validate().is_ok());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = DaemonConfig::load(None).unwrap();
        assert_eq!(config.detection.log_capacity, 1000);
        assert_eq!(config.server.listen_addr, default_listen_addr());
    }
}
