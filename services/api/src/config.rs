use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// How often the simulated metrics are refreshed.
    pub metrics_interval: Duration,
    /// Whether the host offers speech recognition.
    pub speech_recognition: bool,
    /// Whether the host offers speech synthesis.
    pub speech_synthesis: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: Level::INFO,
            metrics_interval: Duration::from_millis(2000),
            speech_recognition: true,
            speech_synthesis: true,
        }
    }
}

fn parse_flag(var: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(
                var.to_string(),
                format!("'{}' is not a boolean", raw),
            )),
        },
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let interval_str =
            std::env::var("METRICS_INTERVAL_MS").unwrap_or_else(|_| "2000".to_string());
        let metrics_interval = match interval_str.parse::<u64>() {
            Ok(ms) if ms > 0 => Duration::from_millis(ms),
            _ => {
                return Err(ConfigError::InvalidValue(
                    "METRICS_INTERVAL_MS".to_string(),
                    format!("'{}' is not a positive number of milliseconds", interval_str),
                ));
            }
        };

        let speech_recognition = parse_flag("SPEECH_RECOGNITION", true)?;
        let speech_synthesis = parse_flag("SPEECH_SYNTHESIS", true)?;

        Ok(Self {
            bind_address,
            log_level,
            metrics_interval,
            speech_recognition,
            speech_synthesis,
        })
    }
}
