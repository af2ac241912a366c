//! Configuration loading: TOML base file plus environment overrides.
//!
//! Every knob has an enumerated environment variable so a node can be
//! configured entirely from its environment, matching how the chain is
//! deployed (one binary, N differently-configured processes).

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::NodeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Validation failed: {0:?}")]
    Validation(Vec<ValidationError>),
}

/// Load configuration for this process.
///
/// Reads the TOML file named by `CONFIG_PATH` when set, then applies
/// environment overrides and validates the result.
pub fn load() -> Result<NodeConfig, ConfigError> {
    let mut config = match std::env::var("CONFIG_PATH") {
        Ok(path) => load_file(Path::new(&path))?,
        Err(_) => NodeConfig::default(),
    };

    apply_env(&mut config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and deserialize a TOML config file.
pub fn load_file(path: &Path) -> Result<NodeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: NodeConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Apply environment-style overrides from `lookup`.
///
/// The lookup is injected so tests can drive this from a plain map instead
/// of mutating the process environment.
pub fn apply_env<F>(config: &mut NodeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("SERVICE_IDENTITY") {
        config.identity = v;
    }
    if let Some(v) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
        config.listener.request_timeout_secs = parse(&v, "REQUEST_TIMEOUT_SECS")?;
    }
    if let Some(v) = lookup("MAX_HOPS") {
        config.chain.max_hops = parse(&v, "MAX_HOPS")?;
    }
    if let Some(v) = lookup("NEXT_HOP_ENDPOINT") {
        config.chain.next_hop_endpoint = v;
    }
    if let Some(v) = lookup("INJECT_ERR") {
        config.fault.enabled = parse_flag(&v);
    }
    if let Some(v) = lookup("FAULT_TRIGGER_THRESHOLD") {
        config.fault.trigger_threshold = parse(&v, "FAULT_TRIGGER_THRESHOLD")?;
    }
    if let Some(v) = lookup("STORE_URL") {
        config.store.url = v;
    }
    if let Some(v) = lookup("BREAKER_CALL_TIMEOUT_MS") {
        config.breaker.call_timeout_ms = parse(&v, "BREAKER_CALL_TIMEOUT_MS")?;
    }
    if let Some(v) = lookup("BREAKER_ERROR_THRESHOLD_PCT") {
        config.breaker.error_threshold_pct = parse(&v, "BREAKER_ERROR_THRESHOLD_PCT")?;
    }
    if let Some(v) = lookup("BREAKER_RESET_TIMEOUT_MS") {
        config.breaker.reset_timeout_ms = parse(&v, "BREAKER_RESET_TIMEOUT_MS")?;
    }
    if let Some(v) = lookup("BREAKER_MIN_VOLUME") {
        config.breaker.min_volume = parse(&v, "BREAKER_MIN_VOLUME")?;
    }
    if let Some(v) = lookup("BREAKER_WINDOW_MS") {
        config.breaker.window_ms = parse(&v, "BREAKER_WINDOW_MS")?;
    }
    if let Some(v) = lookup("LOG_LEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = lookup("METRICS_ENABLED") {
        config.observability.metrics_enabled = parse_flag(&v);
    }
    if let Some(v) = lookup("METRICS_ADDRESS") {
        config.observability.metrics_address = v;
    }
    Ok(())
}

fn parse<T: std::str::FromStr>(value: &str, var: &'static str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

/// The original deployment used `INJECT_ERR=1`; accept the usual boolean
/// spellings as well.
fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("SERVICE_IDENTITY", "payment"),
            ("MAX_HOPS", "4"),
            ("INJECT_ERR", "1"),
            ("NEXT_HOP_ENDPOINT", "http://shipment:3000/create"),
            ("BREAKER_MIN_VOLUME", "7"),
        ]);

        let mut config = NodeConfig::default();
        apply_env(&mut config, |k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.identity, "payment");
        assert_eq!(config.chain.max_hops, 4);
        assert!(config.fault.enabled);
        assert_eq!(config.chain.next_hop_endpoint, "http://shipment:3000/create");
        assert_eq!(config.breaker.min_volume, 7);
        // Untouched fields keep their defaults.
        assert_eq!(config.breaker.call_timeout_ms, 300);
    }

    #[test]
    fn test_invalid_numeric_override_is_an_error() {
        let vars = env(&[("MAX_HOPS", "six")]);
        let mut config = NodeConfig::default();
        let err = apply_env(&mut config, |k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "MAX_HOPS", .. }));
    }

    #[test]
    fn test_flag_spellings() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag("on"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
