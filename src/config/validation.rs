//! Semantic configuration checks.
//!
//! Syntactic validation belongs to serde; this module rejects configs that
//! deserialize fine but cannot run (hop limit of zero, unparseable
//! endpoints, thresholds out of range).

use thiserror::Error;
use url::Url;

use crate::config::schema::NodeConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("max_hops must be at least 1")]
    ZeroMaxHops,

    #[error("invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("breaker error threshold must be 1-100, got {0}")]
    ErrorThresholdOutOfRange(u8),

    #[error("breaker min_volume must be at least 1")]
    ZeroMinVolume,

    #[error("fault trigger threshold must be below 1.0, got {0}")]
    FaultThresholdOutOfRange(f64),
}

/// Validate the full config, collecting every problem rather than stopping
/// at the first.
pub fn validate_config(config: &NodeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.identity.trim().is_empty() {
        errors.push(ValidationError::EmptyIdentity);
    }
    if config.chain.max_hops == 0 {
        errors.push(ValidationError::ZeroMaxHops);
    }
    if Url::parse(&config.chain.next_hop_endpoint).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "chain.next_hop_endpoint",
            value: config.chain.next_hop_endpoint.clone(),
        });
    }
    if Url::parse(&config.store.url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "store.url",
            value: config.store.url.clone(),
        });
    }
    if config.breaker.error_threshold_pct == 0 || config.breaker.error_threshold_pct > 100 {
        errors.push(ValidationError::ErrorThresholdOutOfRange(
            config.breaker.error_threshold_pct,
        ));
    }
    if config.breaker.min_volume == 0 {
        errors.push(ValidationError::ZeroMinVolume);
    }
    if config.fault.trigger_threshold >= 1.0 {
        errors.push(ValidationError::FaultThresholdOutOfRange(
            config.fault.trigger_threshold,
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
