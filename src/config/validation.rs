//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, threshold > 0, timeouts > 0)
//! - Reject a missing target before the engine is built
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PingStarterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{PingStarterConfig, ProbeKind};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("monitor.target must not be empty")]
    MissingTarget,

    #[error("monitor.interval_secs must be positive, got {0}")]
    NonPositiveInterval(i64),

    #[error("monitor.threshold must be positive, got {0}")]
    NonPositiveThreshold(i64),

    #[error("monitor.threshold {0} is too large")]
    ThresholdTooLarge(i64),

    #[error("probe.timeout_secs must be positive, got {0}")]
    NonPositiveProbeTimeout(i64),

    #[error("probe.port must be non-zero for tcp probes")]
    MissingTcpPort,

    #[error("actions.{0} must not be empty")]
    EmptyActionDir(&'static str),

    #[error("actions.extensions must list at least one extension")]
    NoExtensions,

    #[error("actions.extensions contains an empty entry")]
    EmptyExtension,

    #[error("actions.timeout_secs must not be negative, got {0}")]
    NegativeScriptTimeout(i64),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &PingStarterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let monitor = &config.monitor;
    if monitor.target.trim().is_empty() {
        errors.push(ValidationError::MissingTarget);
    }
    if monitor.interval_secs <= 0 {
        errors.push(ValidationError::NonPositiveInterval(monitor.interval_secs));
    }
    if monitor.threshold <= 0 {
        errors.push(ValidationError::NonPositiveThreshold(monitor.threshold));
    } else if monitor.threshold > i64::from(u32::MAX) {
        errors.push(ValidationError::ThresholdTooLarge(monitor.threshold));
    }

    if config.probe.timeout_secs <= 0 {
        errors.push(ValidationError::NonPositiveProbeTimeout(config.probe.timeout_secs));
    }
    if config.probe.kind == ProbeKind::Tcp && config.probe.port == 0 {
        errors.push(ValidationError::MissingTcpPort);
    }

    let actions = &config.actions;
    if actions.reachable_dir.trim().is_empty() {
        errors.push(ValidationError::EmptyActionDir("reachable_dir"));
    }
    if actions.not_reachable_dir.trim().is_empty() {
        errors.push(ValidationError::EmptyActionDir("not_reachable_dir"));
    }
    if actions.extensions.is_empty() {
        errors.push(ValidationError::NoExtensions);
    } else if actions
        .extensions
        .iter()
        .any(|ext| ext.trim().trim_start_matches('.').is_empty())
    {
        errors.push(ValidationError::EmptyExtension);
    }
    if actions.timeout_secs < 0 {
        errors.push(ValidationError::NegativeScriptTimeout(actions.timeout_secs));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
