//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Keep the upstream deadline strictly under the execution budget
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.route_path '{0}' must start with '/'")]
    RoutePath(String),

    #[error("upstream.base_url '{0}' is not an http(s) URL")]
    BaseUrl(String),

    #[error("upstream.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("upstream.timeout_ms ({timeout_ms}) must be below the execution budget ({budget_ms} ms)")]
    TimeoutExceedsBudget { timeout_ms: u64, budget_ms: u64 },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if !config.listener.route_path.starts_with('/') {
        errors.push(ValidationError::RoutePath(config.listener.route_path.clone()));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::BaseUrl(config.upstream.base_url.clone())),
    }

    let timeout_ms = config.upstream.timeout_ms;
    let budget_ms = config.timeouts.execution_budget_secs.saturating_mul(1000);
    if timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    } else if timeout_ms >= budget_ms {
        errors.push(ValidationError::TimeoutExceedsBudget { timeout_ms, budget_ms });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ProxyConfig::default()), Ok(()));
    }

    #[test]
    fn test_timeout_must_stay_under_budget() {
        let mut config = ProxyConfig::default();
        config.upstream.timeout_ms = 15_000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::TimeoutExceedsBudget {
                timeout_ms: 15_000,
                budget_ms: 15_000
            }]
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = ProxyConfig::default();
        config.upstream.timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ZeroTimeout]);
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "localhost".into();
        config.listener.route_path = "api/opensky".into();
        config.upstream.base_url = "ftp://example.com/states".into();
        config.observability.metrics_address = "nope".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::RoutePath("api/opensky".into())));
        assert!(errors.contains(&ValidationError::BaseUrl("ftp://example.com/states".into())));
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "nope".into();

        assert!(validate_config(&config).is_ok());
    }
}
