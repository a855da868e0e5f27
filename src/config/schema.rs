//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Upstream flight-state endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://opensky-network.org/api/states/all";

/// Environment variable holding the upstream username.
pub const USERNAME_ENV: &str = "OPENSKY_USERNAME";

/// Environment variable holding the upstream password.
pub const PASSWORD_ENV: &str = "OPENSKY_PASSWORD";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, route).
    pub listener: ListenerConfig,

    /// Upstream endpoint and outbound call settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Upstream credentials. Only ever sourced from the environment.
    #[serde(skip)]
    pub credentials: Credentials,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path the proxy handler is mounted on.
    pub route_path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            route_path: "/api/opensky".to_string(),
        }
    }
}

/// Upstream call configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base endpoint the bounding-box parameters are appended to.
    pub base_url: String,

    /// Deadline for the upstream response headers, in milliseconds.
    pub timeout_ms: u64,

    /// `max-age` advertised on passthrough responses, in seconds.
    pub cache_max_age_secs: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` for the outbound call.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_ms: 10_000,
            cache_max_age_secs: 10,
            system_proxy: true,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Wall-clock ceiling for a single inbound request, in seconds.
    pub execution_budget_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            execution_budget_secs: 15,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Optional Basic credentials for the upstream API.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Read credentials from `OPENSKY_USERNAME` / `OPENSKY_PASSWORD`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            username: lookup(USERNAME_ENV),
            password: lookup(PASSWORD_ENV),
        }
    }

    /// Both halves, if both are present and non-empty.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream.timeout_ms, 10_000);
        assert_eq!(config.upstream.cache_max_age_secs, 10);
        assert_eq!(config.timeouts.execution_budget_secs, 15);
        assert_eq!(config.listener.route_path, "/api/opensky");
        assert!(config.credentials.pair().is_none());
    }

    #[test]
    fn test_credentials_both_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (USERNAME_ENV, "alice"),
            (PASSWORD_ENV, "s3cret"),
        ]));
        assert_eq!(creds.pair(), Some(("alice", "s3cret")));
    }

    #[test]
    fn test_credentials_partial_or_empty() {
        let only_user = Credentials::from_lookup(lookup_from(&[(USERNAME_ENV, "alice")]));
        assert!(only_user.pair().is_none());

        let only_pass = Credentials::from_lookup(lookup_from(&[(PASSWORD_ENV, "s3cret")]));
        assert!(only_pass.pair().is_none());

        let empty_pass = Credentials::from_lookup(lookup_from(&[
            (USERNAME_ENV, "alice"),
            (PASSWORD_ENV, ""),
        ]));
        assert!(empty_pass.pair().is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "s3cret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("s3cret"));
    }
}
