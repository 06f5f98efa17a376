//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Transport timeouts, each tunable on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// TCP connect
    pub connect: Duration,
    /// TLS handshake after the TCP connection is up
    pub tls_handshake: Duration,
    /// Time from sending the request until response headers arrive
    pub response_header: Duration,
    /// How long an unused pooled connection is kept
    pub idle: Duration,
    /// Overall per-request deadline, body included
    pub request: Duration,
}

impl Timeouts {
    /// Deadline for `send` to yield response headers.
    ///
    /// A fresh connection may spend up to `connect + tls_handshake` before the
    /// request is even written, so the header budget is added on top of it.
    /// Otherwise a short `response_header` would cut off connection setup.
    pub fn header_deadline(&self) -> Duration {
        self.connect + self.tls_handshake + self.response_header
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(60),
            tls_handshake: Duration::from_secs(60),
            response_header: Duration::from_secs(60),
            idle: Duration::from_secs(90),
            request: Duration::from_secs(120),
        }
    }
}

/// Client configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host of the store, optionally with an explicit `http://`/`https://` scheme
    pub endpoint: String,
    /// Auth token sent on every request
    pub token: String,
    /// Keyspace (namespace) segment appended to both API base URLs
    pub keyspace: String,
    /// Transport timeouts
    pub timeouts: Timeouts,
    /// TTL used for reads of resources without an explicit override
    pub default_ttl: Duration,
    /// Per-resource TTL overrides, keyed by the first path segment
    pub resource_ttls: HashMap<String, Duration>,
    /// Period of the background reclamation task
    pub cleanup_interval: Duration,
}

impl Config {
    /// Creates a config for the given store coordinates with default tuning.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        keyspace: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            keyspace: keyspace.into(),
            timeouts: Timeouts::default(),
            default_ttl: Duration::from_secs(30),
            resource_ttls: HashMap::new(),
            cleanup_interval: Duration::from_secs(60),
        }
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ASTRA_DB_TOKEN`, `ASTRA_DB_ENDPOINT`, `ASTRA_DB_KEYSPACE` - required
    /// - `CONNECT_TIMEOUT_SECS` (default: 60)
    /// - `TLS_HANDSHAKE_TIMEOUT_SECS` (default: 60)
    /// - `RESPONSE_HEADER_TIMEOUT_SECS` (default: 60)
    /// - `IDLE_TIMEOUT_SECS` (default: 90)
    /// - `REQUEST_TIMEOUT_SECS` (default: 120)
    /// - `DEFAULT_CACHE_TTL_SECS` (default: 30)
    /// - `CACHE_TTLS` - comma separated `resource=secs` overrides
    /// - `CLEANUP_INTERVAL_SECS` (default: 60)
    pub fn from_env() -> Result<Self> {
        let token = required_var("ASTRA_DB_TOKEN")?;
        let endpoint = required_var("ASTRA_DB_ENDPOINT")?;
        let keyspace = required_var("ASTRA_DB_KEYSPACE")?;

        let defaults = Timeouts::default();
        let mut config = Self::new(endpoint, token, keyspace);
        config.timeouts = Timeouts {
            connect: secs_var("CONNECT_TIMEOUT_SECS", defaults.connect),
            tls_handshake: secs_var("TLS_HANDSHAKE_TIMEOUT_SECS", defaults.tls_handshake),
            response_header: secs_var("RESPONSE_HEADER_TIMEOUT_SECS", defaults.response_header),
            idle: secs_var("IDLE_TIMEOUT_SECS", defaults.idle),
            request: secs_var("REQUEST_TIMEOUT_SECS", defaults.request),
        };
        config.default_ttl = secs_var("DEFAULT_CACHE_TTL_SECS", config.default_ttl);
        config.cleanup_interval = secs_var("CLEANUP_INTERVAL_SECS", config.cleanup_interval);
        config.resource_ttls = env::var("CACHE_TTLS")
            .map(|raw| parse_resource_ttls(&raw))
            .unwrap_or_default();

        config.validate()?;
        Ok(config)
    }

    /// Rejects durations that must be positive.
    ///
    /// A zero timeout fails every request at once and a zero cleanup interval
    /// spins the reclamation task. Zero cache TTLs stay valid; they disable
    /// caching.
    pub fn validate(&self) -> Result<()> {
        let t = &self.timeouts;
        let required = [
            ("CONNECT_TIMEOUT_SECS", t.connect),
            ("TLS_HANDSHAKE_TIMEOUT_SECS", t.tls_handshake),
            ("RESPONSE_HEADER_TIMEOUT_SECS", t.response_header),
            ("IDLE_TIMEOUT_SECS", t.idle),
            ("REQUEST_TIMEOUT_SECS", t.request),
            ("CLEANUP_INTERVAL_SECS", self.cleanup_interval),
        ];

        match required.iter().find(|(_, value)| value.is_zero()) {
            Some((name, _)) => Err(ClientError::Config(format!("{} must be positive", name))),
            None => Ok(()),
        }
    }

    /// Base URL of the row-oriented REST API.
    pub fn rest_base_url(&self) -> String {
        format!(
            "{}/api/rest/v2/keyspaces/{}",
            self.origin(),
            self.keyspace
        )
    }

    /// Base URL of the document-oriented Data API.
    pub fn data_api_url(&self) -> String {
        format!("{}/api/json/v1/{}", self.origin(), self.keyspace)
    }

    /// TTL for reads of `resource`, falling back to the default.
    pub fn ttl_for(&self, resource: &str) -> Duration {
        self.resource_ttls
            .get(resource)
            .copied()
            .unwrap_or(self.default_ttl)
    }

    fn origin(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("https://{}", endpoint)
        }
    }
}

fn required_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ClientError::Config(format!(
            "missing required environment variable {}",
            name
        ))),
    }
}

fn secs_var(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// Parses `menu_makanan=60,products=0` into a TTL table.
///
/// Malformed pairs are skipped. A zero TTL is kept; it disables caching for
/// that resource.
pub fn parse_resource_ttls(raw: &str) -> HashMap<String, Duration> {
    raw.split(',')
        .filter_map(|pair| {
            let (name, secs) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let secs: u64 = secs.trim().parse().ok()?;
            Some((name.to_string(), Duration::from_secs(secs)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::new("db.example.com", "tok", "pos").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let mut config = Config::new("db.example.com", "tok", "pos");
        config.cleanup_interval = Duration::ZERO;
        match config.validate() {
            Err(ClientError::Config(msg)) => assert!(msg.contains("CLEANUP_INTERVAL_SECS")),
            other => panic!("unexpected result: {other:?}"),
        }

        let mut config = Config::new("db.example.com", "tok", "pos");
        config.timeouts.request = Duration::ZERO;
        match config.validate() {
            Err(ClientError::Config(msg)) => assert!(msg.contains("REQUEST_TIMEOUT_SECS")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_allows_zero_cache_ttl() {
        let mut config = Config::new("db.example.com", "tok", "pos");
        config.default_ttl = Duration::ZERO;
        config.resource_ttls = parse_resource_ttls("products=0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::new("db.example.com", "tok", "pos");
        assert_eq!(config.timeouts.connect, Duration::from_secs(60));
        assert_eq!(config.timeouts.request, Duration::from_secs(120));
        assert_eq!(config.default_ttl, Duration::from_secs(30));
        assert!(config.resource_ttls.is_empty());
    }

    #[test]
    fn test_base_urls_default_to_https() {
        let config = Config::new("db.example.com", "tok", "pos");
        assert_eq!(
            config.rest_base_url(),
            "https://db.example.com/api/rest/v2/keyspaces/pos"
        );
        assert_eq!(
            config.data_api_url(),
            "https://db.example.com/api/json/v1/pos"
        );
    }

    #[test]
    fn test_base_urls_keep_explicit_scheme() {
        let config = Config::new("http://127.0.0.1:8080/", "tok", "pos");
        assert_eq!(
            config.rest_base_url(),
            "http://127.0.0.1:8080/api/rest/v2/keyspaces/pos"
        );
    }

    #[test]
    fn test_parse_resource_ttls() {
        let ttls = parse_resource_ttls("menu_makanan=60, products = 5,broken,=3,bad=x");
        assert_eq!(ttls.len(), 2);
        assert_eq!(ttls["menu_makanan"], Duration::from_secs(60));
        assert_eq!(ttls["products"], Duration::from_secs(5));
    }

    #[test]
    fn test_ttl_for_falls_back_to_default() {
        let mut config = Config::new("db.example.com", "tok", "pos");
        config.resource_ttls = parse_resource_ttls("menu_makanan=60");
        assert_eq!(config.ttl_for("menu_makanan"), Duration::from_secs(60));
        assert_eq!(config.ttl_for("order"), config.default_ttl);
    }

    #[test]
    fn test_config_from_env_missing_required() {
        env::remove_var("ASTRA_DB_TOKEN");
        env::remove_var("ASTRA_DB_ENDPOINT");
        env::remove_var("ASTRA_DB_KEYSPACE");

        let result = Config::from_env();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
