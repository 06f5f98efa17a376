//! Cached Query Facade
//!
//! The single entry point entity handlers use for reads and writes. GET reads
//! may go through the TTL cache; everything else goes straight upstream.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::de::IgnoredAny;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::client::executor::{
    build_http_client, QueryExecutor, DATA_API_TOKEN_HEADER, REST_TOKEN_HEADER,
};
use crate::client::http::HttpMethod;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::normalize::{extract_rows, extract_single, CanonicalRow};

/// Pass as the `body` argument of a request that carries none.
pub const NO_BODY: Option<&()> = None;

/// Caching client for the store's row API and Data API.
///
/// Construct one per process and hand it to collaborators; all methods take
/// `&self` and may be called from any number of tasks at once.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    rows: QueryExecutor,
    pub(crate) documents: QueryExecutor,
    cache: Arc<CacheStore>,
    config: Arc<Config>,
}

impl RemoteClient {
    // == Constructor ==
    /// Builds the HTTP client and both executors from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let http = build_http_client(&config.timeouts)?;
        let header_deadline = config.timeouts.header_deadline();

        let rows = QueryExecutor::new(
            http.clone(),
            config.rest_base_url(),
            REST_TOKEN_HEADER,
            config.token.clone(),
            header_deadline,
        );
        let documents = QueryExecutor::new(
            http,
            config.data_api_url(),
            DATA_API_TOKEN_HEADER,
            config.token.clone(),
            header_deadline,
        );

        Ok(Self {
            rows,
            documents,
            cache: Arc::new(CacheStore::new()),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the cache, e.g. for the reclamation task.
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    // == Query ==
    /// Executes the request upstream without reading or writing the cache.
    pub async fn query<B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        let response = self.rows.execute(method, path, body).await?;
        Ok(response.body)
    }

    // == Cached Query ==
    /// Like [`query`](Self::query), but a GET with a non-zero `ttl` is served
    /// from the cache when possible.
    ///
    /// On a miss the upstream body is stored under the literal `path` only if
    /// the call succeeded and the body is valid JSON; an undecodable body is
    /// reported as `Decode` and left uncached.
    pub async fn cached_query<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        ttl: Duration,
    ) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        if method != HttpMethod::Get || ttl.is_zero() {
            return self.query(method, path, body).await;
        }

        if let Some(cached) = self.cache.get(path) {
            debug!(path, "cache hit");
            return Ok(cached);
        }

        // No lock is held across this call
        let payload = self.query(method, path, body).await?;

        serde_json::from_slice::<IgnoredAny>(&payload)
            .map_err(|e| ClientError::Decode(format!("GET {}: {}", path, e)))?;

        self.cache.put(path, payload.clone(), ttl)?;
        debug!(path, ttl_ms = ttl.as_millis() as u64, "cached upstream response");
        Ok(payload)
    }

    // == Write ==
    /// Executes a write and, once it succeeded, drops every cached view of the
    /// touched resource: the exact path and all keys under its first segment.
    pub async fn write<B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        let payload = self.query(method, path, body).await?;
        self.cache.invalidate(path);
        self.invalidate_resource(resource_of(path));
        Ok(payload)
    }

    // == Invalidation ==
    /// Drops the cached response for exactly `path`.
    pub fn invalidate(&self, path: &str) {
        self.cache.invalidate(path);
    }

    /// Drops every cached response under `/{resource}`.
    pub fn invalidate_resource(&self, resource: &str) -> usize {
        let resource = resource.trim_matches('/');
        if resource.is_empty() {
            return 0;
        }
        self.cache.invalidate_prefix(&format!("/{}", resource))
    }

    /// Drops the whole cache.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Configured read TTL for `resource`.
    pub fn ttl_for(&self, resource: &str) -> Duration {
        self.config.ttl_for(resource)
    }

    // == Row Helpers ==
    /// Cached GET of `path`, decoded and normalized into rows.
    pub async fn fetch_rows(&self, path: &str, ttl: Duration) -> Result<Vec<CanonicalRow>> {
        let body = self.fetch_json(path, ttl).await?;
        Ok(extract_rows(&body))
    }

    /// Cached GET of `path`, decoded and normalized into a single row.
    pub async fn fetch_one(&self, path: &str, ttl: Duration) -> Result<Option<CanonicalRow>> {
        let body = self.fetch_json(path, ttl).await?;
        Ok(extract_single(&body))
    }

    async fn fetch_json(&self, path: &str, ttl: Duration) -> Result<Value> {
        let payload = self.cached_query(HttpMethod::Get, path, NO_BODY, ttl).await?;
        decode(&payload, path)
    }
}

pub(crate) fn decode(payload: &[u8], context: &str) -> Result<Value> {
    serde_json::from_slice(payload).map_err(|e| ClientError::Decode(format!("{}: {}", context, e)))
}

/// First path segment: `/menu_makanan/rows?x=1` -> `menu_makanan`.
pub fn resource_of(path: &str) -> &str {
    path.trim_start_matches('/')
        .split(['/', '?'])
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_of() {
        assert_eq!(resource_of("/menu_makanan/rows"), "menu_makanan");
        assert_eq!(resource_of("/products/42"), "products");
        assert_eq!(resource_of("/order?where=x"), "order");
        assert_eq!(resource_of("menu"), "menu");
        assert_eq!(resource_of("/"), "");
    }

    #[test]
    fn test_decode_error_carries_context() {
        let err = decode(b"<html>", "GET /menu/rows").unwrap_err();
        match err {
            ClientError::Decode(msg) => assert!(msg.contains("/menu/rows")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalidate_resource_ignores_empty_name() {
        let client = RemoteClient::new(Config::new("http://127.0.0.1:9", "t", "ks")).unwrap();
        client
            .cache()
            .put("/menu/rows", Bytes::from_static(b"[]"), Duration::from_secs(60))
            .unwrap();

        assert_eq!(client.invalidate_resource("/"), 0);
        assert_eq!(client.invalidate_resource("menu"), 1);
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_ttl_for_uses_config() {
        let mut config = Config::new("http://127.0.0.1:9", "t", "ks");
        config.resource_ttls.insert("menu_makanan".to_string(), Duration::from_secs(5));
        let client = RemoteClient::new(config).unwrap();

        assert_eq!(client.ttl_for("menu_makanan"), Duration::from_secs(5));
        assert_eq!(client.ttl_for("order"), Duration::from_secs(30));
    }
}
