//! Query Executor
//!
//! Sends exactly one HTTP request per call and classifies the outcome. No
//! retries and no caching happen here.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::http::{HttpMethod, RawResponse};
use crate::config::Timeouts;
use crate::error::{ClientError, Result};

/// Auth header of the row-oriented REST API.
pub const REST_TOKEN_HEADER: &str = "X-Cassandra-Token";
/// Auth header of the document-oriented Data API.
pub const DATA_API_TOKEN_HEADER: &str = "Token";

const JSON: &str = "application/json";

/// Builds the pooled HTTP client shared by every executor of one client.
///
/// reqwest's connect timeout covers the TCP connect and the TLS handshake
/// together, so it is set to the sum of both budgets. The response-header
/// budget is enforced per call by [`QueryExecutor::execute`], on top of the
/// connection budget (see [`Timeouts::header_deadline`]).
pub fn build_http_client(timeouts: &Timeouts) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(timeouts.connect + timeouts.tls_handshake)
        .timeout(timeouts.request)
        .pool_idle_timeout(timeouts.idle)
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Duration::from_secs(30))
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .build()
        .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))
}

/// Executes requests against one base URL with one auth header.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    http: reqwest::Client,
    base_url: String,
    token_header: &'static str,
    token: String,
    header_deadline: Duration,
}

impl QueryExecutor {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token_header: &'static str,
        token: impl Into<String>,
        header_deadline: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_header,
            token: token.into(),
            header_deadline,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == Execute ==
    /// Sends `method path` with an optional JSON body.
    ///
    /// Returns the body verbatim for any status below 400.
    ///
    /// # Errors
    /// - `Serialization` if `body` cannot be encoded
    /// - `Transport` on connect/TLS failure or when a deadline passes
    /// - `Remote` with status and body for status >= 400
    pub async fn execute<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .http
            .request(method.into(), &url)
            .header(self.token_header, &self.token)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON);

        if let Some(body) = body {
            let encoded =
                serde_json::to_vec(body).map_err(|e| ClientError::Serialization(e.to_string()))?;
            request = request.body(encoded);
        }

        let started = Instant::now();

        // `send` resolves once the status line and headers are in. Connection
        // setup is bounded separately by the client's connect timeout.
        let response = tokio::time::timeout(self.header_deadline, request.send())
            .await
            .map_err(|_| {
                ClientError::Transport(format!(
                    "{} {}: no response headers within {:?}",
                    method, url, self.header_deadline
                ))
            })?
            .map_err(|e| ClientError::Transport(format!("{} {}: {}", method, url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("{} {}: {}", method, url, e)))?;

        let elapsed_ms = started.elapsed().as_millis() as u64;

        if status >= 400 {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(%method, url = %url, status, elapsed_ms, "upstream request failed");
            return Err(ClientError::Remote { status, body });
        }

        debug!(%method, url = %url, status, elapsed_ms, bytes = body.len(), "upstream request completed");
        Ok(RawResponse { status, body })
    }
}
