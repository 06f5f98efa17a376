//! Remote Client Module
//!
//! HTTP access to the store: a single-shot executor, the caching facade on
//! top of it, and the document API operations.
//!
//! # Layers
//! - [`QueryExecutor`] - one request, timeouts, status classification
//! - [`RemoteClient`] - cached reads, invalidating writes, row helpers
//! - document API methods on [`RemoteClient`] (`find`, `insert_one`,
//!   `find_one_and_update`)

mod documents;
pub mod executor;
mod facade;
pub mod http;

pub use executor::{build_http_client, QueryExecutor};
pub use facade::{resource_of, RemoteClient, NO_BODY};
pub use http::{HttpMethod, RawResponse};
