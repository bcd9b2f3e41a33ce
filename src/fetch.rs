//! Upstream fetch seam
//!
//! The pipeline depends on an abstract fetch capability, not on a concrete
//! HTTP client. [`HttpFetcher`] is the production implementation on top of
//! a shared reqwest client; tests substitute their own [`Fetch`] or point
//! the real one at a mock server.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::errors::QueryError;

/// Abstract fetch capability used by the query pipeline.
///
/// One call per sub-query, no retries. Dropping the returned future aborts
/// the request, so caller-side cancellation cannot leave work running.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Issue a GET for `url` and return the raw response body.
    async fn fetch(&self, url: &str) -> Result<Bytes, QueryError>;
}

/// Bearer-authenticated HTTP fetcher backed by a pooled reqwest client
pub struct HttpFetcher {
    client: reqwest::Client,
    api_key: String,
}

impl HttpFetcher {
    /// Build a fetcher with bounded connect and total-request timeouts.
    pub fn new(
        api_key: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| QueryError::UpstreamTransport(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, QueryError> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| QueryError::UpstreamTransport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() != 200 {
            tracing::warn!(status = status.as_u16(), %url, "upstream returned non-200");
            return Err(QueryError::UpstreamStatus(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| QueryError::UpstreamTransport(e.to_string()))
    }
}
