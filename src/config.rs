//! Datasource instance settings
//!
//! The host stores these as JSON alongside the datasource instance and hands
//! them over on construction. The bearer credential is decrypted by the host
//! and arrives separately, never through this struct.

use serde::{Deserialize, Serialize};

use crate::errors::QueryError;

fn default_host() -> String {
    "https://api.carpool.dev".to_string()
}

fn default_max_buckets() -> i64 {
    256
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_connect_timeout_ms() -> u64 {
    15_000
}

/// Per-instance datasource configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasourceSettings {
    /// Upstream metrics API host
    #[serde(default = "default_host")]
    pub url: String,

    /// Cardinality ceiling for one query's bucket count
    #[serde(rename = "maxBuckets", default = "default_max_buckets")]
    pub max_buckets: i64,

    /// Total request timeout in milliseconds
    #[serde(rename = "timeoutMs", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connection establishment timeout in milliseconds
    #[serde(rename = "connectTimeoutMs", default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for DatasourceSettings {
    fn default() -> Self {
        Self {
            url: default_host(),
            max_buckets: default_max_buckets(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl DatasourceSettings {
    /// Parse settings from the host's instance JSON.
    pub fn from_json(raw: &[u8]) -> Result<Self, QueryError> {
        serde_json::from_slice(raw).map_err(|e| QueryError::Settings(e.to_string()))
    }
}
