//! Carpool datasource - Solana program metrics query engine
//!
//! Backend half of a metrics datasource: takes time-ranged metric queries,
//! fetches bucketed data from the Carpool API, and derives columnar
//! time-series results.
//!
//! ## Pipeline
//!
//! - **Routing**: map the requested metric type to the upstream bucket
//!   shape actually fetched ([`router`])
//! - **Bucket resolution**: clamp the requested bucket width against the
//!   instance's cardinality ceiling ([`buckets`])
//! - **Fetch**: bearer-authenticated GET with bounded timeouts ([`fetch`])
//! - **Decode**: JSON bucket payloads into columnar series ([`decode`])
//! - **Transform**: per-metric derivation, including the online top-N
//!   instruction ranking ([`transform`], [`topn`])

pub mod buckets;
pub mod config;
pub mod datasource;
pub mod decode;
pub mod errors;
pub mod fetch;
pub mod frame;
pub mod router;
pub mod telemetry;
pub mod topn;
pub mod transform;
pub mod types;

pub use config::DatasourceSettings;
pub use datasource::{Datasource, HealthStatus, QueryResponse};
pub use errors::QueryError;
pub use frame::{Column, Field, Frame};
pub use types::{MetricQuery, MetricType, UpstreamShape};
