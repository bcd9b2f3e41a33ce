//! Datasource: the per-request query pipeline
//!
//! One [`Datasource`] is built per configured instance and serves batches
//! of sub-queries. Each sub-query runs the same sequential pipeline:
//! resolve the bucket width, build the upstream URL, fetch, decode,
//! transform. Sub-queries are independent; a failure in one becomes a
//! bad-request result under its own identifier and never touches siblings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::buckets::resolve_bucket_seconds;
use crate::config::DatasourceSettings;
use crate::decode::{decode_invocations, decode_program_events, decode_signers};
use crate::errors::QueryError;
use crate::fetch::{Fetch, HttpFetcher};
use crate::frame::Frame;
use crate::router::metrics_url;
use crate::transform;
use crate::types::{MetricQuery, MetricType, QueryModel, UpstreamShape};

/// Result of one sub-query, keyed by its ref id in the batch response
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    /// Columnar result ready for presentation
    Frame(Frame),
    /// Bad-request-class failure with a user-facing message
    BadRequest(String),
}

impl From<QueryError> for QueryResponse {
    fn from(err: QueryError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Health of the datasource instance, surfaced by the host's test button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub ok: bool,
    pub message: String,
}

/// Query engine for one configured datasource instance
pub struct Datasource {
    fetcher: Arc<dyn Fetch>,
    host: String,
    max_buckets: i64,
}

impl Datasource {
    /// Build a datasource from instance settings and the decrypted bearer
    /// credential.
    pub fn new(settings: DatasourceSettings, api_key: &str) -> Result<Self, QueryError> {
        info!(host = %settings.url, max_buckets = settings.max_buckets, "creating datasource");
        let fetcher = HttpFetcher::new(
            api_key,
            Duration::from_millis(settings.timeout_ms),
            Duration::from_millis(settings.connect_timeout_ms),
        )?;
        Ok(Self::with_fetcher(settings, Arc::new(fetcher)))
    }

    /// Build a datasource around an existing fetch implementation.
    pub fn with_fetcher(settings: DatasourceSettings, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            host: settings.url,
            max_buckets: settings.max_buckets,
        }
    }

    /// Run a batch of sub-queries, keying each result by its ref id.
    ///
    /// Failures are per-sub-query: one bad payload or upstream error turns
    /// into a [`QueryResponse::BadRequest`] for that id only.
    pub async fn query_data(&self, queries: Vec<MetricQuery>) -> HashMap<String, QueryResponse> {
        let mut responses = HashMap::with_capacity(queries.len());
        for query in queries {
            let ref_id = query.ref_id.clone();
            let response = match self.run_query(&query).await {
                Ok(frame) => QueryResponse::Frame(frame),
                Err(err) => {
                    warn!(ref_id = %ref_id, error = %err, "sub-query failed");
                    QueryResponse::from(err)
                }
            };
            responses.insert(ref_id, response);
        }
        responses
    }

    async fn run_query(&self, query: &MetricQuery) -> Result<Frame, QueryError> {
        let model: QueryModel = serde_json::from_value(query.json.clone())
            .map_err(|e| QueryError::MalformedRequest(e.to_string()))?;
        let payload = model.payload;

        let bucket_seconds = resolve_bucket_seconds(
            query.from,
            query.to,
            query.interval_seconds,
            self.max_buckets,
        );
        let shape = UpstreamShape::for_metric(payload.query_type);
        let url = metrics_url(
            &self.host,
            shape,
            &payload.program_id,
            &payload.instruction_name,
            query.from,
            query.to,
            bucket_seconds,
        );
        debug!(ref_id = %query.ref_id, %url, "fetching upstream buckets");

        let body = self.fetcher.fetch(&url).await?;

        let frame = match payload.query_type {
            MetricType::Invocations => transform::invocations_frame(decode_invocations(&body)?),
            MetricType::TopInstructions => {
                transform::top_instructions_frame(decode_invocations(&body)?, payload.top_n)
            }
            MetricType::UniqueSigners => transform::signers_frame(decode_signers(&body)?),
            MetricType::Failures => transform::failures_frame(decode_invocations(&body)?),
            MetricType::FailureRate => transform::failure_rate_frame(decode_invocations(&body)?),
            MetricType::ProgramDeployments | MetricType::FailedProgramDeployments => {
                transform::program_events_frame(decode_program_events(&body)?)
            }
        };
        debug_assert!(frame.is_consistent());
        Ok(frame)
    }

    /// Health probe for the host's configuration test button.
    pub fn check_health(&self) -> HealthStatus {
        HealthStatus {
            ok: true,
            message: "Data source is working".to_string(),
        }
    }
}
