//! Common types for metric queries and upstream bucket payloads
//!
//! Everything here mirrors the wire formats exchanged with the host on one
//! side (query payloads) and the Carpool metrics API on the other (bucket
//! schemas). Field names stay camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status string the upstream API uses for successful invocations.
/// Anything else counts as a failure.
pub const SUCCESS_STATUS: &str = "success";

/// User-facing metric type
///
/// Closed enum: deserialization fails on anything outside this set, so an
/// unrecognized `queryType` is rejected before any routing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    /// Raw instruction invocation counts
    Invocations,
    /// Distinct signer counts per bucket
    UniqueSigners,
    /// Failed invocations only
    Failures,
    /// Running failure rate over time
    FailureRate,
    /// Program deployment events
    ProgramDeployments,
    /// Failed program deployment events
    FailedProgramDeployments,
    /// Invocations filtered to the top-N instructions by total count
    TopInstructions,
}

/// Which of the three upstream bucket schemas a fetch returns
///
/// This is the path segment sent to the metrics API; several metric types
/// share one shape (see [`UpstreamShape::for_metric`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamShape {
    Invocations,
    UniqueSigners,
    ProgramDeployments,
    FailedProgramDeployments,
}

impl UpstreamShape {
    /// Wire name used in the upstream URL path.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invocations => "invocations",
            Self::UniqueSigners => "uniqueSigners",
            Self::ProgramDeployments => "programDeployments",
            Self::FailedProgramDeployments => "failedProgramDeployments",
        }
    }
}

/// Parsed sub-query payload, nested under `payload` in the query JSON
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPayload {
    /// Requested metric type
    #[serde(rename = "queryType")]
    pub query_type: MetricType,

    /// Program to query metrics for
    #[serde(rename = "programId")]
    pub program_id: String,

    /// Optional instruction-name filter (empty = no filter)
    #[serde(rename = "instructionName", default)]
    pub instruction_name: String,

    /// Ranking size for the top-instructions metric; ignored otherwise
    #[serde(rename = "topN", default)]
    pub top_n: i64,
}

/// Envelope the host wraps around the payload
#[derive(Debug, Clone, Deserialize)]
pub struct QueryModel {
    pub payload: QueryPayload,
}

/// One sub-query of a batch, as handed over by the host
///
/// `json` is the raw payload document; it is parsed into a [`QueryModel`]
/// per sub-query so one malformed payload cannot fail its siblings.
#[derive(Debug, Clone)]
pub struct MetricQuery {
    /// Identifier the result is keyed by (the host's RefID)
    pub ref_id: String,
    /// Start of the queried time range
    pub from: DateTime<Utc>,
    /// End of the queried time range
    pub to: DateTime<Utc>,
    /// Requested bucket width in seconds
    pub interval_seconds: i64,
    /// Raw query JSON containing the payload envelope
    pub json: serde_json::Value,
}

/// One time-windowed invocation aggregate, keyed by (time, instruction, status)
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationBucket {
    pub time: DateTime<Utc>,
    pub count: i64,
    pub status: String,
    #[serde(rename = "instructionName")]
    pub instruction_name: String,
}

/// One time-windowed distinct-signer aggregate
#[derive(Debug, Clone, Deserialize)]
pub struct SignerBucket {
    pub time: DateTime<Utc>,
    pub count: i64,
}

/// One program deployment event aggregate
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramEventBucket {
    pub time: DateTime<Utc>,
    pub count: i64,
    pub authority: String,
    pub status: String,
    pub action: String,
}

/// Columnar form of decoded invocation buckets
///
/// Invariant: all four columns are the same length, one entry per bucket,
/// in upstream order.
#[derive(Debug, Clone, Default)]
pub struct InvocationSeries {
    pub times: Vec<DateTime<Utc>>,
    pub counts: Vec<i64>,
    pub statuses: Vec<String>,
    pub instruction_names: Vec<String>,
}

impl InvocationSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            times: Vec::with_capacity(n),
            counts: Vec::with_capacity(n),
            statuses: Vec::with_capacity(n),
            instruction_names: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, bucket: InvocationBucket) {
        self.times.push(bucket.time);
        self.counts.push(bucket.count);
        self.statuses.push(bucket.status);
        self.instruction_names.push(bucket.instruction_name);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Columnar form of decoded signer buckets
#[derive(Debug, Clone, Default)]
pub struct SignerSeries {
    pub times: Vec<DateTime<Utc>>,
    pub counts: Vec<i64>,
}

impl SignerSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            times: Vec::with_capacity(n),
            counts: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, bucket: SignerBucket) {
        self.times.push(bucket.time);
        self.counts.push(bucket.count);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Columnar form of decoded program event buckets
#[derive(Debug, Clone, Default)]
pub struct ProgramEventSeries {
    pub times: Vec<DateTime<Utc>>,
    pub counts: Vec<i64>,
    pub authorities: Vec<String>,
    pub statuses: Vec<String>,
    pub actions: Vec<String>,
}

impl ProgramEventSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            times: Vec::with_capacity(n),
            counts: Vec::with_capacity(n),
            authorities: Vec::with_capacity(n),
            statuses: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, bucket: ProgramEventBucket) {
        self.times.push(bucket.time);
        self.counts.push(bucket.count);
        self.authorities.push(bucket.authority);
        self.statuses.push(bucket.status);
        self.actions.push(bucket.action);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
