//! Bucket payload decoding
//!
//! The upstream API returns `{ "buckets": [...] }` with an element shape
//! that depends on the path segment fetched. Each decoder parses one shape
//! and transposes the row-oriented list into columnar arrays, preserving
//! upstream order. Schema mismatches surface as [`QueryError::Decode`] and
//! are reported to the user, never swallowed.

use serde::Deserialize;

use crate::errors::QueryError;
use crate::types::{
    InvocationBucket, InvocationSeries, ProgramEventBucket, ProgramEventSeries, SignerBucket,
    SignerSeries,
};

#[derive(Debug, Deserialize)]
struct InvocationsBody {
    buckets: Vec<InvocationBucket>,
}

#[derive(Debug, Deserialize)]
struct SignersBody {
    buckets: Vec<SignerBucket>,
}

#[derive(Debug, Deserialize)]
struct ProgramEventsBody {
    buckets: Vec<ProgramEventBucket>,
}

/// Decode an invocation-shaped body into columns.
pub fn decode_invocations(body: &[u8]) -> Result<InvocationSeries, QueryError> {
    let parsed: InvocationsBody =
        serde_json::from_slice(body).map_err(|e| QueryError::Decode(e.to_string()))?;
    let mut series = InvocationSeries::with_capacity(parsed.buckets.len());
    for bucket in parsed.buckets {
        series.push(bucket);
    }
    Ok(series)
}

/// Decode a signer-count-shaped body into columns.
pub fn decode_signers(body: &[u8]) -> Result<SignerSeries, QueryError> {
    let parsed: SignersBody =
        serde_json::from_slice(body).map_err(|e| QueryError::Decode(e.to_string()))?;
    let mut series = SignerSeries::with_capacity(parsed.buckets.len());
    for bucket in parsed.buckets {
        series.push(bucket);
    }
    Ok(series)
}

/// Decode a program-event-shaped body into columns.
pub fn decode_program_events(body: &[u8]) -> Result<ProgramEventSeries, QueryError> {
    let parsed: ProgramEventsBody =
        serde_json::from_slice(body).map_err(|e| QueryError::Decode(e.to_string()))?;
    let mut series = ProgramEventSeries::with_capacity(parsed.buckets.len());
    for bucket in parsed.buckets {
        series.push(bucket);
    }
    Ok(series)
}
