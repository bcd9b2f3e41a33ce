//! Error types for the query pipeline
//!
//! Every variant is terminal for a single sub-query and is surfaced to the
//! host as a bad-request-class result. Nothing here aborts sibling
//! sub-queries or the process.

use thiserror::Error;

/// Error produced while handling one sub-query
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The sub-query payload could not be parsed into the expected fields,
    /// including an unrecognized `queryType` value
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Datasource instance settings could not be parsed
    #[error("invalid datasource settings: {0}")]
    Settings(String),

    /// The upstream fetch could not complete (timeout, connection, DNS)
    #[error("upstream error: {0}")]
    UpstreamTransport(String),

    /// The upstream fetch completed with a non-200 status
    #[error("upstream error: status {0}")]
    UpstreamStatus(u16),

    /// The upstream body was not valid JSON or did not match the expected
    /// bucket schema
    #[error("json decode: {0}")]
    Decode(String),
}
