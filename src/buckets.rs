//! Bucket width resolution
//!
//! The upstream API aggregates into buckets of the width we ask for. A
//! dashboard zoomed out over months with a fine interval would request tens
//! of thousands of buckets, so the requested width is clamped against the
//! instance's cardinality ceiling before the URL is built.

use chrono::{DateTime, Utc};

/// Target bucket count used when the requested width is too fine.
const FALLBACK_BUCKETS: i64 = 256;

/// Number of buckets a width would produce over a range, clamped to at
/// least one. A non-positive range also yields one bucket rather than a
/// zero or negative count.
pub fn bucket_count(from: DateTime<Utc>, to: DateTime<Utc>, bucket_seconds: i64) -> i64 {
    let width = bucket_seconds.max(1);
    ((to - from).num_seconds() / width).max(1)
}

/// Resolve the bucket width for a query.
///
/// Returns the requested width unchanged when it respects `max_buckets`;
/// otherwise falls back to a width producing roughly [`FALLBACK_BUCKETS`]
/// buckets over the range. The result is always at least one second.
pub fn resolve_bucket_seconds(
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    requested_seconds: i64,
    max_buckets: i64,
) -> i64 {
    let requested = requested_seconds.max(1);
    if bucket_count(from, to, requested) > max_buckets {
        ((to - from).num_seconds().max(0) / FALLBACK_BUCKETS) + 1
    } else {
        requested
    }
}
