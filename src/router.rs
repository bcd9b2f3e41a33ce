//! Metric routing and upstream URL construction
//!
//! Several user-facing metric types are derived from the same upstream
//! fetch: failures, failure rate and top instructions are all computed from
//! raw invocation buckets. The router maps a metric type to the shape that
//! must actually be requested and builds the GET URL for it.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{MetricType, UpstreamShape};

impl UpstreamShape {
    /// Upstream shape fetched for a metric type. Total over the closed
    /// enum; unrecognized types never reach this point because payload
    /// parsing rejects them.
    pub fn for_metric(metric: MetricType) -> Self {
        match metric {
            MetricType::Invocations
            | MetricType::Failures
            | MetricType::FailureRate
            | MetricType::TopInstructions => Self::Invocations,
            MetricType::UniqueSigners => Self::UniqueSigners,
            MetricType::ProgramDeployments => Self::ProgramDeployments,
            MetricType::FailedProgramDeployments => Self::FailedProgramDeployments,
        }
    }
}

/// Build the upstream query URL for one fetch.
///
/// The instruction-name filter is appended only when non-empty. Timestamps
/// are RFC 3339 in UTC.
pub fn metrics_url(
    host: &str,
    shape: UpstreamShape,
    program_id: &str,
    instruction_name: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    bucket_seconds: i64,
) -> String {
    let mut url = format!(
        "{}/query/solana/instructions/{}/{}?start={}&end={}&bucketSeconds={}",
        host.trim_end_matches('/'),
        program_id,
        shape.as_str(),
        from.to_rfc3339_opts(SecondsFormat::Secs, true),
        to.to_rfc3339_opts(SecondsFormat::Secs, true),
        bucket_seconds,
    );
    if !instruction_name.is_empty() {
        url.push_str("&instructionName=");
        url.push_str(instruction_name);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn derived_metrics_route_to_invocations() {
        for metric in [
            MetricType::Invocations,
            MetricType::Failures,
            MetricType::FailureRate,
            MetricType::TopInstructions,
        ] {
            assert_eq!(
                UpstreamShape::for_metric(metric),
                UpstreamShape::Invocations
            );
        }
    }

    #[test]
    fn direct_metrics_route_to_their_own_shape() {
        assert_eq!(
            UpstreamShape::for_metric(MetricType::UniqueSigners),
            UpstreamShape::UniqueSigners
        );
        assert_eq!(
            UpstreamShape::for_metric(MetricType::ProgramDeployments),
            UpstreamShape::ProgramDeployments
        );
        assert_eq!(
            UpstreamShape::for_metric(MetricType::FailedProgramDeployments),
            UpstreamShape::FailedProgramDeployments
        );
    }

    #[test]
    fn url_without_instruction_filter() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        let url = metrics_url(
            "https://api.carpool.dev",
            UpstreamShape::Invocations,
            "prog111",
            "",
            from,
            to,
            15,
        );
        assert_eq!(
            url,
            "https://api.carpool.dev/query/solana/instructions/prog111/invocations\
             ?start=2024-01-01T00:00:00Z&end=2024-01-01T01:00:00Z&bucketSeconds=15"
        );
    }

    #[test]
    fn url_with_instruction_filter() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        let url = metrics_url(
            "https://api.carpool.dev/",
            UpstreamShape::UniqueSigners,
            "prog111",
            "transfer",
            from,
            to,
            60,
        );
        assert!(url.contains("/prog111/uniqueSigners?"));
        assert!(url.ends_with("&instructionName=transfer"));
        // Trailing slash on the host must not double up.
        assert!(!url.contains(".dev//"));
    }
}
