//! Per-metric series derivation
//!
//! Each function takes a decoded columnar series and produces the final
//! output frame for one metric type. Row order is always the upstream
//! order; nothing here re-sorts.

use chrono::{DateTime, Utc};

use crate::frame::{Column, Frame};
use crate::topn::select_top_n;
use crate::types::{InvocationSeries, ProgramEventSeries, SignerSeries, SUCCESS_STATUS};

/// Raw invocations: all four columns pass through unchanged.
pub fn invocations_frame(series: InvocationSeries) -> Frame {
    Frame::long()
        .push("time", Column::Time(series.times))
        .push("count", Column::Int(series.counts))
        .push("status", Column::Str(series.statuses))
        .push("instructionName", Column::Str(series.instruction_names))
}

/// Invocations filtered to the instructions with the `n` largest totals.
///
/// Runs the top-N selector over the whole series first, then keeps only
/// rows whose instruction made the cut, preserving order.
pub fn top_instructions_frame(series: InvocationSeries, n: i64) -> Frame {
    let top = select_top_n(
        series
            .instruction_names
            .iter()
            .map(String::as_str)
            .zip(series.counts.iter().copied()),
        n,
    );

    let mut out = InvocationSeries::default();
    for i in 0..series.len() {
        if top.contains(&series.instruction_names[i]) {
            out.times.push(series.times[i]);
            out.counts.push(series.counts[i]);
            out.statuses.push(series.statuses[i].clone());
            out.instruction_names.push(series.instruction_names[i].clone());
        }
    }
    invocations_frame(out)
}

/// Unique signers: (time, count) pass-through.
pub fn signers_frame(series: SignerSeries) -> Frame {
    Frame::long()
        .push("time", Column::Time(series.times))
        .push("count", Column::Int(series.counts))
}

/// Failed invocations only: rows whose status is not the success marker,
/// in original order.
pub fn failures_frame(series: InvocationSeries) -> Frame {
    let mut times = Vec::new();
    let mut counts = Vec::new();
    let mut instruction_names = Vec::new();
    for i in 0..series.len() {
        if series.statuses[i] != SUCCESS_STATUS {
            times.push(series.times[i]);
            counts.push(series.counts[i]);
            instruction_names.push(series.instruction_names[i].clone());
        }
    }
    Frame::long()
        .push("time", Column::Time(times))
        .push("count", Column::Int(counts))
        .push("instructionName", Column::Str(instruction_names))
}

/// Running failure rate: one output row per distinct timestamp, carrying
/// the cumulative failed fraction of all invocations up to and including
/// that timestamp.
///
/// Rows sharing a timestamp are folded into the same boundary; the first
/// and last timestamps both emit (the last via the flush after the loop).
pub fn failure_rate_frame(series: InvocationSeries) -> Frame {
    let mut times: Vec<DateTime<Utc>> = Vec::new();
    let mut rates: Vec<f64> = Vec::new();

    let mut failures: i64 = 0;
    let mut total: i64 = 0;
    let mut current: Option<DateTime<Utc>> = None;

    for i in 0..series.len() {
        let t = series.times[i];
        if let Some(prev) = current {
            if t != prev {
                times.push(prev);
                rates.push(ratio(failures, total));
            }
        }
        current = Some(t);
        total += series.counts[i];
        if series.statuses[i] != SUCCESS_STATUS {
            failures += series.counts[i];
        }
    }
    if let Some(last) = current {
        times.push(last);
        rates.push(ratio(failures, total));
    }

    Frame::long()
        .push("time", Column::Time(times))
        .push("rate", Column::Float(rates))
}

fn ratio(failures: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        failures as f64 / total as f64
    }
}

/// Program deployment events: all five columns pass through, each carrying
/// its own field.
pub fn program_events_frame(series: ProgramEventSeries) -> Frame {
    Frame::long()
        .push("time", Column::Time(series.times))
        .push("count", Column::Int(series.counts))
        .push("authority", Column::Str(series.authorities))
        .push("status", Column::Str(series.statuses))
        .push("action", Column::Str(series.actions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InvocationBucket, ProgramEventBucket, SignerBucket};
    use chrono::TimeZone;

    fn at(min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, min, 0).unwrap()
    }

    fn invocation(min: u32, count: i64, status: &str, name: &str) -> InvocationBucket {
        InvocationBucket {
            time: at(min),
            count,
            status: status.to_string(),
            instruction_name: name.to_string(),
        }
    }

    fn series_of(buckets: Vec<InvocationBucket>) -> InvocationSeries {
        let mut series = InvocationSeries::with_capacity(buckets.len());
        for b in buckets {
            series.push(b);
        }
        series
    }

    #[test]
    fn invocations_pass_through_all_columns() {
        let frame = invocations_frame(series_of(vec![
            invocation(0, 5, "success", "transfer"),
            invocation(1, 2, "error", "mint"),
        ]));
        assert!(frame.is_consistent());
        assert_eq!(frame.rows(), 2);
        assert_eq!(frame.field("count"), Some(&Column::Int(vec![5, 2])));
        assert_eq!(
            frame.field("instructionName"),
            Some(&Column::Str(vec!["transfer".into(), "mint".into()]))
        );
    }

    #[test]
    fn top_instructions_keeps_only_the_winners_in_order() {
        let frame = top_instructions_frame(
            series_of(vec![
                invocation(0, 5, "success", "transfer"),
                invocation(0, 3, "success", "mint"),
                invocation(1, 7, "error", "transfer"),
            ]),
            1,
        );
        assert!(frame.is_consistent());
        assert_eq!(frame.rows(), 2);
        assert_eq!(frame.field("count"), Some(&Column::Int(vec![5, 7])));
        assert_eq!(
            frame.field("instructionName"),
            Some(&Column::Str(vec!["transfer".into(), "transfer".into()]))
        );
    }

    #[test]
    fn top_zero_filters_everything_out() {
        let frame = top_instructions_frame(
            series_of(vec![invocation(0, 5, "success", "transfer")]),
            0,
        );
        assert_eq!(frame.rows(), 0);
        assert!(frame.is_consistent());
    }

    #[test]
    fn failures_keep_error_rows_in_original_order() {
        let frame = failures_frame(series_of(vec![
            invocation(0, 1, "success", "transfer"),
            invocation(1, 2, "error", "mint"),
            invocation(2, 3, "error", "burn"),
        ]));
        assert!(frame.is_consistent());
        assert_eq!(frame.rows(), 2);
        assert_eq!(frame.field("count"), Some(&Column::Int(vec![2, 3])));
        assert_eq!(
            frame.field("instructionName"),
            Some(&Column::Str(vec!["mint".into(), "burn".into()]))
        );
    }

    #[test]
    fn failure_rate_single_bucket_emits_one_row() {
        let frame = failure_rate_frame(series_of(vec![invocation(0, 4, "error", "transfer")]));
        assert_eq!(frame.rows(), 1);
        assert_eq!(frame.field("rate"), Some(&Column::Float(vec![1.0])));
    }

    #[test]
    fn failure_rate_is_cumulative_per_timestamp() {
        // t0: 3 success + 1 error  -> 1/4
        // t1: 2 error              -> 3/6
        // t2: 2 success            -> 3/8
        let frame = failure_rate_frame(series_of(vec![
            invocation(0, 3, "success", "transfer"),
            invocation(0, 1, "error", "transfer"),
            invocation(1, 2, "error", "mint"),
            invocation(2, 2, "success", "transfer"),
        ]));
        assert!(frame.is_consistent());
        assert_eq!(
            frame.field("time"),
            Some(&Column::Time(vec![at(0), at(1), at(2)]))
        );
        assert_eq!(
            frame.field("rate"),
            Some(&Column::Float(vec![0.25, 0.5, 0.375]))
        );
    }

    #[test]
    fn failure_rate_last_bucket_is_not_dropped() {
        let frame = failure_rate_frame(series_of(vec![
            invocation(0, 1, "success", "a"),
            invocation(1, 1, "error", "a"),
        ]));
        // Both timestamps present: the final flush must cover the last bucket.
        assert_eq!(
            frame.field("time"),
            Some(&Column::Time(vec![at(0), at(1)]))
        );
        assert_eq!(frame.field("rate"), Some(&Column::Float(vec![0.0, 0.5])));
    }

    #[test]
    fn failure_rate_empty_series_is_empty() {
        let frame = failure_rate_frame(InvocationSeries::default());
        assert_eq!(frame.rows(), 0);
        assert!(frame.is_consistent());
    }

    #[test]
    fn failure_rate_zero_counts_do_not_divide_by_zero() {
        let frame = failure_rate_frame(series_of(vec![invocation(0, 0, "success", "a")]));
        assert_eq!(frame.field("rate"), Some(&Column::Float(vec![0.0])));
    }

    #[test]
    fn signer_series_passes_through() {
        let mut series = SignerSeries::with_capacity(2);
        series.push(SignerBucket { time: at(0), count: 12 });
        series.push(SignerBucket { time: at(1), count: 9 });
        let frame = signers_frame(series);
        assert!(frame.is_consistent());
        assert_eq!(frame.field("count"), Some(&Column::Int(vec![12, 9])));
    }

    #[test]
    fn program_events_carry_their_own_fields() {
        let mut series = ProgramEventSeries::with_capacity(1);
        series.push(ProgramEventBucket {
            time: at(0),
            count: 1,
            authority: "auth111".to_string(),
            status: "failed".to_string(),
            action: "upgrade".to_string(),
        });
        let frame = program_events_frame(series);
        assert!(frame.is_consistent());
        // authority and status must not alias each other.
        assert_eq!(
            frame.field("authority"),
            Some(&Column::Str(vec!["auth111".into()]))
        );
        assert_eq!(
            frame.field("status"),
            Some(&Column::Str(vec!["failed".into()]))
        );
        assert_eq!(
            frame.field("action"),
            Some(&Column::Str(vec!["upgrade".into()]))
        );
    }
}
