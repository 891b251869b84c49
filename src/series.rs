//! Calendar-day bucketing of sparse readings for charting (pure, no I/O).
//!
//! A window of `days` covers `days + 1` consecutive dates ending today, so
//! `labels`, `dates` and `values` have that length. `days` is capped at
//! [`MAX_PERIOD_DAYS`], and a window reaching past `NaiveDate::MIN` starts there.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::types::{MetricRecord, MetricType, MAX_PERIOD_DAYS};
use crate::util::{local_today, short_date_label};

/// Chart-ready series: one slot per calendar day, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketedSeries {
    pub labels: Vec<String>,
    pub dates: Vec<NaiveDate>,
    /// `None` marks a day with no usable reading.
    pub values: Vec<Option<f64>>,
}

impl BucketedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of days that carry a reading.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// `(label, value)` pairs in chart order.
    pub fn points(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Smallest and largest present value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Bucket `metrics` of `metric_type` into the `days`-day window ending today.
pub fn bucketize(metrics: &[MetricRecord], metric_type: MetricType, days: u32) -> BucketedSeries {
    bucketize_on(metrics, metric_type, days, local_today())
}

/// Same as [`bucketize`] with an explicit anchor date.
///
/// Readings on the same day overwrite each other in input order. Readings
/// outside the window, with unparseable values, or with unparseable
/// timestamps are skipped.
pub fn bucketize_on(
    metrics: &[MetricRecord],
    metric_type: MetricType,
    days: u32,
    today: NaiveDate,
) -> BucketedSeries {
    let days = days.min(MAX_PERIOD_DAYS);
    let start = today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    let dates: Vec<NaiveDate> = start
        .iter_days()
        .take(days as usize + 1)
        .take_while(|d| *d <= today)
        .collect();

    let mut buckets: HashMap<NaiveDate, Option<f64>> =
        dates.iter().map(|d| (*d, None)).collect();

    for record in metrics.iter().filter(|m| m.is_type(metric_type)) {
        let Some(date) = record.recorded_date() else {
            log::debug!(
                "Skipping {} reading with unparseable timestamp '{}'",
                metric_type,
                record.recorded_at
            );
            continue;
        };
        let Some(slot) = buckets.get_mut(&date) else {
            continue;
        };
        match record.value.primary() {
            Ok(value) => *slot = Some(value),
            Err(e) => log::debug!("Skipping {} reading on {}: {}", metric_type, date, e),
        }
    }

    let labels = dates.iter().map(|d| short_date_label(*d)).collect();
    let values = dates
        .iter()
        .map(|d| buckets.get(d).copied().flatten())
        .collect();

    BucketedSeries {
        labels,
        dates,
        values,
    }
}
