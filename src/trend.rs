//! Percentage trend between the two most recent readings (pure math, no I/O).

use serde::Serialize;

use crate::error::DashboardError;
use crate::types::MetricRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Neutral => "→",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TrendResult {
    /// Fewer than two comparable readings; shown as a dash.
    NoTrend,
    #[serde(rename_all = "camelCase")]
    Change {
        direction: TrendDirection,
        magnitude_percent: f64,
    },
}

impl TrendResult {
    /// Display text, e.g. `↑ 25.0%`, or `—` without a trend.
    pub fn display(&self) -> String {
        match self {
            TrendResult::NoTrend => "—".to_string(),
            TrendResult::Change {
                direction,
                magnitude_percent,
            } => format!("{} {:.1}%", direction.arrow(), magnitude_percent),
        }
    }

    pub fn direction(&self) -> TrendDirection {
        match self {
            TrendResult::NoTrend => TrendDirection::Neutral,
            TrendResult::Change { direction, .. } => *direction,
        }
    }
}

/// Signed percentage change from `previous` to `current`.
pub fn percent_change(current: f64, previous: f64) -> Result<f64, DashboardError> {
    if previous == 0.0 {
        return Err(DashboardError::Computation(format!(
            "previous reading is zero (current {})",
            current
        )));
    }
    Ok((current - previous) / previous * 100.0)
}

/// Trend of `records_newest_first[0]` against `records_newest_first[1]`.
///
/// Fewer than two records, or a record whose value does not parse, yields
/// `NoTrend`. A zero previous value is a `Computation` error.
pub fn compute_trend(records_newest_first: &[MetricRecord]) -> Result<TrendResult, DashboardError> {
    let [latest, previous, ..] = records_newest_first else {
        return Ok(TrendResult::NoTrend);
    };

    let (current_value, previous_value) = match (latest.value.primary(), previous.value.primary()) {
        (Ok(c), Ok(p)) => (c, p),
        _ => return Ok(TrendResult::NoTrend),
    };

    let change = percent_change(current_value, previous_value)?;
    let direction = if change > 0.0 {
        TrendDirection::Up
    } else if change < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };

    Ok(TrendResult::Change {
        direction,
        magnitude_percent: change.abs(),
    })
}
