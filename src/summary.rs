//! Summary cards: latest reading and trend per metric type.

use serde::Serialize;

use crate::trend::{compute_trend, TrendResult};
use crate::types::{MetricRecord, MetricType};

pub const NO_DATA: &str = "No data";

/// The latest reading shown on a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestReading {
    /// Value and unit as received, e.g. "120/80 mmHg".
    pub value_text: String,
    /// Local calendar date, empty when the timestamp does not parse.
    pub date_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub metric_type: MetricType,
    pub latest: Option<LatestReading>,
    pub trend: TrendResult,
}

impl SummaryCard {
    pub fn value_text(&self) -> &str {
        self.latest
            .as_ref()
            .map(|l| l.value_text.as_str())
            .unwrap_or(NO_DATA)
    }
}

/// Build one card for `metric_type` from records ordered newest first.
pub fn summary_card(metrics: &[MetricRecord], metric_type: MetricType) -> SummaryCard {
    let matching: Vec<MetricRecord> = metrics
        .iter()
        .filter(|m| m.is_type(metric_type))
        .cloned()
        .collect();

    let Some(latest) = matching.first() else {
        return SummaryCard {
            metric_type,
            latest: None,
            trend: TrendResult::NoTrend,
        };
    };

    let unit = if latest.unit.is_empty() {
        metric_type.unit()
    } else {
        latest.unit.as_str()
    };
    let latest_reading = LatestReading {
        value_text: format!("{} {}", latest.value, unit),
        date_text: latest
            .recorded_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    };

    let trend = match compute_trend(&matching) {
        Ok(trend) => trend,
        Err(e) => {
            log::warn!("{} trend unavailable: {}", metric_type, e);
            TrendResult::NoTrend
        }
    };

    SummaryCard {
        metric_type,
        latest: Some(latest_reading),
        trend,
    }
}

/// One card per metric type, in [`MetricType::ALL`] order.
pub fn summarize(metrics: &[MetricRecord]) -> Vec<SummaryCard> {
    MetricType::ALL
        .into_iter()
        .map(|metric_type| summary_card(metrics, metric_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::TrendDirection;
    use crate::types::MetricValue;

    fn rec(metric_type: &str, value: MetricValue, unit: &str, at: &str) -> MetricRecord {
        MetricRecord {
            metric_type: metric_type.into(),
            value,
            unit: unit.into(),
            recorded_at: at.into(),
        }
    }

    #[test]
    fn test_cards_cover_every_type_in_order() {
        let cards = summarize(&[]);
        let types: Vec<_> = cards.iter().map(|c| c.metric_type).collect();
        assert_eq!(types, MetricType::ALL.to_vec());
        assert!(cards.iter().all(|c| c.value_text() == NO_DATA));
        assert!(cards.iter().all(|c| c.trend == TrendResult::NoTrend));
    }

    #[test]
    fn test_latest_is_first_matching_record() {
        let metrics = vec![
            rec("Blood Sugar", MetricValue::Number(99.0), "mg/dL", "2026-10-14T07:00:00"),
            rec("Blood Pressure", MetricValue::Text("120/80".into()), "mmHg", "2026-10-13T07:00:00"),
            rec("Blood Pressure", MetricValue::Text("110/70".into()), "mmHg", "2026-10-12T07:00:00"),
        ];
        let card = summary_card(&metrics, MetricType::BloodPressure);
        let latest = card.latest.as_ref().unwrap();
        assert_eq!(latest.value_text, "120/80 mmHg");
        assert_eq!(latest.date_text, "2026-10-13");
        assert_eq!(card.trend.direction(), TrendDirection::Up);
    }

    #[test]
    fn test_missing_unit_falls_back_to_type_unit() {
        let metrics = vec![rec("Weight", MetricValue::Number(71.5), "", "2026-10-14T07:00:00")];
        let card = summary_card(&metrics, MetricType::Weight);
        assert_eq!(card.value_text(), "71.5 kg");
        assert_eq!(card.trend, TrendResult::NoTrend);
    }

    #[test]
    fn test_zero_previous_shows_no_trend() {
        let metrics = vec![
            rec("Blood Sugar", MetricValue::Number(90.0), "mg/dL", "2026-10-14T07:00:00"),
            rec("Blood Sugar", MetricValue::Number(0.0), "mg/dL", "2026-10-13T07:00:00"),
        ];
        let card = summary_card(&metrics, MetricType::BloodSugar);
        assert_eq!(card.trend, TrendResult::NoTrend);
        assert!(card.latest.is_some());
    }
}
