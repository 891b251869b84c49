use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Configuration stored in ~/.healthdash/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub default_metric: MetricType,
    #[serde(default = "default_period_days")]
    pub default_period_days: u32,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_period_days() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_metric: MetricType::default(),
            default_period_days: default_period_days(),
        }
    }
}

/// Longest chart window accepted from config or the command line.
pub const MAX_PERIOD_DAYS: u32 = 3650;

/// The fixed set of tracked measurement categories.
///
/// Every per-type attribute (label, unit, colours) is a match on this enum, so
/// adding a category fails to compile until each attribute covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MetricType {
    #[default]
    Weight,
    #[serde(rename = "Blood Pressure")]
    BloodPressure,
    #[serde(rename = "Blood Sugar")]
    BloodSugar,
}

impl MetricType {
    /// Summary card order.
    pub const ALL: [MetricType; 3] = [
        MetricType::Weight,
        MetricType::BloodPressure,
        MetricType::BloodSugar,
    ];

    /// The `metric_type` string the backend uses.
    pub fn label(self) -> &'static str {
        match self {
            MetricType::Weight => "Weight",
            MetricType::BloodPressure => "Blood Pressure",
            MetricType::BloodSugar => "Blood Sugar",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MetricType::Weight => "kg",
            MetricType::BloodPressure => "mmHg",
            MetricType::BloodSugar => "mg/dL",
        }
    }

    /// Command-line spelling.
    pub fn slug(self) -> &'static str {
        match self {
            MetricType::Weight => "weight",
            MetricType::BloodPressure => "blood-pressure",
            MetricType::BloodSugar => "blood-sugar",
        }
    }

    pub fn line_color(self) -> &'static str {
        match self {
            MetricType::Weight => "#4361ee",
            MetricType::BloodPressure => "#f72585",
            MetricType::BloodSugar => "#4cc9f0",
        }
    }

    pub fn fill_color(self) -> &'static str {
        match self {
            MetricType::Weight => "rgba(67, 97, 238, 0.2)",
            MetricType::BloodPressure => "rgba(247, 37, 133, 0.2)",
            MetricType::BloodSugar => "rgba(76, 201, 240, 0.2)",
        }
    }

    /// Look up a backend `metric_type` string. Unknown strings yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetricType {
    type Err = DashboardError;

    /// Accepts the slug (`blood-pressure`), the backend label
    /// (`Blood Pressure`) or a snake_case spelling, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|t| t.slug() == normalized)
            .ok_or_else(|| {
                DashboardError::Config(format!(
                    "unknown metric type '{}' (expected weight, blood-pressure or blood-sugar)",
                    s
                ))
            })
    }
}

/// A reading as the backend sends it: a bare number or a string such as
/// `"72.5"` or `"120/80"`. Anything else (`null`, a boolean, a missing field)
/// is kept as `Other` so one bad record does not fail the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Other(serde_json::Value::Null)
    }
}

impl MetricValue {
    /// The charted number. Compound `"a/b"` strings yield `a` (systolic for
    /// blood pressure). Non-finite results count as unparseable.
    ///
    /// Text must be a whole number after trimming: `"72kg"` is rejected
    /// rather than read as 72.
    pub fn primary(&self) -> Result<f64, DashboardError> {
        let value = match self {
            MetricValue::Number(n) => *n,
            MetricValue::Other(other) => {
                return Err(DashboardError::Parse(format!("{} is not numeric", other)))
            }
            MetricValue::Text(text) => {
                let head = text.split('/').next().unwrap_or(text).trim();
                head.parse::<f64>()
                    .map_err(|_| DashboardError::Parse(format!("'{}' is not numeric", text)))?
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DashboardError::Parse(format!("{} is not finite", value)))
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(text) => f.write_str(text),
            MetricValue::Other(other) => write!(f, "{}", other),
        }
    }
}

/// One health reading from `GET /metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub metric_type: String,
    #[serde(default)]
    pub value: MetricValue,
    #[serde(default)]
    pub unit: String,
    pub recorded_at: String,
}

impl MetricRecord {
    pub fn kind(&self) -> Option<MetricType> {
        MetricType::from_label(&self.metric_type)
    }

    pub fn is_type(&self, metric_type: MetricType) -> bool {
        self.metric_type == metric_type.label()
    }

    /// Calendar date of the reading in local time.
    pub fn recorded_date(&self) -> Option<NaiveDate> {
        crate::util::recorded_date(&self.recorded_at)
    }
}

/// Chart selection: which metric and how many days back from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFilter {
    pub metric_type: MetricType,
    pub days: u32,
}

impl ChartFilter {
    pub fn new(metric_type: MetricType, days: u32) -> Self {
        Self {
            metric_type,
            days: days.min(MAX_PERIOD_DAYS),
        }
    }
}

impl From<&Config> for ChartFilter {
    fn from(config: &Config) -> Self {
        ChartFilter::new(config.default_metric, config.default_period_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_value_yields_systolic() {
        let value = MetricValue::Text("120/80".to_string());
        assert_eq!(value.primary().unwrap(), 120.0);
    }

    #[test]
    fn test_numeric_string_and_number() {
        assert_eq!(MetricValue::Text(" 72.5 ".into()).primary().unwrap(), 72.5);
        assert_eq!(MetricValue::Number(95.0).primary().unwrap(), 95.0);
    }

    #[test]
    fn test_unparseable_value() {
        let err = MetricValue::Text("N/A".into()).primary().unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
        assert!(MetricValue::Text("NaN".into()).primary().is_err());
    }

    #[test]
    fn test_record_deserializes_both_value_shapes() {
        let json = r#"[
            {"metric_type": "Blood Pressure", "value": "120/80", "unit": "mmHg", "recorded_at": "2026-10-01T08:00:00", "id": 7},
            {"metric_type": "Weight", "value": 71.2, "unit": "kg", "recorded_at": "2026-10-01T08:00:00"}
        ]"#;
        let records: Vec<MetricRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].kind(), Some(MetricType::BloodPressure));
        assert_eq!(records[0].value, MetricValue::Text("120/80".into()));
        assert_eq!(records[1].value, MetricValue::Number(71.2));
    }

    #[test]
    fn test_null_or_missing_value_kept_as_unparseable() {
        let json = r#"[
            {"metric_type": "Blood Sugar", "value": null, "recorded_at": "2026-10-01T08:00:00"},
            {"metric_type": "Weight", "value": true, "recorded_at": "2026-10-01T08:00:00"},
            {"metric_type": "Weight", "recorded_at": "2026-10-01T08:00:00"}
        ]"#;
        let records: Vec<MetricRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].value, MetricValue::Other(serde_json::Value::Null));
        assert_eq!(records[1].value, MetricValue::Other(serde_json::Value::Bool(true)));
        assert_eq!(records[2].value, MetricValue::default());
        for record in &records {
            assert!(matches!(record.value.primary(), Err(DashboardError::Parse(_))));
        }
    }

    #[test]
    fn test_trailing_text_is_unparseable() {
        assert!(MetricValue::Text("72kg".into()).primary().is_err());
    }

    #[test]
    fn test_metric_type_parsing() {
        assert_eq!("blood-pressure".parse::<MetricType>().unwrap(), MetricType::BloodPressure);
        assert_eq!("Blood Sugar".parse::<MetricType>().unwrap(), MetricType::BloodSugar);
        assert_eq!("WEIGHT".parse::<MetricType>().unwrap(), MetricType::Weight);
        assert!("cholesterol".parse::<MetricType>().is_err());
    }

    #[test]
    fn test_metric_type_serde_uses_backend_label() {
        let json = serde_json::to_string(&MetricType::BloodSugar).unwrap();
        assert_eq!(json, "\"Blood Sugar\"");
        assert_eq!(MetricType::from_label("Weight"), Some(MetricType::Weight));
        assert_eq!(MetricType::from_label("weight"), None);
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"apiBaseUrl": "http://example.test"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://example.test");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.default_period_days, 30);
        assert_eq!(config.default_metric, MetricType::Weight);
    }

    #[test]
    fn test_filter_clamps_days() {
        assert_eq!(ChartFilter::new(MetricType::Weight, 99_999).days, MAX_PERIOD_DAYS);
    }
}
