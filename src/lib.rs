//! healthdash: health metric dashboard core.
//!
//! Fetches a user's readings from the tracker backend, derives one summary
//! card per metric type, and buckets the selected metric into a per-day
//! series for charting.

pub mod api;
pub mod chart;
pub mod error;
pub mod render;
pub mod series;
pub mod services;
pub mod state;
pub mod summary;
pub mod trend;
pub mod types;
pub mod util;

pub use error::DashboardError;
pub use series::{bucketize, bucketize_on, BucketedSeries};
pub use trend::{compute_trend, TrendDirection, TrendResult};
pub use types::{ChartFilter, MetricRecord, MetricType, MetricValue};
