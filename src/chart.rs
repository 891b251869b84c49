//! Chart description and the caller-owned render context.
//!
//! There is no global chart: whoever draws owns a [`RenderContext`] and passes
//! it through [`render_chart`], which tears down the previous chart before
//! installing the next one.

use serde::Serialize;

use crate::series::BucketedSeries;
use crate::types::MetricType;

const BORDER_WIDTH: u32 = 2;
const LINE_TENSION: f64 = 0.3;

/// Everything needed to draw one line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub metric_type: MetricType,
    pub dataset_label: String,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub border_width: u32,
    pub tension: f64,
    pub fill: bool,
    pub begin_at_zero: bool,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl ChartSpec {
    pub fn build(metric_type: MetricType, series: &BucketedSeries) -> Self {
        Self {
            metric_type,
            dataset_label: format!("{} Trend", metric_type.label()),
            border_color: metric_type.line_color(),
            background_color: metric_type.fill_color(),
            border_width: BORDER_WIDTH,
            tension: LINE_TENSION,
            fill: true,
            begin_at_zero: false,
            labels: series.labels.clone(),
            values: series.values.clone(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }
}

/// A live chart. Dropping it without [`ChartHandle::destroy`] is allowed but
/// skips the teardown log.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    id: u64,
    spec: ChartSpec,
}

impl ChartHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn destroy(self) {
        log::debug!("Destroying chart #{} ({})", self.id, self.spec.dataset_label);
    }

    /// Terminal line plot, `height` rows tall and at most `width` columns wide.
    ///
    /// Days without a reading leave a gap. When there are more days than
    /// columns, each column shows the latest reading among the days it spans.
    pub fn plot(&self, width: usize, height: usize) -> Vec<String> {
        plot_values(&self.spec.values, &self.spec.labels, width, height)
    }
}

/// Owns at most one live chart.
#[derive(Debug, Default)]
pub struct RenderContext {
    current: Option<ChartHandle>,
    created: u64,
    destroyed: u64,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ChartHandle> {
        self.current.as_ref()
    }

    pub fn charts_created(&self) -> u64 {
        self.created
    }

    pub fn charts_destroyed(&self) -> u64 {
        self.destroyed
    }

    /// Destroy the live chart, if any.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.destroy();
            self.destroyed += 1;
        }
    }
}

/// Replace whatever `ctx` is showing with a chart for `spec`.
pub fn render_chart(mut ctx: RenderContext, spec: ChartSpec) -> RenderContext {
    ctx.teardown();
    ctx.created += 1;
    log::debug!("Creating chart #{} ({})", ctx.created, spec.dataset_label);
    ctx.current = Some(ChartHandle {
        id: ctx.created,
        spec,
    });
    ctx
}

fn plot_values(values: &[Option<f64>], labels: &[String], width: usize, height: usize) -> Vec<String> {
    let width = width.max(1);
    let height = height.max(2);

    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let (Some(lo), Some(hi)) = (
        present.iter().copied().reduce(f64::min),
        present.iter().copied().reduce(f64::max),
    ) else {
        return vec!["No data available".to_string()];
    };

    let columns = downsample(values, width);
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut grid = vec![vec![' '; columns.len()]; height];
    for (x, value) in columns.iter().enumerate() {
        if let Some(v) = value {
            let scaled = ((v - lo) / span * (height - 1) as f64).round() as usize;
            let row = height - 1 - scaled.min(height - 1);
            grid[row][x] = '●';
        }
    }

    let hi_label = format!("{:.1}", hi);
    let lo_label = format!("{:.1}", lo);
    let gutter = hi_label.len().max(lo_label.len());

    let mut lines: Vec<String> = grid
        .into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let axis = if row == 0 {
                format!("{:>gutter$}", hi_label)
            } else if row == height - 1 {
                format!("{:>gutter$}", lo_label)
            } else {
                " ".repeat(gutter)
            };
            let body: String = cells.into_iter().collect();
            format!("{} │{}", axis, body.trim_end())
        })
        .collect();

    lines.push(format!("{} └{}", " ".repeat(gutter), "─".repeat(columns.len())));
    if let (Some(first), Some(last)) = (labels.first(), labels.last()) {
        let pad = columns.len().saturating_sub(first.chars().count() + last.chars().count());
        let footer = if first == last {
            first.clone()
        } else {
            format!("{}{}{}", first, " ".repeat(pad.max(1)), last)
        };
        lines.push(format!("{}  {}", " ".repeat(gutter), footer));
    }
    lines
}

/// Fold `values` into at most `width` columns, keeping the latest present
/// value of each group.
fn downsample(values: &[Option<f64>], width: usize) -> Vec<Option<f64>> {
    if values.len() <= width {
        return values.to_vec();
    }
    let per_column = values.len().div_ceil(width);
    values
        .chunks(per_column)
        .map(|chunk| chunk.iter().rev().find_map(|v| *v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::bucketize_on;
    use crate::types::{MetricRecord, MetricValue};
    use chrono::NaiveDate;

    fn series(values: Vec<Option<f64>>) -> BucketedSeries {
        let start = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let dates: Vec<NaiveDate> = start.iter_days().take(values.len()).collect();
        BucketedSeries {
            labels: dates.iter().map(|d| crate::util::short_date_label(*d)).collect(),
            dates,
            values,
        }
    }

    #[test]
    fn test_spec_uses_metric_attributes() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let metrics = vec![MetricRecord {
            metric_type: "Blood Pressure".into(),
            value: MetricValue::Text("118/76".into()),
            unit: "mmHg".into(),
            recorded_at: "2026-10-15T08:00:00".into(),
        }];
        let s = bucketize_on(&metrics, MetricType::BloodPressure, 7, today);
        let spec = ChartSpec::build(MetricType::BloodPressure, &s);

        assert_eq!(spec.dataset_label, "Blood Pressure Trend");
        assert_eq!(spec.border_color, "#f72585");
        assert_eq!(spec.background_color, "rgba(247, 37, 133, 0.2)");
        assert_eq!(spec.labels.len(), 8);
        assert_eq!(spec.values.last(), Some(&Some(118.0)));
        assert!(spec.has_data());
        assert!(!spec.begin_at_zero);
    }

    #[test]
    fn test_render_tears_down_previous_chart() {
        let spec = ChartSpec::build(MetricType::Weight, &series(vec![Some(70.0)]));

        let ctx = RenderContext::new();
        let ctx = render_chart(ctx, spec.clone());
        assert_eq!(ctx.current().map(ChartHandle::id), Some(1));
        assert_eq!(ctx.charts_destroyed(), 0);

        let ctx = render_chart(ctx, spec);
        assert_eq!(ctx.current().map(ChartHandle::id), Some(2));
        assert_eq!(ctx.charts_created(), 2);
        assert_eq!(ctx.charts_destroyed(), 1);
    }

    #[test]
    fn test_teardown_without_chart_is_noop() {
        let mut ctx = RenderContext::new();
        ctx.teardown();
        assert_eq!(ctx.charts_destroyed(), 0);
        assert!(ctx.current().is_none());
    }

    #[test]
    fn test_plot_all_absent() {
        let spec = ChartSpec::build(MetricType::Weight, &series(vec![None, None]));
        let ctx = render_chart(RenderContext::new(), spec);
        let lines = ctx.current().unwrap().plot(40, 5);
        assert_eq!(lines, vec!["No data available".to_string()]);
    }

    #[test]
    fn test_plot_places_extremes_on_edges() {
        let spec = ChartSpec::build(
            MetricType::Weight,
            &series(vec![Some(70.0), None, Some(72.0)]),
        );
        let ctx = render_chart(RenderContext::new(), spec);
        let lines = ctx.current().unwrap().plot(40, 3);

        // 3 plot rows + axis + footer
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "72.0 │  ●");
        assert_eq!(lines[2], "70.0 │●");
        assert!(lines[4].contains("Oct 1"));
        assert!(lines[4].contains("Oct 3"));
    }

    #[test]
    fn test_downsample_keeps_latest_in_group() {
        let values = vec![Some(1.0), Some(2.0), None, Some(4.0), None, None];
        assert_eq!(downsample(&values, 3), vec![Some(2.0), Some(4.0), None]);
        assert_eq!(downsample(&values, 10), values);
    }
}
