//! Terminal presentation of a [`DashboardView`].

use colored::Colorize;

use crate::chart::RenderContext;
use crate::services::dashboard::DashboardView;
use crate::summary::SummaryCard;
use crate::trend::{TrendDirection, TrendResult};

pub const PLOT_HEIGHT: usize = 8;
pub const PLOT_WIDTH: usize = 60;

/// Text for the whole dashboard. The chart comes from `ctx`, which the
/// caller has already rendered into.
pub fn render_text(view: &DashboardView, ctx: &RenderContext) -> String {
    let mut out = Vec::new();
    match view {
        DashboardView::Loading => out.push("Loading data...".dimmed().to_string()),
        DashboardView::Error { message, detail } => {
            out.push(format!("{} {}", "⚠".red(), message.red().bold()));
            out.push(format!("  {}", detail.message));
            out.push(format!("  {}", detail.recovery_suggestion.dimmed()));
        }
        DashboardView::Empty { message } => {
            out.push(format!("{} {}", "ℹ".blue(), message));
        }
        DashboardView::Ready { cards, chart } => {
            for card in cards {
                out.push(card_line(card));
            }
            out.push(String::new());

            let title = chart
                .spec
                .as_ref()
                .map(|s| s.dataset_label.clone())
                .unwrap_or_else(|| format!("{} Trend", chart.filter.metric_type));
            out.push(format!(
                "{} ({} days)",
                title.bold(),
                chart.filter.days
            ));
            if chart.spec.is_some() {
                if let Some(handle) = ctx.current() {
                    out.extend(handle.plot(PLOT_WIDTH, PLOT_HEIGHT));
                }
            }
            out.push(chart.caption.dimmed().to_string());
        }
    }
    out.join("\n")
}

fn card_line(card: &SummaryCard) -> String {
    let date = card
        .latest
        .as_ref()
        .map(|l| l.date_text.as_str())
        .filter(|d| !d.is_empty())
        .map(|d| format!("  {}", d.dimmed()))
        .unwrap_or_default();
    format!(
        "{:<16}{:<18}{}{}",
        card.metric_type.label().bold(),
        card.value_text(),
        trend_text(&card.trend),
        date
    )
}

fn trend_text(trend: &TrendResult) -> String {
    let text = format!("{:<9}", trend.display());
    match trend.direction() {
        TrendDirection::Up => text.green().to_string(),
        TrendDirection::Down => text.red().to_string(),
        TrendDirection::Neutral => text.dimmed().to_string(),
    }
}
