// Dashboard service
// Session check, metric loading, card and chart derivation, refresh and logout.

use chrono::NaiveDate;

use crate::api::MetricsClient;
use crate::chart::{render_chart, ChartSpec, RenderContext};
use crate::error::{DashboardError, ErrorPayload};
use crate::series::bucketize_on;
use crate::state::SessionStore;
use crate::summary::{summarize, SummaryCard};
use crate::types::{ChartFilter, MetricRecord};
use crate::util::local_today;

pub const EMPTY_MESSAGE: &str = "No health metrics found. Please add data.";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load health data";
pub const NO_CHART_DATA: &str = "No data available";

/// What the dashboard shows right now.
#[derive(Debug, Clone, serde::Serialize)]
#[allow(clippy::large_enum_variant)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardView {
    Loading,
    Error {
        message: String,
        detail: ErrorPayload,
    },
    Empty {
        message: String,
    },
    Ready {
        cards: Vec<SummaryCard>,
        chart: ChartPanel,
    },
}

/// The chart area: selection, caption and (when there is data) the chart.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPanel {
    pub filter: ChartFilter,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<ChartSpec>,
}

/// Identifies one fetch. Only the most recently issued ticket may update the
/// dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Stale,
}

#[derive(Debug)]
enum LoadState {
    NotLoaded,
    Loaded(Vec<MetricRecord>),
    Failed(ErrorPayload),
}

pub struct Dashboard {
    client: MetricsClient,
    session: SessionStore,
    filter: ChartFilter,
    data: LoadState,
    issued: u64,
}

impl Dashboard {
    pub fn new(client: MetricsClient, session: SessionStore, filter: ChartFilter) -> Self {
        Self {
            client,
            session,
            filter,
            data: LoadState::NotLoaded,
            issued: 0,
        }
    }

    pub fn filter(&self) -> ChartFilter {
        self.filter
    }

    /// Cached records from the last applied fetch.
    pub fn metrics(&self) -> Option<&[MetricRecord]> {
        match &self.data {
            LoadState::Loaded(records) => Some(records),
            _ => None,
        }
    }

    /// Verify the session and load metrics once.
    ///
    /// A missing session is returned as `NotAuthenticated`; fetch failures
    /// become the `Error` view.
    pub async fn initialize(&mut self) -> Result<DashboardView, DashboardError> {
        self.session.require()?;
        self.refresh().await
    }

    /// Re-fetch from the backend regardless of what is cached.
    pub async fn refresh(&mut self) -> Result<DashboardView, DashboardError> {
        let user_id = self.session.require()?;
        let ticket = self.begin_fetch();
        let result = self.client.fetch_all(&user_id).await;
        self.complete_fetch(ticket, result);
        Ok(self.view())
    }

    /// Change the chart selection. Derived from the cached records; no fetch.
    pub fn set_filter(&mut self, filter: ChartFilter) -> DashboardView {
        self.filter = filter;
        self.view()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Apply a finished fetch unless a newer one has been issued since.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<MetricRecord>, DashboardError>,
    ) -> FetchOutcome {
        if ticket.0 < self.issued {
            log::info!(
                "Discarding stale metrics response (generation {}, latest {})",
                ticket.0,
                self.issued
            );
            return FetchOutcome::Stale;
        }

        self.data = match result {
            Ok(records) => LoadState::Loaded(records),
            Err(e) => {
                log::error!("Data loading failed: {}", e);
                LoadState::Failed(ErrorPayload::from(&e))
            }
        };
        FetchOutcome::Applied
    }

    pub fn view(&self) -> DashboardView {
        self.view_on(local_today())
    }

    /// Same as [`Dashboard::view`] with an explicit "today" for the chart window.
    pub fn view_on(&self, today: NaiveDate) -> DashboardView {
        match &self.data {
            LoadState::NotLoaded => DashboardView::Loading,
            LoadState::Failed(detail) => DashboardView::Error {
                message: LOAD_ERROR_MESSAGE.to_string(),
                detail: detail.clone(),
            },
            LoadState::Loaded(records) if records.is_empty() => DashboardView::Empty {
                message: EMPTY_MESSAGE.to_string(),
            },
            LoadState::Loaded(records) => DashboardView::Ready {
                cards: summarize(records),
                chart: chart_panel(records, self.filter, today),
            },
        }
    }

    /// Draw the current chart onto `ctx`, tearing down whatever it held.
    pub fn render(&self, ctx: RenderContext) -> RenderContext {
        self.render_on(ctx, local_today())
    }

    /// Same as [`Dashboard::render`] with an explicit "today", so the chart can
    /// share one date with a [`Dashboard::view_on`] result.
    pub fn render_on(&self, mut ctx: RenderContext, today: NaiveDate) -> RenderContext {
        match self.view_on(today) {
            DashboardView::Ready {
                chart: ChartPanel {
                    spec: Some(spec), ..
                },
                ..
            } => render_chart(ctx, spec),
            _ => {
                ctx.teardown();
                ctx
            }
        }
    }

    /// End the backend session, then forget the local one. On failure the
    /// local session is kept.
    pub async fn logout(&mut self) -> Result<(), DashboardError> {
        let user_id = self.session.require()?;
        if let Err(e) = self.client.logout(&user_id).await {
            log::error!("Logout error: {}", e);
            return Err(e);
        }
        self.session.clear()?;
        self.data = LoadState::NotLoaded;
        Ok(())
    }
}

fn chart_panel(records: &[MetricRecord], filter: ChartFilter, today: NaiveDate) -> ChartPanel {
    let matching = records.iter().filter(|m| m.is_type(filter.metric_type)).count();
    if matching == 0 {
        return ChartPanel {
            filter,
            caption: NO_CHART_DATA.to_string(),
            spec: None,
        };
    }

    let series = bucketize_on(records, filter.metric_type, filter.days, today);
    ChartPanel {
        filter,
        caption: format!("Showing {} records", matching),
        spec: Some(ChartSpec::build(filter.metric_type, &series)),
    }
}
