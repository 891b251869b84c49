//! Health tracker backend.
//!
//! Two endpoints, both authenticated by the `X-User-ID` header:
//! `GET /metrics` returns every reading for the user newest first, and
//! `POST /logout` ends the server-side session.

pub mod client;

pub use client::MetricsClient;

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const METRICS_PATH: &str = "metrics";
pub const LOGOUT_PATH: &str = "logout";
