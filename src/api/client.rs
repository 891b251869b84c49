//! HTTP client for the health tracker backend.
//!
//! Uses reqwest with the `X-User-ID` header. Failures are returned to the
//! caller unchanged; nothing is retried here.

use std::time::Duration;

use url::Url;

use super::{LOGOUT_PATH, METRICS_PATH, USER_ID_HEADER};
use crate::error::DashboardError;
use crate::types::{Config, MetricRecord};

pub struct MetricsClient {
    client: reqwest::Client,
    base_url: Url,
}

impl MetricsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        let mut base_url = Url::parse(base_url.trim())
            .map_err(|e| DashboardError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(DashboardError::Config(format!(
                "API URL must be http or https, got '{}'",
                base_url.scheme()
            )));
        }
        // Url::join replaces the last path segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, DashboardError> {
        self.base_url
            .join(path)
            .map_err(|e| DashboardError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// Fetch every metric record for `user_id`, newest first as the backend
    /// orders them.
    ///
    /// Non-success status → `Network`; a body that is not a JSON array of
    /// records → `Format`.
    pub async fn fetch_all(&self, user_id: &str) -> Result<Vec<MetricRecord>, DashboardError> {
        let url = self.endpoint(METRICS_PATH)?;
        log::info!("Fetching metrics from {}", url);

        let resp = self
            .client
            .get(url)
            .header(USER_ID_HEADER, user_id)
            .send()
            .await
            .map_err(|e| DashboardError::Request(format!("Metrics request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("Metrics request failed with status {}", status);
            return Err(DashboardError::Network {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DashboardError::Request(format!("Failed to read metrics body: {}", e)))?;

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| DashboardError::Format(format!("response is not JSON: {}", e)))?;

        if !json.is_array() {
            return Err(DashboardError::Format(format!(
                "expected a JSON array, got {}",
                json_kind(&json)
            )));
        }

        let records: Vec<MetricRecord> = serde_json::from_value(json)
            .map_err(|e| DashboardError::Format(format!("malformed metric record: {}", e)))?;

        log::info!("Fetched {} metric records", records.len());
        Ok(records)
    }

    /// End the backend session for `user_id`.
    pub async fn logout(&self, user_id: &str) -> Result<(), DashboardError> {
        let url = self.endpoint(LOGOUT_PATH)?;

        let resp = self
            .client
            .post(url)
            .header(USER_ID_HEADER, user_id)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| DashboardError::Request(format!("Logout request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            log::warn!("Logout failed with status {}", status);
            return Err(DashboardError::Network {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
