//! Error types for the dashboard
//!
//! Errors are classified by recoverability:
//! - Retryable: transport failures, non-success HTTP statuses
//! - NonRetryable: malformed payloads, bad configuration, trend math
//! - RequiresUserAction: no stored session

use thiserror::Error;

/// Error types for fetching and deriving dashboard data
#[derive(Debug, Error)]
pub enum DashboardError {
    // Retryable errors
    #[error("API request failed with status {status}")]
    Network { status: u16 },

    #[error("Request failed: {0}")]
    Request(String),

    // Non-retryable errors
    #[error("Invalid metrics data format: {0}")]
    Format(String),

    #[error("Failed to parse value: {0}")]
    Parse(String),

    #[error("Trend computation failed: {0}")]
    Computation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    // Requires user action
    #[error("Not logged in")]
    NotAuthenticated,
}

impl DashboardError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DashboardError::Network { .. } | DashboardError::Request(_)
        )
    }

    /// Returns true if this error requires user action to resolve
    pub fn requires_user_action(&self) -> bool {
        matches!(self, DashboardError::NotAuthenticated)
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::Network { .. } => "The server rejected the request. Try again.",
            DashboardError::Request(_) => "Check that the backend is reachable and try again.",
            DashboardError::Format(_) => "The server returned unexpected data.",
            DashboardError::Parse(_) => "Check the recorded value format.",
            DashboardError::Computation(_) => "Not enough comparable readings for a trend.",
            DashboardError::Config(_) => "Check your configuration in ~/.healthdash/config.json",
            DashboardError::Io(_) => "Check file permissions and disk space.",
            DashboardError::NotAuthenticated => "Run 'healthdash login <user-id>' first.",
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Format(err.to_string())
    }
}

/// Serializable error representation for JSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl From<&DashboardError> for ErrorPayload {
    fn from(err: &DashboardError) -> Self {
        let error_type = if err.requires_user_action() {
            ErrorType::RequiresUserAction
        } else if err.is_retryable() {
            ErrorType::Retryable
        } else {
            ErrorType::NonRetryable
        };

        ErrorPayload {
            message: err.to_string(),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
