use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::types::Config;

/// Overrides the `~/.healthdash` state directory.
pub const HOME_ENV: &str = "HEALTHDASH_HOME";

/// Get the state directory (`$HEALTHDASH_HOME` or ~/.healthdash)
pub fn state_dir() -> Result<PathBuf, DashboardError> {
    if let Some(custom) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(custom));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| DashboardError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".healthdash"))
}

/// Get the canonical config file path (~/.healthdash/config.json)
pub fn config_path() -> Result<PathBuf, DashboardError> {
    Ok(state_dir()?.join("config.json"))
}

/// Load configuration from ~/.healthdash/config.json
pub fn load_config() -> Result<Config, DashboardError> {
    load_config_from(&config_path()?)
}

/// Load configuration from `path`. A missing file yields the defaults; a
/// malformed one is an error.
pub fn load_config_from(path: &Path) -> Result<Config, DashboardError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| DashboardError::Config(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| DashboardError::Config(format!("Failed to parse config: {}", e)))
}

/// Create or update config.json.
///
/// Loads the current file (or defaults), applies the mutator, ensures the
/// parent directory exists and writes pretty JSON back.
pub fn create_or_update_config(
    path: &Path,
    mutator: impl FnOnce(&mut Config),
) -> Result<Config, DashboardError> {
    let mut config = load_config_from(path)?;
    mutator(&mut config);

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| DashboardError::Config(format!("Failed to create config dir: {}", e)))?;
        }
    }

    let content = serde_json::to_string_pretty(&config)
        .map_err(|e| DashboardError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, content)
        .map_err(|e| DashboardError::Config(format!("Failed to write config: {}", e)))?;

    Ok(config)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    user_id: String,
}

/// The locally persisted user identifier.
///
/// Written by `login`, read before every request, removed on logout.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ~/.healthdash/session.json
    pub fn default_location() -> Result<Self, DashboardError> {
        Ok(Self::new(state_dir()?.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored user id, or `None` when logged out.
    pub fn load(&self) -> Result<Option<String>, DashboardError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session: SessionFile = serde_json::from_str(&content)
            .map_err(|e| DashboardError::Config(format!("Corrupt session file: {}", e)))?;
        let user_id = session.user_id.trim().to_string();
        Ok((!user_id.is_empty()).then_some(user_id))
    }

    /// The stored user id, or `NotAuthenticated`.
    pub fn require(&self) -> Result<String, DashboardError> {
        self.load()?.ok_or(DashboardError::NotAuthenticated)
    }

    pub fn save(&self, user_id: &str) -> Result<(), DashboardError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(DashboardError::Config("user id must not be empty".to_string()));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&SessionFile {
            user_id: user_id.to_string(),
        })?;
        fs::write(&self.path, content)?;
        log::info!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Remove the stored id. Already logged out is not an error.
    pub fn clear(&self) -> Result<(), DashboardError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricType;
    use tempfile::tempdir;

    #[test]
    fn test_session_round_trip() {
        let dir = tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        assert!(matches!(store.require(), Err(DashboardError::NotAuthenticated)));

        store.save("  user-42 ").unwrap();
        assert_eq!(store.load().unwrap(), Some("user-42".to_string()));
        assert_eq!(store.require().unwrap(), "user-42");

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_session_rejects_blank_id() {
        let dir = tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.save("   ").is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_blank_stored_id_counts_as_logged_out() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"userId": ""}"#).unwrap();
        assert_eq!(SessionStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn test_missing_config_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_create_or_update_config_persists() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("cfg").join("config.json");

        let written = create_or_update_config(&path, |c| {
            c.api_base_url = "http://health.local:8080".to_string();
            c.default_metric = MetricType::BloodSugar;
        })
        .unwrap();

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(reloaded, written);
        assert_eq!(reloaded.default_metric, MetricType::BloodSugar);
        assert_eq!(reloaded.default_period_days, 30);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"defaultMetric\": \"Blood Sugar\""));
    }
}
