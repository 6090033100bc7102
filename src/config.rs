use crate::error::{Result, ScheduleError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level operator configuration, loaded from `companies.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub companies: Vec<CompanyConfig>,
}

/// One maritime company and where its schedules come from.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    pub id: String,
    pub name: String,
    /// Display name of the vessel when the source does not carry one.
    #[serde(default)]
    pub vessel_name: Option<String>,
    /// True when schedules come from a local file instead of a remote database.
    #[serde(default, rename = "staticSchedule")]
    pub static_schedule: bool,
    #[serde(default, rename = "scheduleFile")]
    pub schedule_file: Option<String>,
    #[serde(default)]
    pub firebase: Option<FirebaseConfig>,
}

/// Remote database settings for one company.
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    #[serde(default, rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(rename = "databaseURL")]
    pub database_url: String,
    #[serde(default, rename = "projectId")]
    pub project_id: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScheduleError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Companies eligible for fetching: placeholder credentials exclude a
    /// company without raising an error.
    pub fn configured_companies(&self) -> Vec<&CompanyConfig> {
        self.companies.iter().filter(|c| c.is_configured()).collect()
    }
}

impl CompanyConfig {
    /// Vessel name shown when a schedule entry carries none of its own.
    pub fn vessel_display_name(&self) -> &str {
        self.vessel_name.as_deref().unwrap_or(&self.name)
    }

    /// A company is configured when it either uses a static schedule file or
    /// carries real (non-placeholder) remote credentials.
    pub fn is_configured(&self) -> bool {
        if self.static_schedule {
            return true;
        }

        let Some(firebase) = &self.firebase else {
            return false;
        };

        if firebase
            .api_key
            .as_deref()
            .is_some_and(|key| key.starts_with("YOUR_"))
        {
            return false;
        }
        if firebase.database_url.contains("your-project") {
            return false;
        }
        if firebase.project_id.as_deref() == Some("your-project") {
            return false;
        }

        true
    }
}
