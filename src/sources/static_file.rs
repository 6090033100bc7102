use crate::config::CompanyConfig;
use crate::error::{Result, ScheduleError};
use crate::normalize::static_table_to_week_data;
use crate::types::{RawWeekData, ScheduleSource};
use serde_json::Value;
use std::fs;
use tracing::{info, instrument};

/// Schedule source backed by a local JSON file keyed by company name. The
/// weekly table is the same every week, so the requested week only matters
/// for logging.
pub struct StaticFileSource {
    company: CompanyConfig,
}

impl StaticFileSource {
    pub fn new(company: CompanyConfig) -> Result<Self> {
        if company.schedule_file.is_none() {
            return Err(ScheduleError::Config(format!(
                "Company '{}' is marked static but has no schedule file",
                company.name
            )));
        }
        Ok(Self { company })
    }
}

#[async_trait::async_trait]
impl ScheduleSource for StaticFileSource {
    fn company(&self) -> &CompanyConfig {
        &self.company
    }

    #[instrument(skip(self), fields(company = %self.company.name))]
    async fn fetch_week(&self, week: u32, _year: i32) -> Result<Option<RawWeekData>> {
        let path = self.company.schedule_file.as_deref().ok_or_else(|| {
            ScheduleError::Config(format!(
                "Company '{}' is marked static but has no schedule file",
                self.company.name
            ))
        })?;

        let content = fs::read_to_string(path)?;
        let schedule_data: Value = serde_json::from_str(&content)?;

        let table = schedule_data.get(&self.company.name).ok_or_else(|| {
            ScheduleError::MissingField(format!(
                "No entry for '{}' in {}",
                self.company.name, path
            ))
        })?;

        info!("Loaded static schedules for week {}", week);
        Ok(Some(static_table_to_week_data(&self.company, table)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn company_with_file(path: &str) -> CompanyConfig {
        CompanyConfig {
            id: "vaearai".to_string(),
            name: "Vaeara'i".to_string(),
            vessel_name: Some("Vaeara'i".to_string()),
            static_schedule: true,
            schedule_file: Some(path.to_string()),
            firebase: None,
        }
    }

    #[tokio::test]
    async fn loads_and_converts_static_schedule_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedules.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            "{}",
            json!({
                "Vaeara'i": {
                    "TahitiVersMoorea": {"Lundi": ["06:00"]}
                }
            })
        )
        .unwrap();

        let source = StaticFileSource::new(company_with_file(path.to_str().unwrap())).unwrap();
        let data = source.fetch_week(48, 2024).await.unwrap().unwrap();

        let entry = &data["MOZ"][0]["schedule_0"];
        assert_eq!(entry["timeBegin"], 21600);
        assert_eq!(entry["origin"], "PPT");
        assert_eq!(entry["destination"], "MOZ");
        assert_eq!(entry["vessel_name"], "Vaeara'i");
    }

    #[tokio::test]
    async fn missing_company_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedules.json");
        fs::write(&path, "{}").unwrap();

        let source = StaticFileSource::new(company_with_file(path.to_str().unwrap())).unwrap();
        let result = source.fetch_week(48, 2024).await;
        assert!(matches!(result, Err(ScheduleError::MissingField(_))));
    }

    #[test]
    fn static_company_without_file_is_rejected() {
        let mut company = company_with_file("unused.json");
        company.schedule_file = None;
        assert!(StaticFileSource::new(company).is_err());
    }
}
