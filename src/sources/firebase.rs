use crate::config::CompanyConfig;
use crate::error::{Result, ScheduleError};
use crate::types::{RawWeekData, ScheduleSource};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote schedule source backed by a Firebase-style REST endpoint. One week
/// of data lives at `{databaseURL}/Calendar/{year}/{week}.json`.
pub struct FirebaseSource {
    company: CompanyConfig,
    client: reqwest::Client,
}

impl FirebaseSource {
    pub fn new(company: CompanyConfig) -> Result<Self> {
        if company.firebase.is_none() {
            return Err(ScheduleError::Config(format!(
                "Company '{}' has no remote database settings",
                company.name
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { company, client })
    }
}

#[async_trait::async_trait]
impl ScheduleSource for FirebaseSource {
    fn company(&self) -> &CompanyConfig {
        &self.company
    }

    #[instrument(skip(self), fields(company = %self.company.name))]
    async fn fetch_week(&self, week: u32, year: i32) -> Result<Option<RawWeekData>> {
        let firebase = self.company.firebase.as_ref().ok_or_else(|| {
            ScheduleError::Config(format!(
                "Company '{}' has no remote database settings",
                self.company.name
            ))
        })?;

        let week_path = format!("Calendar/{year}/{week}");
        let url = format!(
            "{}/{}.json",
            firebase.database_url.trim_end_matches('/'),
            week_path
        );
        debug!("Fetching {}", week_path);

        let mut request = self.client.get(&url);
        if let Some(api_key) = &firebase.api_key {
            request = request.query(&[("auth", api_key)]);
        }

        let data: Value = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // A JSON null body means the week simply has no data yet
        if data.is_null() {
            info!("No data for week {} of {}", week, year);
            return Ok(None);
        }

        info!("Fetched week {} of {}", week, year);
        Ok(Some(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompanyConfig, FirebaseConfig};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn company_for(url: &str) -> CompanyConfig {
        CompanyConfig {
            id: "terevau".to_string(),
            name: "Terevau".to_string(),
            vessel_name: None,
            static_schedule: false,
            schedule_file: None,
            firebase: Some(FirebaseConfig {
                api_key: Some("secret".to_string()),
                database_url: url.to_string(),
                project_id: Some("terevau-9651d".to_string()),
            }),
        }
    }

    /// Serve one canned JSON response and hand back the raw request for
    /// inspection.
    async fn serve_once(body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 2048];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            request
        });
        (format!("http://{addr}"), server)
    }

    #[tokio::test]
    async fn null_body_means_no_data_for_the_week() {
        let (url, server) = serve_once("null").await;
        let source = FirebaseSource::new(company_for(&url)).unwrap();

        let data = source.fetch_week(48, 2024).await.unwrap();
        assert!(data.is_none());

        // The week lives under Calendar/{year}/{week}.json with the api key
        // passed as the auth query parameter
        let request = server.await.unwrap();
        assert!(
            request.starts_with("GET /Calendar/2024/48.json?auth=secret HTTP/1.1"),
            "unexpected request: {request}"
        );
    }

    #[tokio::test]
    async fn week_data_passes_through_unchanged() {
        let (url, server) = serve_once(
            r#"{"MOZ": [{"schedule_0": {"day": 0, "timeBegin": 21600, "origin": "PPT", "destination": "MOZ"}}]}"#,
        )
        .await;
        let source = FirebaseSource::new(company_for(&url)).unwrap();

        let data = source.fetch_week(48, 2024).await.unwrap().unwrap();
        assert_eq!(data["MOZ"][0]["schedule_0"]["timeBegin"], 21600);
        server.await.unwrap();
    }

    #[test]
    fn company_without_firebase_settings_is_rejected() {
        let mut company = company_for("http://unused");
        company.firebase = None;
        assert!(FirebaseSource::new(company).is_err());
    }
}
