use crate::config::CompanyConfig;
use crate::error::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Raw week of schedule data as returned by a source, in the nested
/// per-destination shape: `{"MOZ": [day 0..6 maps], "PPT": [day 0..6 maps]}`.
pub type RawWeekData = serde_json::Value;

/// The two endpoints of the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Port {
    #[serde(rename = "PPT")]
    Papeete,
    #[serde(rename = "MOZ")]
    Moorea,
}

impl Port {
    pub const ALL: [Port; 2] = [Port::Moorea, Port::Papeete];

    pub fn code(&self) -> &'static str {
        match self {
            Port::Papeete => "PPT",
            Port::Moorea => "MOZ",
        }
    }

    pub fn from_code(code: &str) -> Option<Port> {
        match code {
            "PPT" => Some(Port::Papeete),
            "MOZ" => Some(Port::Moorea),
            _ => None,
        }
    }
}

/// Operational status of a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Cancelled,
    Unknown,
}

impl Status {
    /// Sources omit the status on most entries; absent means active.
    pub fn from_label(label: Option<&str>) -> Status {
        match label {
            None => Status::Active,
            Some("active") => Status::Active,
            Some("cancelled") => Status::Cancelled,
            Some(_) => Status::Unknown,
        }
    }
}

/// One canonical ferry departure, the unit exchanged between all components.
///
/// `time_begin` and the time-of-day component of `timestamp` always agree;
/// records are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Departure {
    pub vessel_name: String,
    pub vessel_raw: String,
    pub company: String,
    pub origin: Port,
    pub destination: Port,
    /// Day of week, Monday = 0.
    pub day: u8,
    /// Departure time in seconds since midnight.
    pub time_begin: u32,
    pub status: Status,
    pub timestamp: NaiveDateTime,
}

/// Core trait every schedule source must implement.
#[async_trait::async_trait]
pub trait ScheduleSource: Send + Sync {
    /// The company this source belongs to.
    fn company(&self) -> &CompanyConfig;

    /// Fetch one week of schedules in the nested shape.
    ///
    /// `Ok(None)` means the source has no data for that week, which is not an
    /// error.
    async fn fetch_week(&self, week: u32, year: i32) -> Result<Option<RawWeekData>>;
}
