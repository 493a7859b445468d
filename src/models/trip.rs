use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a trip record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TripSource {
    #[default]
    Manual,
}

impl TripSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "MANUAL" => Some(Self::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub city_id: Uuid,
    pub start_date: DateTime<Utc>,
    /// Not required to be after `start_date`
    pub end_date: DateTime<Utc>,
    pub source: TripSource,
}

impl Trip {
    pub fn new(city_id: Uuid, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            city_id,
            start_date,
            end_date,
            source: TripSource::default(),
        }
    }

    /// A trip is upcoming until its last day has passed
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.end_date > now
    }
}
