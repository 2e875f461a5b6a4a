use super::advisory::MatchedEvent;
use super::weather::WeatherSample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One delivered alert message and the advisories it carried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertBatch {
    pub id: Option<i64>,
    pub sent_at: DateTime<Utc>,
    pub sample: WeatherSample,
    pub events: Vec<MatchedEvent>,
}

impl AlertBatch {
    pub fn new(sample: WeatherSample, events: Vec<MatchedEvent>) -> Self {
        Self {
            id: None,
            sent_at: Utc::now(),
            sample,
            events,
        }
    }
}
