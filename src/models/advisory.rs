use super::weather::WeatherSample;
use serde::{Deserialize, Serialize};

/// Activity an advisory is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserContext {
    #[serde(rename = "Driving")]
    Driving,
    #[serde(rename = "Motorcycle / Bicycle")]
    TwoWheeler,
    #[serde(rename = "Runner/Pedestrian")]
    RunnerPedestrian,
    #[serde(rename = "At Home")]
    AtHome,
    #[serde(rename = "General Public")]
    GeneralPublic,
}

impl UserContext {
    pub fn all() -> &'static [UserContext] {
        &[
            UserContext::Driving,
            UserContext::TwoWheeler,
            UserContext::RunnerPedestrian,
            UserContext::AtHome,
            UserContext::GeneralPublic,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserContext::Driving => "Driving",
            UserContext::TwoWheeler => "Motorcycle / Bicycle",
            UserContext::RunnerPedestrian => "Runner/Pedestrian",
            UserContext::AtHome => "At Home",
            UserContext::GeneralPublic => "General Public",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for UserContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pure, total condition over a sample.
pub type Condition = fn(&WeatherSample) -> bool;

/// A static condition→advisory pair.
#[derive(Clone, Copy)]
pub struct AdvisoryRule {
    pub id: u32,
    pub category: &'static str,
    pub context: UserContext,
    pub situation: &'static str,
    pub action: &'static str,
    pub condition: Condition,
}

impl AdvisoryRule {
    pub fn matches(&self, sample: &WeatherSample) -> bool {
        (self.condition)(sample)
    }

    pub fn to_event(&self, time: &str) -> MatchedEvent {
        MatchedEvent {
            time: time.to_string(),
            context: self.context,
            situation: self.situation.to_string(),
            action: self.action.to_string(),
        }
    }
}

impl std::fmt::Debug for AdvisoryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryRule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("context", &self.context)
            .field("situation", &self.situation)
            .finish_non_exhaustive()
    }
}

/// An advisory whose condition held for a sample, stamped with the caller's time label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedEvent {
    pub time: String,
    pub context: UserContext,
    pub situation: String,
    pub action: String,
}
