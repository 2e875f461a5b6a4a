mod driving;
mod household;
mod runner;
mod two_wheeler;

use crate::error::{Result, WeatherWatchError};
use crate::logic::detector::detect_events;
use crate::models::{AdvisoryRule, MatchedEvent, UserContext, WeatherSample};
use std::collections::HashSet;

/// Ordered, immutable catalog of advisory rules.
///
/// Table order is output order. Rules are not mutually exclusive and carry no
/// priority, so several advisories can fire for the same sample.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<AdvisoryRule>,
}

impl RuleTable {
    /// The built-in 19-rule catalog
    pub fn standard() -> Result<Self> {
        let rules: Vec<AdvisoryRule> = driving::RULES
            .iter()
            .chain(two_wheeler::RULES.iter())
            .chain(runner::RULES.iter())
            .chain(household::RULES.iter())
            .copied()
            .collect();

        Self::from_rules(rules)
    }

    /// Build a custom table. An empty table is valid; duplicate ids are not.
    pub fn from_rules(rules: Vec<AdvisoryRule>) -> Result<Self> {
        if let Some(id) = duplicate_id(&rules) {
            return Err(WeatherWatchError::InvalidData(format!(
                "duplicate advisory rule id {}",
                id
            )));
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[AdvisoryRule] {
        &self.rules
    }

    pub fn get(&self, id: u32) -> Option<&AdvisoryRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn evaluate(&self, timestamp: &str, sample: &WeatherSample) -> Vec<MatchedEvent> {
        detect_events(&self.rules, timestamp, sample)
    }

    pub fn evaluate_rule(
        &self,
        id: u32,
        timestamp: &str,
        sample: &WeatherSample,
    ) -> Option<MatchedEvent> {
        self.get(id)
            .filter(|rule| rule.matches(sample))
            .map(|rule| rule.to_event(timestamp))
    }

    pub fn list_rules(&self) -> Vec<(u32, UserContext, &'static str)> {
        self.rules
            .iter()
            .map(|r| (r.id, r.context, r.situation))
            .collect()
    }
}

fn duplicate_id(rules: &[AdvisoryRule]) -> Option<u32> {
    let mut seen = HashSet::new();
    rules.iter().map(|r| r.id).find(|id| !seen.insert(*id))
}
