use crate::logic::formatter::{format_current, format_forecast, format_risks};
use crate::models::{ForecastOutlook, MatchedEvent, WeatherSample};

/// Weather context for one user question
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub location: String,
    pub current: Option<WeatherSample>,
    pub outlook: ForecastOutlook,
    pub events: Vec<MatchedEvent>,
}

impl PromptContext {
    /// Context when no weather could be fetched at all
    pub fn unavailable(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            current: None,
            outlook: ForecastOutlook::Unavailable(reason.into()),
            events: Vec::new(),
        }
    }
}

/// Detected risks go ahead of the question so the model mentions them first.
pub fn build_prompt(question: &str, ctx: &PromptContext) -> String {
    format!(
        "You are a helpful weather assistant. Current weather in {}.\n\
         Here is the real-time data:\n\
         1. {}\n\
         2. {}\n\
         {}\
         Based on the weather data above, please answer the user's question: {}\n\
         IMPORTANT: Please reply in ENGLISH. If the user asks about clothing or transport, \
         provide specific safety advice based on the weather conditions.",
        ctx.location,
        format_current(ctx.current.as_ref()),
        format_forecast(&ctx.outlook),
        format_risks(&ctx.events),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastPoint, UserContext};

    fn context(events: Vec<MatchedEvent>) -> PromptContext {
        PromptContext {
            location: "Dresden, Germany".into(),
            current: Some(WeatherSample::new(2.0, 20.0, 0.0)),
            outlook: ForecastOutlook::Available(vec![ForecastPoint {
                label: "12:00".into(),
                temperature_c: 3.0,
                precipitation_mm: 0.0,
            }]),
            events,
        }
    }

    #[test]
    fn prompt_without_risks() {
        let prompt = build_prompt("Should I cycle today?", &context(Vec::new()));
        assert!(prompt.contains("Current weather in Dresden, Germany."));
        assert!(prompt.contains("1. Current (Now): 2°C, Rain 0mm, Wind 20km/h"));
        assert!(prompt.contains("- 12:00: 3°C, Rain 0mm"));
        assert!(!prompt.contains("SYSTEM DETECTED RISKS"));
        assert!(prompt.contains("answer the user's question: Should I cycle today?"));
        assert!(prompt.ends_with("based on the weather conditions."));
    }

    #[test]
    fn risks_precede_question() {
        let events = vec![MatchedEvent {
            time: "now".into(),
            context: UserContext::Driving,
            situation: "Black Ice Risk".into(),
            action: "Avoid sudden braking".into(),
        }];
        let prompt = build_prompt("Can I drive?", &context(events));

        let risks = prompt.find("SYSTEM DETECTED RISKS").unwrap();
        let question = prompt.find("Can I drive?").unwrap();
        assert!(risks < question);
        assert!(prompt.contains("- Context: Driving -> Action: Avoid sudden braking"));
    }

    #[test]
    fn unavailable_context() {
        let ctx = PromptContext::unavailable("Dresden", "Open-Meteo down");
        let prompt = build_prompt("Weather?", &ctx);
        assert!(prompt.contains("Current weather data unavailable."));
        assert!(prompt.contains("(Forecast data unavailable: Open-Meteo down)"));
    }
}
