use super::two_wheeler::extreme_heat;
use crate::models::{AdvisoryRule, UserContext, WeatherSample};

/// At-home reminders and the general-public heatwave alert
pub(super) const RULES: [AdvisoryRule; 3] = [
    AdvisoryRule {
        id: 17,
        category: "Household Advice",
        context: UserContext::AtHome,
        situation: "Good for Drying Laundry",
        action: "Perfect Laundry Weather! No rain + breeze.",
        condition: drying_weather,
    },
    AdvisoryRule {
        id: 18,
        category: "Household Reminder",
        context: UserContext::AtHome,
        situation: "Sudden Rain",
        action: "It's raining! Bring in the laundry!",
        condition: any_rain,
    },
    AdvisoryRule {
        id: 19,
        category: "Heatwave Alert",
        context: UserContext::GeneralPublic,
        situation: "Extreme Heat",
        action: "Heatwave Alert (>30°C). Stay hydrated and avoid direct sun.",
        condition: extreme_heat,
    },
];

/// Dry, mild, with a breeze
fn drying_weather(s: &WeatherSample) -> bool {
    s.is_dry() && s.temperature_c > 10.0 && s.wind_speed_kmh > 5.0
}

fn any_rain(s: &WeatherSample) -> bool {
    s.precipitation_mm > 0.0
}
