use super::two_wheeler::{heavy_rain, icy_roads, wet_surface};
use crate::models::{AdvisoryRule, UserContext, WeatherSample};

/// Outdoor exercise (runner / pedestrian) advisories
///
/// Conditions:
/// - Low temperature: < 5°C
/// - High temperature: > 25°C
/// - Precipitation bands shared with the two-wheeler rules
/// - Strong wind: > 38km/h
pub(super) const RULES: [AdvisoryRule; 6] = [
    AdvisoryRule {
        id: 11,
        category: "Exercise Health",
        context: UserContext::RunnerPedestrian,
        situation: "Low Temperature",
        action: "Cold air (<5°C) may irritate lungs. Wear a neck gaiter and extend warm-up.",
        condition: low_temperature,
    },
    AdvisoryRule {
        id: 12,
        category: "Heat Risk",
        context: UserContext::RunnerPedestrian,
        situation: "High Temperature",
        action: "High temp (>25°C). Reduce intensity and hydrate every 15 mins. Stay in shade.",
        condition: high_temperature,
    },
    AdvisoryRule {
        id: 13,
        category: "Safety",
        context: UserContext::RunnerPedestrian,
        situation: "Snow / Icy Ground",
        action: "Icy ground! Wear boots/shoes with grip or use spikes. Shorten stride.",
        condition: icy_roads,
    },
    AdvisoryRule {
        id: 14,
        category: "Visibility",
        context: UserContext::RunnerPedestrian,
        situation: "Light Rain",
        action: "Light rain. Wear reflective clothing and a cap to keep rain out of eyes.",
        condition: wet_surface,
    },
    AdvisoryRule {
        id: 15,
        category: "Activity Advice",
        context: UserContext::RunnerPedestrian,
        situation: "Heavy Rain",
        action: "Heavy Rain (>2mm)! Consider indoor exercises or treadmill today.",
        condition: heavy_rain,
    },
    AdvisoryRule {
        id: 16,
        category: "Safety",
        context: UserContext::RunnerPedestrian,
        situation: "Strong Wind",
        action: "Strong wind (>30km/h). Watch out for falling branches in parks.",
        condition: strong_wind,
    },
];

fn low_temperature(s: &WeatherSample) -> bool {
    s.temperature_c < 5.0
}

fn high_temperature(s: &WeatherSample) -> bool {
    s.temperature_c > 25.0
}

fn strong_wind(s: &WeatherSample) -> bool {
    s.wind_speed_kmh > 38.0
}
