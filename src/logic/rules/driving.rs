use crate::models::{AdvisoryRule, UserContext, WeatherSample};

/// Driver / in-car advisories
///
/// Conditions:
/// - Black ice: temp ≤ 3°C
/// - Heavy rain: precipitation > 2mm
/// - Snowfall: temp ≤ 0°C with any precipitation
/// - Strong wind: wind > 38km/h
pub(super) const RULES: [AdvisoryRule; 4] = [
    AdvisoryRule {
        id: 1,
        category: "Driving Safety",
        context: UserContext::Driving,
        situation: "Black Ice Risk",
        action: "Possible black ice (Temp <= 3°C)! Avoid sudden braking and maintain double distance.",
        condition: black_ice_risk,
    },
    AdvisoryRule {
        id: 2,
        category: "Driving Visibility",
        context: UserContext::Driving,
        situation: "Heavy Rain",
        action: "Heavy Rain (>2mm). Turn on headlights and watch out for hydroplaning.",
        condition: heavy_rain,
    },
    AdvisoryRule {
        id: 3,
        category: "Driving Safety",
        context: UserContext::Driving,
        situation: "Snowfall",
        action: "Heavy Snow! Visibility reduced. Turn on low beams/fog lights and increase distance.",
        condition: snowfall,
    },
    AdvisoryRule {
        id: 4,
        category: "Driving Stability",
        context: UserContext::Driving,
        situation: "Strong Wind",
        action: "Strong crosswinds (>40km/h). Hold the steering wheel firmly.",
        condition: strong_wind,
    },
];

fn black_ice_risk(s: &WeatherSample) -> bool {
    s.temperature_c <= 3.0
}

fn heavy_rain(s: &WeatherSample) -> bool {
    s.precipitation_mm > 2.0
}

fn snowfall(s: &WeatherSample) -> bool {
    s.is_freezing() && s.precipitation_mm > 0.0
}

fn strong_wind(s: &WeatherSample) -> bool {
    s.wind_speed_kmh > 38.0
}
