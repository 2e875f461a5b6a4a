use crate::models::{AdvisoryRule, UserContext, WeatherSample};

/// Motorcycle / bicycle advisories
///
/// The two wind rules overlap on purpose: above 50km/h both the crosswind
/// and the gale warning fire.
pub(super) const RULES: [AdvisoryRule; 6] = [
    AdvisoryRule {
        id: 5,
        category: "Riding Safety",
        context: UserContext::TwoWheeler,
        situation: "Strong Crosswind",
        action: "Caution: Strong crosswinds. Don't go outside.",
        condition: strong_crosswind,
    },
    AdvisoryRule {
        id: 6,
        category: "Severe Wind Risk",
        context: UserContext::TwoWheeler,
        situation: "Gale Force Winds",
        action: "DANGER! Winds > 50km/h. Highly recommended to dismount or avoid riding.",
        condition: gale_force_winds,
    },
    AdvisoryRule {
        id: 7,
        category: "Slippery Road",
        context: UserContext::TwoWheeler,
        situation: "Light Rain / Wet Surface",
        action: "Road surface is wet. Avoid white lane markings and tram tracks.",
        condition: wet_surface,
    },
    AdvisoryRule {
        id: 8,
        category: "Riding Visibility",
        context: UserContext::TwoWheeler,
        situation: "Heavy Rain",
        action: "Heavy Rain! Visor may fog up and braking distance increases. Ride with extreme caution.",
        condition: heavy_rain,
    },
    AdvisoryRule {
        id: 9,
        category: "Winter Riding",
        context: UserContext::TwoWheeler,
        situation: "Snow / Icy Roads",
        action: "Snow detected! Zero traction. Consider walking your bike.",
        condition: icy_roads,
    },
    AdvisoryRule {
        id: 10,
        category: "Heat Safety",
        context: UserContext::TwoWheeler,
        situation: "Extreme Heat",
        action: "High heat (>30°C)! Asphalt may become soft. Watch out for heat exhaustion.",
        condition: extreme_heat,
    },
];

fn strong_crosswind(s: &WeatherSample) -> bool {
    s.wind_speed_kmh > 50.0
}

fn gale_force_winds(s: &WeatherSample) -> bool {
    s.wind_speed_kmh > 38.0
}

/// Light rain band stops at 2mm; heavier rain is `heavy_rain`
pub(super) fn wet_surface(s: &WeatherSample) -> bool {
    s.precipitation_mm > 0.0 && s.precipitation_mm <= 2.0 && s.temperature_c > 0.0
}

pub(super) fn heavy_rain(s: &WeatherSample) -> bool {
    s.precipitation_mm > 2.0 && s.temperature_c > 0.0
}

pub(super) fn icy_roads(s: &WeatherSample) -> bool {
    s.is_freezing() && s.precipitation_mm > 0.0
}

pub(super) fn extreme_heat(s: &WeatherSample) -> bool {
    s.temperature_c > 30.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64, w: f64, p: f64) -> WeatherSample {
        WeatherSample::new(t, w, p)
    }

    #[test]
    fn wind_bands_overlap_above_fifty() {
        let s = sample(12.0, 55.0, 0.0);
        assert!(strong_crosswind(&s));
        assert!(gale_force_winds(&s));

        let s = sample(12.0, 45.0, 0.0);
        assert!(!strong_crosswind(&s));
        assert!(gale_force_winds(&s));

        assert!(!strong_crosswind(&sample(12.0, 50.0, 0.0)));
    }

    #[test]
    fn light_and_heavy_rain_do_not_overlap() {
        let light = sample(8.0, 0.0, 2.0);
        assert!(wet_surface(&light));
        assert!(!heavy_rain(&light));

        let heavy = sample(8.0, 0.0, 2.5);
        assert!(!wet_surface(&heavy));
        assert!(heavy_rain(&heavy));
    }

    #[test]
    fn rain_rules_need_above_freezing() {
        assert!(!wet_surface(&sample(0.0, 0.0, 1.0)));
        assert!(!heavy_rain(&sample(0.0, 0.0, 4.0)));
        assert!(icy_roads(&sample(0.0, 0.0, 1.0)));
    }

    #[test]
    fn extreme_heat_threshold() {
        assert!(!extreme_heat(&sample(30.0, 0.0, 0.0)));
        assert!(extreme_heat(&sample(30.1, 0.0, 0.0)));
    }
}
