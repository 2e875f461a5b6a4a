use crate::models::{AdvisoryRule, MatchedEvent, WeatherSample};

/// Evaluate every rule against one sample, in table order.
///
/// All matches are returned; there is no short-circuiting, deduplication or
/// priority. An empty result means no advisory applies. Conditions are total,
/// so NaN or infinite inputs simply fail to match.
pub fn detect_events(
    rules: &[AdvisoryRule],
    timestamp: &str,
    sample: &WeatherSample,
) -> Vec<MatchedEvent> {
    rules
        .iter()
        .filter(|rule| rule.matches(sample))
        .map(|rule| rule.to_event(timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::RuleTable;
    use crate::models::UserContext;

    fn detect(t: f64, w: f64, p: f64) -> Vec<MatchedEvent> {
        RuleTable::standard().unwrap().evaluate("test", &WeatherSample::new(t, w, p))
    }

    fn situations(events: &[MatchedEvent]) -> Vec<&str> {
        events.iter().map(|e| e.situation.as_str()).collect()
    }

    fn has(events: &[MatchedEvent], context: UserContext, situation: &str) -> bool {
        events
            .iter()
            .any(|e| e.context == context && e.situation == situation)
    }

    #[test]
    fn black_ice_tracks_three_degrees() {
        for t in [-40.0, -1.0, 0.0, 2.9, 3.0] {
            assert!(situations(&detect(t, 10.0, 0.0)).contains(&"Black Ice Risk"));
        }
        for t in [3.1, 4.0, 20.0, 45.0] {
            assert!(!situations(&detect(t, 10.0, 0.0)).contains(&"Black Ice Risk"));
        }
    }

    #[test]
    fn driving_heavy_rain_is_strict_inequality() {
        assert!(!has(&detect(10.0, 0.0, 2.0), UserContext::Driving, "Heavy Rain"));
        assert!(has(&detect(10.0, 0.0, 2.1), UserContext::Driving, "Heavy Rain"));
        assert!(has(&detect(-3.0, 0.0, 9.0), UserContext::Driving, "Heavy Rain"));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let table = RuleTable::standard().unwrap();
        let sample = WeatherSample::new(-2.0, 55.0, 1.5);
        assert_eq!(
            table.evaluate("a", &sample),
            table.evaluate("a", &sample)
        );
    }

    #[test]
    fn timestamp_only_changes_time_field() {
        let table = RuleTable::standard().unwrap();
        let sample = WeatherSample::new(31.0, 42.0, 0.0);
        let a = table.evaluate("A", &sample);
        let b = table.evaluate("B", &sample);

        assert_eq!(a.len(), b.len());
        for (ea, eb) in a.iter().zip(&b) {
            assert_eq!(ea.time, "A");
            assert_eq!(eb.time, "B");
            assert_eq!(ea.context, eb.context);
            assert_eq!(ea.situation, eb.situation);
            assert_eq!(ea.action, eb.action);
        }
    }

    #[test]
    fn wind_above_fifty_fires_both_wind_bands() {
        for w in [50.1, 65.0, 120.0] {
            let events = detect(12.0, w, 0.0);
            let s = situations(&events);
            assert!(s.contains(&"Strong Crosswind"));
            assert!(s.contains(&"Gale Force Winds"));
        }
    }

    #[test]
    fn output_follows_table_order() {
        let events = detect(-1.0, 60.0, 1.0);
        let table = RuleTable::standard().unwrap();
        let positions: Vec<usize> = events
            .iter()
            .map(|e| {
                table
                    .rules()
                    .iter()
                    .position(|r| r.context == e.context && r.situation == e.situation)
                    .unwrap()
            })
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn scenario_frost_no_rain() {
        let events = detect(-1.0, 10.0, 0.0);
        let s = situations(&events);
        assert!(s.contains(&"Black Ice Risk"));
        assert!(!s.contains(&"Heavy Rain"));
        assert!(!s.contains(&"Strong Wind"));
    }

    #[test]
    fn scenario_heavy_rain() {
        let events = detect(5.0, 20.0, 3.0);
        assert!(has(&events, UserContext::Driving, "Heavy Rain"));
        assert!(has(&events, UserContext::TwoWheeler, "Heavy Rain"));
        assert!(has(&events, UserContext::RunnerPedestrian, "Heavy Rain"));
        assert!(has(&events, UserContext::AtHome, "Sudden Rain"));
        assert!(!situations(&events).contains(&"Black Ice Risk"));
    }

    #[test]
    fn scenario_gale_without_rain() {
        let events = detect(12.0, 45.0, 0.0);
        assert!(has(&events, UserContext::Driving, "Strong Wind"));
        assert!(has(&events, UserContext::TwoWheeler, "Gale Force Winds"));
        assert!(has(&events, UserContext::RunnerPedestrian, "Strong Wind"));

        let s = situations(&events);
        for rain in [
            "Heavy Rain",
            "Light Rain",
            "Light Rain / Wet Surface",
            "Sudden Rain",
            "Snowfall",
        ] {
            assert!(!s.contains(&rain), "unexpected {}", rain);
        }
    }

    #[test]
    fn scenario_mild_calm_day_is_empty() {
        assert!(detect(25.0, 5.0, 0.0).is_empty());
    }

    #[test]
    fn scenario_freezing_drizzle() {
        let events = detect(0.0, 0.0, 0.5);
        assert!(has(&events, UserContext::Driving, "Snowfall"));
        assert!(has(&events, UserContext::TwoWheeler, "Snow / Icy Roads"));
        assert!(has(&events, UserContext::RunnerPedestrian, "Snow / Icy Ground"));
        assert!(has(&events, UserContext::AtHome, "Sudden Rain"));

        let s = situations(&events);
        assert!(!s.contains(&"Light Rain"));
        assert!(!s.contains(&"Light Rain / Wet Surface"));
    }

    #[test]
    fn non_finite_inputs_do_not_panic() {
        let table = RuleTable::standard().unwrap();
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let _ = table.evaluate("x", &WeatherSample::new(v, v, v));
        }
        assert!(table
            .evaluate("x", &WeatherSample::new(f64::NAN, f64::NAN, f64::NAN))
            .is_empty());
    }

    #[test]
    fn empty_rule_slice_yields_nothing() {
        assert!(detect_events(&[], "now", &WeatherSample::new(-5.0, 60.0, 10.0)).is_empty());
    }
}
