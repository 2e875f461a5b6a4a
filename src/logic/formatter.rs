use crate::models::{ForecastOutlook, MatchedEvent, WeatherSample};
use std::fmt::Write;

/// Render matched advisories as a notification message.
///
/// Returns `None` when nothing matched so the caller can decide whether to
/// stay quiet. Lines keep the input order.
pub fn format_alerts(sample: &WeatherSample, events: &[MatchedEvent]) -> Option<String> {
    if events.is_empty() {
        return None;
    }

    let mut msg = format!(
        "Scheduled Weather Alerts (T:{}°C, Rain:{}mm)\n",
        sample.temperature_c, sample.precipitation_mm
    );
    for event in events {
        let _ = writeln!(msg, "【{}】 {}", event.context, event.action);
    }
    Some(msg)
}

pub fn format_current(sample: Option<&WeatherSample>) -> String {
    match sample {
        Some(s) => format!("Current (Now): {}", s),
        None => "Current weather data unavailable.".to_string(),
    }
}

pub fn format_forecast(outlook: &ForecastOutlook) -> String {
    let mut text = String::from("\nFORECAST (Next 24 Hours):\n");
    match outlook {
        ForecastOutlook::Available(points) => {
            for point in points {
                let _ = writeln!(
                    text,
                    "- {}: {}°C, Rain {}mm",
                    point.label, point.temperature_c, point.precipitation_mm
                );
            }
        }
        ForecastOutlook::Unavailable(reason) => {
            let _ = writeln!(text, "(Forecast data unavailable: {})", reason);
        }
    }
    text
}

/// Risk block handed to the advisory composer; empty when nothing matched
pub fn format_risks(events: &[MatchedEvent]) -> String {
    if events.is_empty() {
        return String::new();
    }

    let mut text = String::from("\n SYSTEM DETECTED RISKS (Critical Context Rules):\n");
    for event in events {
        let _ = writeln!(
            text,
            "- Context: {} -> Action: {}",
            event.context, event.action
        );
    }
    text.push_str("INSTRUCTION: You MUST mention these risks first if they are relevant.\n");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastPoint, UserContext};

    fn event(context: UserContext, action: &str) -> MatchedEvent {
        MatchedEvent {
            time: "2025-01-10 08:00".into(),
            context,
            situation: "Test".into(),
            action: action.into(),
        }
    }

    #[test]
    fn no_events_means_no_alert() {
        assert!(format_alerts(&WeatherSample::new(20.0, 3.0, 0.0), &[]).is_none());
    }

    #[test]
    fn alert_lines_keep_input_order() {
        let events = vec![
            event(UserContext::AtHome, "Bring in the laundry"),
            event(UserContext::Driving, "Slow down"),
        ];
        let msg = format_alerts(&WeatherSample::new(4.0, 12.0, 0.6), &events).unwrap();
        let lines: Vec<&str> = msg.lines().collect();

        assert_eq!(lines[0], "Scheduled Weather Alerts (T:4°C, Rain:0.6mm)");
        assert_eq!(lines[1], "【At Home】 Bring in the laundry");
        assert_eq!(lines[2], "【Driving】 Slow down");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn zero_precipitation_rendered_verbatim() {
        let events = vec![event(UserContext::Driving, "Ice")];
        let msg = format_alerts(&WeatherSample::new(-1.5, 10.0, 0.0), &events).unwrap();
        assert!(msg.starts_with("Scheduled Weather Alerts (T:-1.5°C, Rain:0mm)"));
    }

    #[test]
    fn current_summary() {
        let s = WeatherSample::new(7.2, 14.0, 0.0);
        assert_eq!(
            format_current(Some(&s)),
            "Current (Now): 7.2°C, Rain 0mm, Wind 14km/h"
        );
        assert_eq!(format_current(None), "Current weather data unavailable.");
    }

    #[test]
    fn forecast_available_and_unavailable() {
        let outlook = ForecastOutlook::Available(vec![ForecastPoint {
            label: "11:00".into(),
            temperature_c: 3.5,
            precipitation_mm: 0.2,
        }]);
        let text = format_forecast(&outlook);
        assert!(text.contains("FORECAST (Next 24 Hours):"));
        assert!(text.contains("- 11:00: 3.5°C, Rain 0.2mm"));

        let text = format_forecast(&ForecastOutlook::Unavailable("timeout".into()));
        assert!(text.contains("(Forecast data unavailable: timeout)"));
    }

    #[test]
    fn risks_block() {
        assert!(format_risks(&[]).is_empty());

        let text = format_risks(&[event(UserContext::RunnerPedestrian, "Wear spikes")]);
        assert!(text.contains("- Context: Runner/Pedestrian -> Action: Wear spikes"));
        assert!(text.contains("You MUST mention these risks first"));
    }
}
