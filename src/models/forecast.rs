//! Forecast entries and the upcoming-window filter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One forecast step
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature_c: f64,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_id: String,
}

/// Keep the `window` nearest entries strictly after `now`, in chronological order.
#[must_use]
pub fn upcoming_forecast(
    mut entries: Vec<ForecastEntry>,
    now: DateTime<Utc>,
    window: usize,
) -> Vec<ForecastEntry> {
    entries.retain(|entry| entry.timestamp > now);
    entries.sort_by_key(|entry| entry.timestamp);
    entries.truncate(window);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(timestamp: DateTime<Utc>, temperature_c: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp,
            temperature_c,
            condition_main: "Clouds".to_string(),
            condition_description: "scattered clouds".to_string(),
            icon_id: "03d".to_string(),
        }
    }

    #[test]
    fn test_upcoming_drops_past_and_truncates() {
        let now = Utc::now();
        let mut entries: Vec<ForecastEntry> = (-3..10)
            .map(|step| entry(now + Duration::hours(3 * step), step as f64))
            .collect();
        entries.push(entry(now, 99.0));

        let upcoming = upcoming_forecast(entries, now, 6);

        assert_eq!(upcoming.len(), 6);
        assert!(upcoming.iter().all(|e| e.timestamp > now));
        let temps: Vec<f64> = upcoming.iter().map(|e| e.temperature_c).collect();
        assert_eq!(temps, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_upcoming_orders_chronologically() {
        let now = Utc::now();
        let entries = vec![
            entry(now + Duration::hours(9), 3.0),
            entry(now + Duration::hours(3), 1.0),
            entry(now + Duration::hours(6), 2.0),
        ];

        let upcoming = upcoming_forecast(entries, now, 6);
        let temps: Vec<f64> = upcoming.iter().map(|e| e.temperature_c).collect();
        assert_eq!(temps, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_upcoming_all_past_is_empty() {
        let now = Utc::now();
        let entries = vec![entry(now - Duration::hours(3), 1.0)];
        assert!(upcoming_forecast(entries, now, 6).is_empty());
    }
}
