//! Current conditions model and display methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// Current weather as reported for a resolved location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentWeather {
    pub location: Location,
    pub conditions: CurrentConditions,
}

/// Current conditions at a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Apparent temperature in Celsius
    pub feels_like_c: f64,
    /// Relative humidity (0-100)
    pub humidity_pct: u8,
    /// Atmospheric pressure in hPa
    pub pressure_hpa: u32,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    /// Cloud cover percentage (0-100)
    pub cloudiness_pct: u8,
    /// Visibility in meters, when reported
    pub visibility_m: Option<u32>,
    /// Condition group, e.g. "Rain", "Clear", "Clouds"
    pub condition_main: String,
    /// Human-readable description, e.g. "light rain"
    pub condition_description: String,
    /// Weather condition icon ID from the API
    pub icon_id: String,
    /// Sunrise, Unix seconds
    pub sunrise: Option<i64>,
    /// Sunset, Unix seconds
    pub sunset: Option<i64>,
}

impl CurrentConditions {
    /// Sunrise as a timestamp
    #[must_use]
    pub fn sunrise_time(&self) -> Option<DateTime<Utc>> {
        self.sunrise.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Sunset as a timestamp
    #[must_use]
    pub fn sunset_time(&self) -> Option<DateTime<Utc>> {
        self.sunset.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature_c)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} m/s", self.wind_speed_ms)
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{} hPa", self.pressure_hpa)
    }
}

#[cfg(test)]
pub(crate) fn sample_conditions() -> CurrentConditions {
    CurrentConditions {
        temperature_c: 32.1,
        feels_like_c: 33.4,
        humidity_pct: 40,
        pressure_hpa: 1008,
        wind_speed_ms: 3.0,
        cloudiness_pct: 0,
        visibility_m: Some(10_000),
        condition_main: "Clear".to_string(),
        condition_description: "clear sky".to_string(),
        icon_id: "01d".to_string(),
        sunrise: Some(1_700_000_000),
        sunset: Some(1_700_030_000),
    }
}
