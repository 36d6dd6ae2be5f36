//! Presentation derivations
//!
//! Pure, deterministic mappings from raw weather fields to the values a
//! dashboard shows: greeting, advice, AQI label, day/night, scene, UV
//! estimate, visibility bucket and alerts. Nothing here performs I/O.

use chrono::{DateTime, Local, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::CurrentConditions;

/// Wind speed (m/s) above which the windy overlay is shown
pub const WIND_OVERLAY_THRESHOLD_MS: f64 = 4.5;

/// Colour used for unknown or unavailable values
pub const NEUTRAL_COLOR: &str = "#666";

/// Time-of-day greeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Greeting {
    #[must_use]
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Greeting::Morning,
            12..=16 => Greeting::Afternoon,
            17..=19 => Greeting::Evening,
            _ => Greeting::Night,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Greeting::Morning => "Good Morning ☀️",
            Greeting::Afternoon => "Good Afternoon 🌞",
            Greeting::Evening => "Good Evening 🌇",
            Greeting::Night => "Good Night 🌙",
        }
    }
}

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Advice for a condition; rain wins over cloud, cloud over clear.
#[must_use]
pub fn weather_advice(condition: &str) -> &'static str {
    let condition = condition.to_lowercase();
    if condition.contains("rain") {
        "Rainy – Carry an umbrella!"
    } else if condition.contains("cloud") {
        "Cloudy – May stay dry"
    } else if condition.contains("clear") {
        "Sunny day – No rain expected"
    } else {
        "Mild weather – Enjoy your day!"
    }
}

/// Label and colour for an AQI level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqiInfo {
    pub level: u8,
    pub label: String,
    pub color: String,
}

/// Look up the 1-5 AQI table; anything else is "Unknown".
#[must_use]
pub fn aqi_info(level: Option<u8>) -> AqiInfo {
    let (label, color) = match level {
        Some(1) => ("Good", "#00e400"),
        Some(2) => ("Fair", "#ffff00"),
        Some(3) => ("Moderate", "#ff7e00"),
        Some(4) => ("Poor", "#ff0000"),
        Some(5) => ("Very Poor", "#7e0023"),
        _ => ("Unknown", NEUTRAL_COLOR),
    };
    AqiInfo {
        level: level.unwrap_or(0),
        label: label.to_string(),
        color: color.to_string(),
    }
}

/// Hour of day in `tz`, or in the system's local zone
#[must_use]
pub fn local_hour(now: DateTime<Utc>, tz: Option<Tz>) -> u32 {
    match tz {
        Some(tz) => now.with_timezone(&tz).hour(),
        None => now.with_timezone(&Local).hour(),
    }
}

/// Night when before sunrise or after sunset. Without sun times, day is the
/// local-hour window 6..=18.
#[must_use]
pub fn is_night(
    now: DateTime<Utc>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
    local_hour: u32,
) -> bool {
    match (sunrise, sunset) {
        (Some(sunrise), Some(sunset)) => {
            let now = now.timestamp();
            now < sunrise || now > sunset
        }
        _ => !(6..=18).contains(&local_hour),
    }
}

/// Colour bucket for a temperature in Celsius
#[must_use]
pub fn temperature_color(temperature_c: f64) -> &'static str {
    if temperature_c <= 10.0 {
        "#3b82f6"
    } else if temperature_c <= 20.0 {
        "#10b981"
    } else if temperature_c <= 30.0 {
        "#f59e0b"
    } else {
        "#ef4444"
    }
}

/// Background/animation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneCategory {
    Thunderstorm,
    Rain,
    Snow,
    Mist,
    ClearDay,
    ClearNight,
    CloudsDay,
    CloudsNight,
}

impl SceneCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SceneCategory::Thunderstorm => "thunderstorm",
            SceneCategory::Rain => "rain",
            SceneCategory::Snow => "snow",
            SceneCategory::Mist => "mist",
            SceneCategory::ClearDay => "clear-day",
            SceneCategory::ClearNight => "clear-night",
            SceneCategory::CloudsDay => "clouds-day",
            SceneCategory::CloudsNight => "clouds-night",
        }
    }
}

impl fmt::Display for SceneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scene category plus the independent wind overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub category: SceneCategory,
    pub windy: bool,
}

impl Scene {
    #[must_use]
    pub fn classify(condition: &str, wind_speed_ms: f64, night: bool) -> Self {
        let condition = condition.to_lowercase();
        let has = |needle: &str| condition.contains(needle);

        let category = if has("thunderstorm") || has("storm") {
            SceneCategory::Thunderstorm
        } else if has("rain") || has("drizzle") {
            SceneCategory::Rain
        } else if has("snow") {
            SceneCategory::Snow
        } else if has("mist") || has("fog") || has("haze") {
            SceneCategory::Mist
        } else if has("clear") {
            if night {
                SceneCategory::ClearNight
            } else {
                SceneCategory::ClearDay
            }
        } else if has("cloud") {
            if night {
                SceneCategory::CloudsNight
            } else {
                SceneCategory::CloudsDay
            }
        } else if night {
            // unrecognised conditions fall back to a clear sky
            SceneCategory::ClearNight
        } else {
            SceneCategory::ClearDay
        };

        Self {
            category,
            windy: wind_speed_ms > WIND_OVERLAY_THRESHOLD_MS,
        }
    }
}

/// Estimated UV index. This is a placeholder heuristic, not a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UvEstimate {
    pub index: u8,
    pub level: String,
    pub color: String,
}

impl UvEstimate {
    #[must_use]
    pub fn estimate(local_hour: u32, condition_main: &str) -> Self {
        let index = match local_hour {
            10..=16 => match condition_main {
                "Clear" => 8,
                "Clouds" => 5,
                _ => 3,
            },
            8..=18 => 4,
            _ => 0,
        };

        let (level, color) = match index {
            0..=2 => ("Low", "#10b981"),
            3..=5 => ("Moderate", "#f59e0b"),
            6..=7 => ("High", "#ef4444"),
            _ => ("Very High", "#7c2d12"),
        };

        Self {
            index,
            level: level.to_string(),
            color: color.to_string(),
        }
    }
}

/// Visibility distance and its bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityReport {
    pub km: Option<f64>,
    pub bucket: String,
}

impl VisibilityReport {
    #[must_use]
    pub fn from_meters(visibility_m: Option<u32>) -> Self {
        Self {
            km: visibility_m.map(|m| (f64::from(m) / 100.0).round() / 10.0),
            bucket: visibility_bucket(visibility_m).to_string(),
        }
    }

    /// "10.0 km" or "N/A"
    #[must_use]
    pub fn format_distance(&self) -> String {
        match self.km {
            Some(km) => format!("{km:.1} km"),
            None => "N/A".to_string(),
        }
    }
}

#[must_use]
pub fn visibility_bucket(visibility_m: Option<u32>) -> &'static str {
    match visibility_m {
        None => "N/A",
        Some(m) if m >= 10_000 => "Excellent",
        Some(m) if m >= 5_000 => "Good",
        Some(m) if m >= 2_000 => "Moderate",
        Some(_) => "Poor",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Heat,
    Humidity,
    Wind,
    Rain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub kind: AlertKind,
    pub message: String,
}

impl WeatherAlert {
    fn new(kind: AlertKind) -> Self {
        let message = match kind {
            AlertKind::Heat => "Extreme heat warning - Stay hydrated!",
            AlertKind::Humidity => "High humidity - Thunderstorms possible",
            AlertKind::Wind => "Strong winds - Be cautious outdoors",
            AlertKind::Rain => "Rain expected - Carry umbrella",
        };
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// Threshold alerts for the current conditions, in a fixed order
#[must_use]
pub fn weather_alerts(conditions: &CurrentConditions) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();
    if conditions.temperature_c > 40.0 {
        alerts.push(WeatherAlert::new(AlertKind::Heat));
    }
    if conditions.humidity_pct > 85 {
        alerts.push(WeatherAlert::new(AlertKind::Humidity));
    }
    if conditions.wind_speed_ms > 10.0 {
        alerts.push(WeatherAlert::new(AlertKind::Wind));
    }
    if conditions.condition_main == "Rain" {
        alerts.push(WeatherAlert::new(AlertKind::Rain));
    }
    alerts
}
