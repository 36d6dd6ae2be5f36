//! Render-ready search results

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AirQuality, CurrentConditions, ForecastEntry, Location, NewsArticle};
use crate::derivations::{
    AqiInfo, Greeting, NEUTRAL_COLOR, Scene, UvEstimate, VisibilityReport, WeatherAlert,
    aqi_info, is_night, temperature_color, weather_alerts, weather_advice,
};

/// The aggregated result of one search
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherBundle {
    pub location: Location,
    pub current: CurrentConditions,
    /// Upcoming entries only, chronological
    pub forecast: Vec<ForecastEntry>,
    pub air_quality: AirQuality,
    pub news: Vec<NewsArticle>,
    pub insights: Insights,
    pub generated_at: DateTime<Utc>,
}

/// Values derived from the raw conditions
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Insights {
    pub greeting: Greeting,
    pub advice: String,
    pub is_night: bool,
    pub aqi: AqiInfo,
    pub temperature_color: String,
    pub scene: Scene,
    /// Present when the dashboard runs with enhanced details
    pub details: Option<AdvancedDetails>,
}

/// UV, visibility, alerts and sun times
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdvancedDetails {
    pub uv: UvEstimate,
    pub visibility: VisibilityReport,
    pub alerts: Vec<WeatherAlert>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

impl Insights {
    /// Derive the base insights for `conditions` at `now`
    #[must_use]
    pub fn derive(
        conditions: &CurrentConditions,
        air_quality: &AirQuality,
        now: DateTime<Utc>,
        local_hour: u32,
    ) -> Self {
        let night = is_night(now, conditions.sunrise, conditions.sunset, local_hour);
        Self {
            greeting: Greeting::for_hour(local_hour),
            advice: weather_advice(&conditions.condition_main).to_string(),
            is_night: night,
            aqi: aqi_info(air_quality.aqi_level),
            temperature_color: temperature_color(conditions.temperature_c).to_string(),
            scene: Scene::classify(&conditions.condition_main, conditions.wind_speed_ms, night),
            details: None,
        }
    }

    /// Add the advanced details on top of the base insights
    #[must_use]
    pub fn with_details(mut self, conditions: &CurrentConditions, local_hour: u32) -> Self {
        self.details = Some(AdvancedDetails::derive(conditions, local_hour));
        self
    }
}

impl AdvancedDetails {
    #[must_use]
    pub fn derive(conditions: &CurrentConditions, local_hour: u32) -> Self {
        Self {
            uv: UvEstimate::estimate(local_hour, &conditions.condition_main),
            visibility: VisibilityReport::from_meters(conditions.visibility_m),
            alerts: weather_alerts(conditions),
            sunrise: conditions.sunrise_time(),
            sunset: conditions.sunset_time(),
        }
    }
}

/// Result of the geocode-then-current-weather lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuickConditions {
    pub location: Location,
    pub temperature_c: f64,
    /// Wind speed in km/h as reported by Open-Meteo
    pub wind_speed_kmh: f64,
    /// Observation time in the location's local clock
    pub observed_at: Option<NaiveDateTime>,
}

/// One row of the multi-city comparison
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityTemperature {
    pub city: String,
    /// `None` when the city could not be fetched
    pub temperature_c: Option<f64>,
    pub color: String,
}

impl CityTemperature {
    #[must_use]
    pub fn available(city: impl Into<String>, temperature_c: f64) -> Self {
        Self {
            city: city.into(),
            temperature_c: Some(temperature_c),
            color: temperature_color(temperature_c).to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            temperature_c: None,
            color: NEUTRAL_COLOR.to_string(),
        }
    }

    /// Rounded "31°C" or "N/A"
    #[must_use]
    pub fn format_temperature(&self) -> String {
        match self.temperature_c {
            Some(temp) => format!("{}°C", temp.round()),
            None => "N/A".to_string(),
        }
    }
}
