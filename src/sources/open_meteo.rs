//! Open-Meteo geocoding and current weather, no API key required

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{info, instrument};

use super::{HttpClient, QuickWeatherProvider};
use crate::config::OpenMeteoConfig;
use crate::error::Service;
use crate::models::{Location, QuickConditions};
use crate::{Result, WeatherDashError};

pub struct OpenMeteoClient {
    http: HttpClient,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    #[must_use]
    pub fn new(http: HttpClient, config: &OpenMeteoConfig) -> Self {
        Self {
            http,
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl QuickWeatherProvider for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Location> {
        let url = format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(name)
        );
        let response: openmeteo::GeocodingResponse =
            self.http.get_json(Service::Geocoding, &url).await?;

        let location: Location = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| {
                WeatherDashError::malformed(Service::Geocoding, format!("no results for '{name}'"))
            })?;

        info!("Geocoded '{}' to {}", name, location.display_name());
        Ok(location)
    }

    #[instrument(skip(self, location), fields(location = %location.display_name()))]
    async fn current_conditions(&self, location: Location) -> Result<QuickConditions> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current_weather=true",
            self.forecast_url, location.latitude, location.longitude
        );
        let response: openmeteo::ForecastResponse =
            self.http.get_json(Service::CurrentWeather, &url).await?;

        let current = response.current_weather.ok_or_else(|| {
            WeatherDashError::malformed(Service::CurrentWeather, "No current weather available")
        })?;

        Ok(QuickConditions {
            location,
            temperature_c: current.temperature,
            wind_speed_kmh: current.windspeed,
            observed_at: current
                .time
                .as_deref()
                .and_then(|time| NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M").ok()),
        })
    }
}

/// `OpenMeteo` API response structures
mod openmeteo {
    use super::Location;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
    }

    impl From<GeocodingResult> for Location {
        fn from(result: GeocodingResult) -> Self {
            let location = Location::new(result.name, result.latitude, result.longitude);
            match result.country {
                Some(country) => location.with_country(country),
                None => location,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current_weather: Option<CurrentWeatherBlock>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherBlock {
        pub temperature: f64,
        pub windspeed: f64,
        pub time: Option<String>,
    }
}
