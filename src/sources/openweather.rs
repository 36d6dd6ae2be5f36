//! OpenWeatherMap 2.5 client: current weather, forecast and air pollution

use async_trait::async_trait;
use chrono::DateTime;
use tracing::{info, instrument};

use super::{HttpClient, WeatherProvider};
use crate::config::OpenWeatherConfig;
use crate::error::Service;
use crate::models::{
    AirQuality, CurrentConditions, CurrentWeather, ForecastEntry, Location,
};
use crate::{Result, WeatherDashError};

pub struct OpenWeatherClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    #[must_use]
    pub fn new(http: HttpClient, config: &OpenWeatherConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Every call needs a key; a missing one fails before any request is made
    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            WeatherDashError::config(
                "OpenWeatherMap API key is missing. Set openweather.api_key or WEATHERDASH_OPENWEATHER__API_KEY",
            )
        })
    }

    fn city_url(&self, endpoint: &str, city: &str) -> Result<String> {
        Ok(format!(
            "{}/{}?q={}&appid={}&units=metric",
            self.base_url,
            endpoint,
            urlencoding::encode(city),
            self.api_key()?
        ))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather> {
        let url = self.city_url("weather", city)?;
        let response: raw::CurrentResponse = self.http.get_json(Service::CurrentWeather, &url).await?;
        let weather = CurrentWeather::try_from(response)?;
        info!(
            "Current weather for {}: {}",
            weather.location.display_name(),
            weather.conditions.format_temperature()
        );
        Ok(weather)
    }

    #[instrument(skip(self))]
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>> {
        let url = self.city_url("forecast", city)?;
        let response: raw::ForecastResponse = self.http.get_json(Service::Forecast, &url).await?;
        response.into_entries()
    }

    #[instrument(skip(self))]
    async fn air_quality(&self, latitude: f64, longitude: f64) -> Result<AirQuality> {
        let url = format!(
            "{}/air_pollution?lat={}&lon={}&appid={}",
            self.base_url,
            latitude,
            longitude,
            self.api_key()?
        );
        let response: raw::AirPollutionResponse =
            self.http.get_json(Service::AirPollution, &url).await?;
        Ok(response.into())
    }
}

/// OpenWeatherMap response structures and conversion utilities
mod raw {
    use super::{
        AirQuality, CurrentConditions, CurrentWeather, DateTime, ForecastEntry, Location, Result,
        Service, WeatherDashError,
    };
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub name: String,
        pub coord: Coord,
        pub main: MainBlock,
        pub weather: Vec<ConditionBlock>,
        #[serde(default)]
        pub wind: Wind,
        #[serde(default)]
        pub clouds: Clouds,
        pub visibility: Option<u32>,
        pub sys: Option<Sys>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Coord {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainBlock {
        pub temp: f64,
        pub feels_like: Option<f64>,
        pub humidity: u8,
        #[serde(default)]
        pub pressure: u32,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct ConditionBlock {
        pub main: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub icon: String,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Wind {
        #[serde(default)]
        pub speed: f64,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Clouds {
        #[serde(default)]
        pub all: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct Sys {
        pub country: Option<String>,
        pub sunrise: Option<i64>,
        pub sunset: Option<i64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastItem>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastItem {
        pub dt: i64,
        pub main: ForecastMain,
        #[serde(default)]
        pub weather: Vec<ConditionBlock>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastMain {
        pub temp: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionResponse {
        #[serde(default)]
        pub list: Vec<AirItem>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirItem {
        pub main: AqiMain,
        #[serde(default)]
        pub components: Components,
    }

    #[derive(Debug, Deserialize)]
    pub struct AqiMain {
        pub aqi: u8,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Components {
        #[serde(default)]
        pub pm2_5: f64,
        #[serde(default)]
        pub pm10: f64,
    }

    impl TryFrom<CurrentResponse> for CurrentWeather {
        type Error = WeatherDashError;

        fn try_from(response: CurrentResponse) -> Result<Self> {
            let condition = response.weather.into_iter().next().ok_or_else(|| {
                WeatherDashError::malformed(Service::CurrentWeather, "weather list is empty")
            })?;

            let mut location = Location::new(response.name, response.coord.lat, response.coord.lon);
            let (sunrise, sunset) = match response.sys {
                Some(sys) => {
                    if let Some(country) = sys.country {
                        location = location.with_country(country);
                    }
                    (sys.sunrise, sys.sunset)
                }
                None => (None, None),
            };

            let conditions = CurrentConditions {
                temperature_c: response.main.temp,
                feels_like_c: response.main.feels_like.unwrap_or(response.main.temp),
                humidity_pct: response.main.humidity,
                pressure_hpa: response.main.pressure,
                wind_speed_ms: response.wind.speed,
                cloudiness_pct: response.clouds.all,
                visibility_m: response.visibility,
                condition_main: condition.main,
                condition_description: condition.description,
                icon_id: condition.icon,
                sunrise,
                sunset,
            };

            Ok(CurrentWeather {
                location,
                conditions,
            })
        }
    }

    impl ForecastResponse {
        pub fn into_entries(self) -> Result<Vec<ForecastEntry>> {
            self.list
                .into_iter()
                .map(|item| {
                    let timestamp = DateTime::from_timestamp(item.dt, 0).ok_or_else(|| {
                        WeatherDashError::malformed(
                            Service::Forecast,
                            format!("timestamp {} out of range", item.dt),
                        )
                    })?;
                    let condition = item.weather.into_iter().next().unwrap_or_default();
                    Ok(ForecastEntry {
                        timestamp,
                        temperature_c: item.main.temp,
                        condition_main: condition.main,
                        condition_description: condition.description,
                        icon_id: condition.icon,
                    })
                })
                .collect()
        }
    }

    impl From<AirPollutionResponse> for AirQuality {
        fn from(response: AirPollutionResponse) -> Self {
            match response.list.into_iter().next() {
                Some(item) => AirQuality {
                    aqi_level: Some(item.main.aqi).filter(|level| (1..=5).contains(level)),
                    pm25: item.components.pm2_5,
                    pm10: item.components.pm10,
                },
                None => AirQuality::unknown(),
            }
        }
    }
}
