//! Fetch adapters for the external data sources
//!
//! Each adapter issues one HTTP GET per call, checks the status, and maps the
//! upstream JSON into the crate's models. The traits are the seams the
//! dashboard depends on, so tests can swap in fakes.

mod http;
mod news;
mod open_meteo;
mod openweather;

pub use http::{HttpClient, redact_url};
pub use news::NewsClient;
pub use open_meteo::OpenMeteoClient;
pub use openweather::OpenWeatherClient;

use async_trait::async_trait;

use crate::Result;
use crate::models::{
    AirQuality, CurrentWeather, ForecastEntry, Location, NewsArticle, QuickConditions,
};

/// Current weather, forecast and air quality
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for a free-text city name
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather>;

    /// Forecast steps for a free-text city name, in upstream order
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>>;

    /// Air quality at a coordinate
    async fn air_quality(&self, latitude: f64, longitude: f64) -> Result<AirQuality>;
}

/// Climate news feed
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn latest(&self) -> Result<Vec<NewsArticle>>;
}

/// Keyless geocode-then-current-weather lookup
#[async_trait]
pub trait QuickWeatherProvider: Send + Sync {
    /// First geocoding match for `name`
    async fn geocode(&self, name: &str) -> Result<Location>;

    /// Current temperature and wind at a resolved location
    async fn current_conditions(&self, location: Location) -> Result<QuickConditions>;
}
