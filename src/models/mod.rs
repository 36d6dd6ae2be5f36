//! Data models for the WeatherDash application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and metadata
//! - Weather: Current conditions as reported by the weather source
//! - Forecast: Upcoming forecast entries and the future-window filter
//! - Air quality and news: optional sources with graceful fallbacks
//! - Bundle: the render-ready result of one search

pub mod air_quality;
pub mod bundle;
pub mod forecast;
pub mod location;
pub mod news;
pub mod weather;

// Re-export all public types for convenient access
pub use air_quality::AirQuality;
pub use bundle::{
    AdvancedDetails, CityTemperature, Insights, QuickConditions, WeatherBundle,
};
pub use forecast::{ForecastEntry, upcoming_forecast};
pub use location::Location;
pub use news::NewsArticle;
pub use weather::{CurrentConditions, CurrentWeather};
