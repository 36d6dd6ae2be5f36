//! `WeatherDash` - weather, air quality and climate news for any city
//!
//! This library fans out to the weather, forecast, news and air pollution
//! sources, reconciles partial failures, and derives the presentation values
//! (greeting, advice, AQI label, scene, UV, visibility, alerts) that the
//! terminal, JSON and HTTP render targets display.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod derivations;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
pub mod session;
pub mod sources;
pub mod web;

// Re-export core types for public API
pub use config::WeatherDashConfig;
pub use dashboard::DashboardService;
pub use error::{ErrorCode, Service, WeatherDashError};
pub use models::{AirQuality, ForecastEntry, Location, NewsArticle, WeatherBundle};
pub use render::{JsonRenderer, RenderTarget, TerminalRenderer};
pub use session::{FavoriteCity, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherDashError>;
