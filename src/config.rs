//! Configuration management for the `WeatherDash` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherDashError;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `WeatherDash` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherDashConfig {
    /// OpenWeatherMap settings (current weather, forecast, air pollution)
    pub openweather: OpenWeatherConfig,
    /// Climate news source
    pub news: NewsConfig,
    /// Open-Meteo settings used by the quick lookup
    pub open_meteo: OpenMeteoConfig,
    /// Shared HTTP client behaviour
    pub http: HttpConfig,
    /// Dashboard behaviour
    pub dashboard: DashboardConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// OpenWeatherMap API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherConfig {
    /// API key, required for every OpenWeatherMap call
    pub api_key: Option<String>,
    /// Base URL of the 2.5 data API
    pub base_url: String,
}

/// News API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// API key; news is skipped when absent
    pub api_key: Option<String>,
    pub base_url: String,
    /// Keyword query
    pub query: String,
    pub language: String,
    pub category: String,
    /// Maximum number of articles kept in a bundle
    pub max_articles: usize,
}

/// Open-Meteo API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenMeteoConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds; unset leaves the platform default
    pub timeout_seconds: Option<u64>,
    /// Retries for transient failures; 0 disables retrying
    pub max_retries: u32,
    pub user_agent: String,
}

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// City used when the search input is blank
    pub default_city: String,
    /// Number of upcoming forecast entries to keep
    pub forecast_window: usize,
    /// Include UV, visibility, alerts and sun times
    pub enhanced: bool,
    /// IANA timezone for greetings and clock times; system local time when unset
    pub timezone: Option<String>,
    /// Cities for the quick comparison
    pub compare_cities: Vec<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_openweather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_news_base_url() -> String {
    "https://newsdata.io/api/1/news".to_string()
}

fn default_news_query() -> String {
    "weather india".to_string()
}

fn default_news_language() -> String {
    "en".to_string()
}

fn default_news_category() -> String {
    "environment".to_string()
}

fn default_news_max_articles() -> usize {
    8
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_open_meteo_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_user_agent() -> String {
    format!("WeatherDash/{}", crate::VERSION)
}

fn default_city() -> String {
    "Delhi".to_string()
}

fn default_forecast_window() -> usize {
    6
}

fn default_compare_cities() -> Vec<String> {
    ["Delhi", "Mumbai", "Bangalore", "Chennai"]
        .iter()
        .map(|city| (*city).to_string())
        .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openweather_base_url(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_base_url(),
            query: default_news_query(),
            language: default_news_language(),
            category: default_news_category(),
            max_articles: default_news_max_articles(),
        }
    }
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_open_meteo_forecast_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            max_retries: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            forecast_window: default_forecast_window(),
            enhanced: true,
            timezone: None,
            compare_cities: default_compare_cities(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DashboardConfig {
    /// Parse the configured timezone
    pub fn tz(&self) -> crate::Result<Option<Tz>> {
        match &self.timezone {
            None => Ok(None),
            Some(name) => name.parse::<Tz>().map(Some).map_err(|_| {
                WeatherDashError::config(format!("Unknown timezone '{name}'"))
            }),
        }
    }
}

impl WeatherDashConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERDASH_OPENWEATHER__API_KEY -> openweather.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERDASH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherDashConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherdash").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.openweather.base_url.is_empty() {
            self.openweather.base_url = default_openweather_base_url();
        }
        if self.news.base_url.is_empty() {
            self.news.base_url = default_news_base_url();
        }
        if self.news.max_articles == 0 {
            self.news.max_articles = default_news_max_articles();
        }
        if self.open_meteo.geocoding_url.is_empty() {
            self.open_meteo.geocoding_url = default_geocoding_url();
        }
        if self.open_meteo.forecast_url.is_empty() {
            self.open_meteo.forecast_url = default_open_meteo_forecast_url();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.dashboard.default_city.trim().is_empty() {
            self.dashboard.default_city = default_city();
        }
        if self.dashboard.forecast_window == 0 {
            self.dashboard.forecast_window = default_forecast_window();
        }
        if self.dashboard.compare_cities.is_empty() {
            self.dashboard.compare_cities = default_compare_cities();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys when present
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("OpenWeatherMap", &self.openweather.api_key),
            ("News", &self.news.api_key),
        ];
        for (name, key) in keys {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(WeatherDashError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
                if key.len() > 100 {
                    return Err(WeatherDashError::config(format!(
                        "{name} API key appears to be invalid (too long). Please check your API key."
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if let Some(timeout) = self.http.timeout_seconds {
            if timeout == 0 || timeout > 300 {
                return Err(WeatherDashError::config(
                    "HTTP timeout must be between 1 and 300 seconds",
                )
                .into());
            }
        }

        if self.http.max_retries > 10 {
            return Err(WeatherDashError::config("HTTP max retries cannot exceed 10").into());
        }

        if self.dashboard.forecast_window > 40 {
            return Err(WeatherDashError::config(
                "Forecast window cannot exceed 40 entries (5 days of 3-hour steps)",
            )
            .into());
        }

        if self.news.max_articles > 50 {
            return Err(WeatherDashError::config("News max articles cannot exceed 50").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherDashError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherDashError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("OpenWeatherMap", &self.openweather.base_url),
            ("News", &self.news.base_url),
            ("Geocoding", &self.open_meteo.geocoding_url),
            ("Open-Meteo", &self.open_meteo.forecast_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherDashError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        self.dashboard.tz()?;

        Ok(())
    }
}
