//! Aggregation orchestrator
//!
//! Fans out to the weather, forecast and news sources concurrently, then
//! fetches air quality for the resolved coordinates. Weather and forecast are
//! mandatory: their failure aborts the search. News and air quality degrade to
//! an empty list and the unknown sentinel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use crate::{Result, WeatherDashError};
use crate::config::{DashboardConfig, WeatherDashConfig};
use crate::derivations::local_hour;
use crate::models::{
    AirQuality, CityTemperature, Insights, QuickConditions, WeatherBundle, upcoming_forecast,
};
use crate::sources::{
    HttpClient, NewsClient, NewsProvider, OpenMeteoClient, OpenWeatherClient,
    QuickWeatherProvider, WeatherProvider,
};

const DEFAULT_MAX_ARTICLES: usize = 8;

pub struct DashboardService {
    weather: Arc<dyn WeatherProvider>,
    news: Arc<dyn NewsProvider>,
    quick: Arc<dyn QuickWeatherProvider>,
    settings: DashboardConfig,
    max_articles: usize,
    tz: Option<Tz>,
}

impl DashboardService {
    /// Assemble a service from explicit providers
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        news: Arc<dyn NewsProvider>,
        quick: Arc<dyn QuickWeatherProvider>,
        settings: DashboardConfig,
    ) -> Result<Self> {
        let tz = settings.tz()?;
        Ok(Self {
            weather,
            news,
            quick,
            settings,
            max_articles: DEFAULT_MAX_ARTICLES,
            tz,
        })
    }

    /// Wire the real HTTP adapters from configuration.
    ///
    /// Without an OpenWeatherMap key only `quick_lookup` can succeed.
    pub fn from_config(config: &WeatherDashConfig) -> Result<Self> {
        let http = HttpClient::new(&config.http)?;
        let weather = OpenWeatherClient::new(http.clone(), &config.openweather);
        let news = NewsClient::new(http.clone(), config.news.clone());
        let quick = OpenMeteoClient::new(http, &config.open_meteo);

        Ok(Self::new(
            Arc::new(weather),
            Arc::new(news),
            Arc::new(quick),
            config.dashboard.clone(),
        )?
        .with_max_articles(config.news.max_articles))
    }

    #[must_use]
    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &DashboardConfig {
        &self.settings
    }

    /// Timezone used for greetings and clock times
    #[must_use]
    pub fn timezone(&self) -> Option<Tz> {
        self.tz
    }

    /// Blank input falls back to the default city
    fn resolve_city<'a>(&'a self, input: &'a str) -> &'a str {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.settings.default_city.as_str()
        } else {
            trimmed
        }
    }

    /// Build a bundle for `city` as of now
    pub async fn search(&self, city: &str) -> Result<WeatherBundle> {
        self.search_at(city, Utc::now()).await
    }

    /// Build a bundle for `city`, treating `now` as the fetch time
    #[instrument(skip(self, now))]
    pub async fn search_at(&self, city: &str, now: DateTime<Utc>) -> Result<WeatherBundle> {
        let city = self.resolve_city(city);
        info!("Searching weather for {}", city);

        let (weather, forecast, news) = tokio::join!(
            self.weather.current_weather(city),
            self.weather.forecast(city),
            self.news.latest()
        );

        let weather = weather.inspect_err(|e| error!("Current weather for {} failed: {}", city, e))?;
        let forecast = forecast.inspect_err(|e| error!("Forecast for {} failed: {}", city, e))?;

        let mut news = news.unwrap_or_else(|e| {
            warn!("News unavailable, continuing without it: {}", e);
            Vec::new()
        });
        news.truncate(self.max_articles);

        let location = weather.location;
        let conditions = weather.conditions;

        let air_quality = self
            .weather
            .air_quality(location.latitude, location.longitude)
            .await
            .unwrap_or_else(|e| {
                warn!("Air quality unavailable for {}: {}", location.name, e);
                AirQuality::unknown()
            });

        let hour = local_hour(now, self.tz);
        let mut insights = Insights::derive(&conditions, &air_quality, now, hour);
        if self.settings.enhanced {
            insights = insights.with_details(&conditions, hour);
        }

        let forecast = upcoming_forecast(forecast, now, self.settings.forecast_window);
        info!(
            "Built bundle for {}: {} forecast entries, {} articles, AQI {}",
            location.display_name(),
            forecast.len(),
            news.len(),
            insights.aqi.label
        );

        Ok(WeatherBundle {
            location,
            current: conditions,
            forecast,
            air_quality,
            news,
            insights,
            generated_at: now,
        })
    }

    /// Geocode then fetch Open-Meteo current weather; both steps are mandatory.
    /// Unlike `search`, blank input is rejected rather than defaulted.
    #[instrument(skip(self))]
    pub async fn quick_lookup(&self, city: &str) -> Result<QuickConditions> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherDashError::validation("Please enter a city name"));
        }
        let location = self.quick.geocode(city).await?;
        self.quick.current_conditions(location).await
    }

    /// Current temperature for several cities; an empty list means the
    /// configured comparison cities. Failed cities come back unavailable.
    #[instrument(skip(self))]
    pub async fn compare(&self, cities: &[String]) -> Vec<CityTemperature> {
        let cities = if cities.is_empty() {
            self.settings.compare_cities.as_slice()
        } else {
            cities
        };

        join_all(cities.iter().map(|city| async move {
            match self.weather.current_weather(city).await {
                Ok(weather) => CityTemperature::available(city, weather.conditions.temperature_c),
                Err(e) => {
                    warn!("Comparison temperature for {} unavailable: {}", city, e);
                    CityTemperature::unavailable(city)
                }
            }
        }))
        .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory providers for orchestrator tests

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use crate::error::Service;
    use crate::models::weather::sample_conditions;
    use crate::models::{
        AirQuality, CurrentWeather, ForecastEntry, Location, NewsArticle, QuickConditions,
    };
    use crate::sources::{NewsProvider, QuickWeatherProvider, WeatherProvider};
    use crate::{Result, WeatherDashError};

    pub struct FakeWeather {
        pub current_status: Option<u16>,
        pub forecast_status: Option<u16>,
        pub air_fails: bool,
        pub forecast_base: DateTime<Utc>,
        pub air_calls: AtomicUsize,
    }

    impl FakeWeather {
        pub fn new(forecast_base: DateTime<Utc>) -> Self {
            Self {
                current_status: None,
                forecast_status: None,
                air_fails: false,
                forecast_base,
                air_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn current_weather(&self, city: &str) -> Result<CurrentWeather> {
            if city == "Atlantis" {
                return Err(WeatherDashError::remote(Service::CurrentWeather, 404));
            }
            if let Some(status) = self.current_status {
                return Err(WeatherDashError::remote(Service::CurrentWeather, status));
            }
            let mut conditions = sample_conditions();
            if city == "Chennai" {
                conditions.temperature_c = 35.4;
            }
            Ok(CurrentWeather {
                location: Location::new(city, 28.6, 77.2).with_country("IN"),
                conditions,
            })
        }

        async fn forecast(&self, _city: &str) -> Result<Vec<ForecastEntry>> {
            if let Some(status) = self.forecast_status {
                return Err(WeatherDashError::remote(Service::Forecast, status));
            }
            // One past step, then eight upcoming three-hour steps
            Ok((-1..=8)
                .map(|step| ForecastEntry {
                    timestamp: self.forecast_base + Duration::hours(3 * step),
                    temperature_c: 30.0 + step as f64,
                    condition_main: "Clear".to_string(),
                    condition_description: "clear sky".to_string(),
                    icon_id: "01d".to_string(),
                })
                .collect())
        }

        async fn air_quality(&self, _latitude: f64, _longitude: f64) -> Result<AirQuality> {
            self.air_calls.fetch_add(1, Ordering::SeqCst);
            if self.air_fails {
                return Err(WeatherDashError::remote(Service::AirPollution, 500));
            }
            Ok(AirQuality {
                aqi_level: Some(3),
                pm25: 55.0,
                pm10: 80.0,
            })
        }
    }

    pub struct FakeNews {
        pub fails: bool,
        pub count: usize,
    }

    #[async_trait]
    impl NewsProvider for FakeNews {
        async fn latest(&self) -> Result<Vec<NewsArticle>> {
            if self.fails {
                return Err(WeatherDashError::remote(Service::News, 429));
            }
            Ok((0..self.count)
                .map(|i| NewsArticle {
                    title: format!("Story {i}"),
                    description: "Monsoon arrives early".to_string(),
                    url: Some(format!("https://news.test/{i}")),
                    published_at: Utc::now(),
                })
                .collect())
        }
    }

    pub struct FakeQuick;

    #[async_trait]
    impl QuickWeatherProvider for FakeQuick {
        async fn geocode(&self, name: &str) -> Result<Location> {
            if name == "Atlantis" {
                return Err(WeatherDashError::malformed(
                    Service::Geocoding,
                    format!("no results for '{name}'"),
                ));
            }
            Ok(Location::new(name, 19.07, 72.88).with_country("India"))
        }

        async fn current_conditions(&self, location: Location) -> Result<QuickConditions> {
            Ok(QuickConditions {
                location,
                temperature_c: 29.5,
                wind_speed_kmh: 14.0,
                observed_at: None,
            })
        }
    }
}
