//! Application session: the last search result and the favorites list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dashboard::DashboardService;
use crate::models::{CurrentConditions, WeatherBundle};
use crate::{Result, WeatherDashError};

/// A saved city, in the flat shape the dashboard has always stored
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCity {
    pub name: String,
    /// Temperature in Celsius when last updated
    pub temp: f64,
    /// Condition group, e.g. "Clear"
    pub condition: String,
    pub icon: String,
    pub last_updated: DateTime<Utc>,
}

/// Per-user state shared by the render and action handlers.
///
/// Searches are not cancelled when a newer one starts; whichever completes
/// last becomes `current`.
#[derive(Debug, Default, Clone)]
pub struct Session {
    current: Option<WeatherBundle>,
    favorites: Vec<FavoriteCity>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a search and keep the result; on failure the previous result stays
    pub async fn search(&mut self, service: &DashboardService, city: &str) -> Result<&WeatherBundle> {
        let bundle = service.search(city).await?;
        Ok(self.set_current(bundle))
    }

    /// Replace the current result
    pub fn set_current(&mut self, bundle: WeatherBundle) -> &WeatherBundle {
        debug!("Session now shows {}", bundle.location.display_name());
        self.current.insert(bundle)
    }

    #[must_use]
    pub fn current(&self) -> Option<&WeatherBundle> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn favorites(&self) -> &[FavoriteCity] {
        &self.favorites
    }

    /// Case-insensitive favorite check
    #[must_use]
    pub fn is_favorite(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.favorites
            .iter()
            .position(|city| city.name.eq_ignore_ascii_case(name))
    }

    /// Add a city or refresh an existing entry's temperature and condition
    pub fn add_favorite(
        &mut self,
        name: &str,
        conditions: &CurrentConditions,
        now: DateTime<Utc>,
    ) -> &FavoriteCity {
        let index = match self.position(name) {
            Some(index) => {
                let existing = &mut self.favorites[index];
                existing.temp = conditions.temperature_c;
                existing.condition = conditions.condition_main.clone();
                existing.last_updated = now;
                index
            }
            None => {
                self.favorites.push(FavoriteCity {
                    name: name.to_string(),
                    temp: conditions.temperature_c,
                    condition: conditions.condition_main.clone(),
                    icon: conditions.icon_id.clone(),
                    last_updated: now,
                });
                info!("❤️ {} added to favorites!", name);
                self.favorites.len() - 1
            }
        };
        &self.favorites[index]
    }

    /// Remove a city; returns whether anything was removed
    pub fn remove_favorite(&mut self, name: &str) -> bool {
        let before = self.favorites.len();
        self.favorites
            .retain(|city| !city.name.eq_ignore_ascii_case(name));
        let removed = self.favorites.len() != before;
        if removed {
            info!("Removed {} from favorites", name);
        }
        removed
    }

    /// Toggle the current city in the favorites list.
    ///
    /// Returns `true` when the city is a favorite afterwards.
    pub fn toggle_current_favorite(&mut self, now: DateTime<Utc>) -> Result<bool> {
        let Some(bundle) = self.current.as_ref() else {
            return Err(WeatherDashError::validation(
                "No weather data to favorite. Search for a city first!",
            ));
        };
        let name = bundle.location.name.clone();
        let conditions = bundle.current.clone();

        if self.is_favorite(&name) {
            self.remove_favorite(&name);
            Ok(false)
        } else {
            self.add_favorite(&name, &conditions, now);
            Ok(true)
        }
    }

    /// Plain-text summary of the current result for sharing
    #[must_use]
    pub fn share_text(&self) -> Option<String> {
        self.current.as_ref().map(share_text)
    }
}

/// Shareable summary of a bundle
#[must_use]
pub fn share_text(bundle: &WeatherBundle) -> String {
    let current = &bundle.current;
    format!(
        "🌦️ Weather in {}:\n🌡️ {}°C - {}\n💧 Humidity: {}%\n🌬️ Wind: {} m/s\n\nPowered by WeatherIndia 🇮🇳",
        bundle.location.name,
        current.temperature_c.round(),
        current.condition_description,
        current.humidity_pct,
        current.wind_speed_ms
    )
}
