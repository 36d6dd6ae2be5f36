//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// Resolved location of a search
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2) or country name, when the source reports one
    pub country_code: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country_code: None,
            latitude,
            longitude,
        }
    }

    /// Create location with country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country_code = Some(country.into());
        self
    }

    /// "Name, Country" or just the name
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.country_code {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}
