//! Air quality model

use serde::{Deserialize, Serialize};

/// Air quality at a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQuality {
    /// AQI category (1-5) as reported; `None` when unknown
    pub aqi_level: Option<u8>,
    /// PM2.5 concentration in µg/m³
    pub pm25: f64,
    /// PM10 concentration in µg/m³
    pub pm10: f64,
}

impl AirQuality {
    /// Sentinel used when the source fails or reports nothing
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            aqi_level: None,
            pm25: 0.0,
            pm10: 0.0,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.aqi_level.is_none()
    }

    /// Level as displayed; 0 when unknown
    #[must_use]
    pub fn display_level(&self) -> u8 {
        self.aqi_level.unwrap_or(0)
    }
}

impl Default for AirQuality {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let air = AirQuality::unknown();
        assert!(air.is_unknown());
        assert_eq!(air.display_level(), 0);
        assert_eq!(air, AirQuality::default());
    }
}
