//! Error types and handling for the `WeatherDash` application

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Upstream service an adapter talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Geocoding,
    CurrentWeather,
    Forecast,
    AirPollution,
    News,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Geocoding => "Geocoding API",
            Service::CurrentWeather => "Weather API",
            Service::Forecast => "Forecast API",
            Service::AirPollution => "Air pollution API",
            Service::News => "News API",
        };
        f.write_str(name)
    }
}

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    RemoteService,
    MalformedResponse,
    Network,
    Config,
    Validation,
    Io,
}

/// Serialized error payload: `{"code": ..., "message": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
}

impl From<&WeatherDashError> for ErrorBody {
    fn from(error: &WeatherDashError) -> Self {
        Self {
            code: error.code(),
            message: error.user_message(),
            service: error.service(),
        }
    }
}

/// Main error type for the `WeatherDash` application
#[derive(Error, Debug)]
pub enum WeatherDashError {
    /// Upstream answered with a non-success HTTP status
    #[error("{service} error: HTTP {status_code}")]
    RemoteService { service: Service, status_code: u16 },

    /// Upstream answered 2xx but the body lacks the fields we need
    #[error("{service} returned a malformed response: {message}")]
    MalformedResponse { service: Service, message: String },

    /// The request never produced a response
    #[error("{service} request failed: {message}")]
    Network { service: Service, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherDashError {
    pub fn remote(service: Service, status_code: u16) -> Self {
        Self::RemoteService {
            service,
            status_code,
        }
    }

    pub fn malformed<S: Into<String>>(service: Service, message: S) -> Self {
        Self::MalformedResponse {
            service,
            message: message.into(),
        }
    }

    pub fn network<S: Into<String>>(service: Service, message: S) -> Self {
        Self::Network {
            service,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            WeatherDashError::RemoteService { .. } => ErrorCode::RemoteService,
            WeatherDashError::MalformedResponse { .. } => ErrorCode::MalformedResponse,
            WeatherDashError::Network { .. } => ErrorCode::Network,
            WeatherDashError::Config { .. } => ErrorCode::Config,
            WeatherDashError::Validation { .. } => ErrorCode::Validation,
            WeatherDashError::Io { .. } => ErrorCode::Io,
        }
    }

    /// The upstream service involved, if any
    #[must_use]
    pub fn service(&self) -> Option<Service> {
        match self {
            WeatherDashError::RemoteService { service, .. }
            | WeatherDashError::MalformedResponse { service, .. }
            | WeatherDashError::Network { service, .. } => Some(*service),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherDashError::RemoteService {
                status_code: 404, ..
            } => {
                "Location not found. Make sure you entered a valid city name.".to_string()
            }
            WeatherDashError::RemoteService { .. } | WeatherDashError::MalformedResponse { .. } => {
                "Unable to fetch weather data. Please try again later.".to_string()
            }
            WeatherDashError::Network { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            WeatherDashError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            WeatherDashError::Validation { message } => format!("Invalid input: {message}"),
            WeatherDashError::Io { .. } => {
                "Output failed. Please check file permissions.".to_string()
            }
        }
    }
}
