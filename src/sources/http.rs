//! Shared HTTP client for the fetch adapters

use std::time::{Duration, Instant};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::HttpConfig;
use crate::error::Service;
use crate::{Result, WeatherDashError};

/// Query parameters whose values never reach the logs
const SECRET_PARAMS: [&str; 3] = ["appid", "apikey", "api_key"];

/// One GET per call, JSON in, typed errors out
#[derive(Clone)]
pub struct HttpClient {
    client: ClientWithMiddleware,
}

impl HttpClient {
    /// Build a client from the `http` configuration section
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| WeatherDashError::config(format!("Failed to create HTTP client: {e}")))?;

        let mut middleware = ClientBuilder::new(client);
        if config.max_retries > 0 {
            let policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
            middleware = middleware.with(RetryTransientMiddleware::new_with_policy(policy));
        }

        Ok(Self {
            client: middleware.build(),
        })
    }

    /// Issue a GET and decode the body as `T`.
    ///
    /// Transport failures map to [`WeatherDashError::Network`], non-2xx
    /// statuses to [`WeatherDashError::RemoteService`] and undecodable bodies
    /// to [`WeatherDashError::MalformedResponse`].
    #[instrument(level = "debug", skip(self, url), fields(url = %redact_url(url)))]
    pub async fn get_json<T: DeserializeOwned>(&self, service: Service, url: &str) -> Result<T> {
        let start = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            let message = transport_message(e);
            warn!("{} request failed: {}", service, message);
            WeatherDashError::network(service, message)
        })?;

        let status = response.status();
        debug!("{} answered HTTP {} in {:?}", service, status, start.elapsed());
        if !status.is_success() {
            return Err(WeatherDashError::remote(service, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherDashError::network(service, e.without_url().to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            debug!("Failed to decode {} body: {}", service, e);
            WeatherDashError::malformed(service, e.to_string())
        })
    }
}

/// Error text without the request URL, which carries API keys
fn transport_message(err: reqwest_middleware::Error) -> String {
    match err {
        reqwest_middleware::Error::Reqwest(e) => e.without_url().to_string(),
        other => redact_url(&format!("{other:#}")),
    }
}

/// Replace API key values in a URL's query string with `***`
#[must_use]
pub fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SECRET_PARAMS.contains(&key.to_ascii_lowercase().as_str()) => {
                format!("{key}=***")
            }
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{base}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url_hides_keys() {
        let url = "https://api.example.com/weather?q=Delhi&appid=secret&units=metric";
        assert_eq!(
            redact_url(url),
            "https://api.example.com/weather?q=Delhi&appid=***&units=metric"
        );
        assert_eq!(
            redact_url("https://news.example.com/api?apiKey=abc&q=rain"),
            "https://news.example.com/api?apiKey=***&q=rain"
        );
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let client = HttpClient::new(&HttpConfig::default()).unwrap();

        let err = client
            .get_json::<serde_json::Value>(
                Service::CurrentWeather,
                "http://127.0.0.1:1/data/2.5/weather?q=Delhi&appid=SECRET&units=metric",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherDashError::Network { .. }));
        assert!(!err.to_string().contains("SECRET"));
    }

    #[test]
    fn test_redact_url_inside_error_text() {
        let message = "retries exhausted: error sending request for url (http://x/w?q=Pune&appid=SECRET&units=metric)";
        let redacted = redact_url(message);
        assert!(!redacted.contains("SECRET"));
        assert!(redacted.contains("appid=***"));
    }

    #[test]
    fn test_redact_url_without_query() {
        assert_eq!(redact_url("https://example.com/health"), "https://example.com/health");
    }

    #[test]
    fn test_client_builds_with_retries_and_timeout() {
        let config = HttpConfig {
            timeout_seconds: Some(5),
            max_retries: 2,
            ..HttpConfig::default()
        };
        assert!(HttpClient::new(&config).is_ok());
    }
}
