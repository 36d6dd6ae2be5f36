use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::dashboard::DashboardService;
use crate::error::ErrorBody;
use crate::models::{CityTemperature, QuickConditions, WeatherBundle};
use crate::session::{FavoriteCity, Session};
use crate::{VERSION, WeatherDashError};

/// Shared by every handler. The session is a single dashboard context, so the
/// most recently completed search wins.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(service: DashboardService) -> Self {
        Self {
            service: Arc::new(service),
            session: Arc::new(Mutex::new(Session::new())),
        }
    }
}

/// [`WeatherDashError`] as an HTTP response with a `{code, message}` body
pub struct ApiError(WeatherDashError);

impl From<WeatherDashError> for ApiError {
    fn from(error: WeatherDashError) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            WeatherDashError::RemoteService {
                status_code: 404, ..
            } => StatusCode::NOT_FOUND,
            WeatherDashError::RemoteService { .. }
            | WeatherDashError::MalformedResponse { .. }
            | WeatherDashError::Network { .. } => StatusCode::BAD_GATEWAY,
            WeatherDashError::Validation { .. } => StatusCode::BAD_REQUEST,
            WeatherDashError::Config { .. } | WeatherDashError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Request failed with {}: {}", status, self.0);
        (status, Json(ErrorBody::from(&self.0))).into_response()
    }
}

#[derive(Deserialize)]
pub struct CityQuery {
    #[serde(default)]
    pub city: String,
}

#[derive(Deserialize)]
pub struct CompareQuery {
    /// Comma-separated city names
    pub cities: Option<String>,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct FavoriteToggle {
    pub favorite: bool,
    pub favorites: Vec<FavoriteCity>,
}

#[derive(Serialize)]
pub struct ShareText {
    pub text: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(get_weather))
        .route("/quick", get(get_quick))
        .route("/compare", get(get_compare))
        .route("/favorites", get(get_favorites))
        .route("/favorites/toggle", post(toggle_favorite))
        .route("/share", get(get_share))
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: VERSION,
    })
}

async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<WeatherBundle>, ApiError> {
    let bundle = state.service.search(&query.city).await?;
    state.session.lock().await.set_current(bundle.clone());
    Ok(Json(bundle))
}

async fn get_quick(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<QuickConditions>, ApiError> {
    Ok(Json(state.service.quick_lookup(&query.city).await?))
}

async fn get_compare(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Json<Vec<CityTemperature>> {
    let cities: Vec<String> = query
        .cities
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .map(ToString::to_string)
        .collect();
    Json(state.service.compare(&cities).await)
}

async fn get_favorites(State(state): State<AppState>) -> Json<Vec<FavoriteCity>> {
    Json(state.session.lock().await.favorites().to_vec())
}

async fn toggle_favorite(State(state): State<AppState>) -> Result<Json<FavoriteToggle>, ApiError> {
    let mut session = state.session.lock().await;
    let favorite = session.toggle_current_favorite(Utc::now())?;
    Ok(Json(FavoriteToggle {
        favorite,
        favorites: session.favorites().to_vec(),
    }))
}

async fn get_share(State(state): State<AppState>) -> Result<Json<ShareText>, ApiError> {
    let text = state.session.lock().await.share_text().ok_or_else(|| {
        WeatherDashError::validation("No weather data to share. Search for a city first!")
    })?;
    Ok(Json(ShareText { text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Service;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (WeatherDashError::remote(Service::CurrentWeather, 404), StatusCode::NOT_FOUND),
            (WeatherDashError::remote(Service::Forecast, 500), StatusCode::BAD_GATEWAY),
            (WeatherDashError::malformed(Service::Geocoding, "empty"), StatusCode::BAD_GATEWAY),
            (WeatherDashError::network(Service::News, "reset"), StatusCode::BAD_GATEWAY),
            (WeatherDashError::validation("no data"), StatusCode::BAD_REQUEST),
            (WeatherDashError::config("no key"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }
}
