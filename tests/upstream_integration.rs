//! End-to-end tests against a local fake of every upstream API

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use weatherdash::{
    DashboardService, RenderTarget, Service, TerminalRenderer, WeatherDashConfig, WeatherDashError,
    web,
};

const API_KEY: &str = "test-key";

#[derive(Default)]
struct Upstream {
    forecast_status: Option<u16>,
    news_status: Option<u16>,
    air_status: Option<u16>,
    weather_body: Option<Value>,
    forecast_body: Option<Value>,
    air_body: Option<Value>,
}

type Shared = Arc<Upstream>;
type Reply = (StatusCode, Json<Value>);
type Params = Query<HashMap<String, String>>;

fn failure(status: Option<u16>) -> Option<Reply> {
    status.map(|code| {
        (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({"message": "upstream failure"})),
        )
    })
}

fn unauthorized(params: &HashMap<String, String>, key_param: &str) -> Option<Reply> {
    (params.get(key_param).map(String::as_str) != Some(API_KEY))
        .then(|| (StatusCode::UNAUTHORIZED, Json(json!({"cod": 401}))))
}

async fn weather(State(upstream): State<Shared>, Query(params): Params) -> Reply {
    if let Some(reply) = unauthorized(&params, "appid") {
        return reply;
    }
    if let Some(body) = &upstream.weather_body {
        return (StatusCode::OK, Json(body.clone()));
    }
    if params.get("q").map(String::as_str) == Some("Atlantis") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"cod": "404", "message": "city not found"})),
        );
    }
    assert_eq!(params.get("units").map(String::as_str), Some("metric"));

    (
        StatusCode::OK,
        Json(json!({
            "coord": {"lon": 77.2, "lat": 28.6},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 32.1, "feels_like": 31.0, "humidity": 40, "pressure": 1008},
            "visibility": 10000,
            "wind": {"speed": 3.0},
            "clouds": {"all": 0},
            "sys": {"country": "IN", "sunrise": 1700000000, "sunset": 1700030000},
            "name": params.get("q").cloned().unwrap_or_default()
        })),
    )
}

async fn forecast(State(upstream): State<Shared>, Query(params): Params) -> Reply {
    if let Some(reply) = unauthorized(&params, "appid") {
        return reply;
    }
    if let Some(reply) = failure(upstream.forecast_status) {
        return reply;
    }
    if let Some(body) = &upstream.forecast_body {
        return (StatusCode::OK, Json(body.clone()));
    }
    let now = Utc::now();
    let list: Vec<Value> = (-1..=8)
        .map(|step| {
            json!({
                "dt": (now + Duration::hours(3 * step)).timestamp(),
                "main": {"temp": 30.0 + step as f64},
                "weather": [{"main": "Clouds", "description": "few clouds", "icon": "02d"}]
            })
        })
        .collect();
    (StatusCode::OK, Json(json!({"cnt": list.len(), "list": list})))
}

async fn air_pollution(State(upstream): State<Shared>, Query(params): Params) -> Reply {
    if let Some(reply) = unauthorized(&params, "appid") {
        return reply;
    }
    if let Some(reply) = failure(upstream.air_status) {
        return reply;
    }
    if let Some(body) = &upstream.air_body {
        return (StatusCode::OK, Json(body.clone()));
    }
    assert_eq!(params.get("lat").map(String::as_str), Some("28.6"));
    (
        StatusCode::OK,
        Json(json!({"list": [{"main": {"aqi": 4}, "components": {"pm2_5": 88.2, "pm10": 120.0}}]})),
    )
}

async fn news(State(upstream): State<Shared>, Query(params): Params) -> Reply {
    if let Some(reply) = unauthorized(&params, "apikey") {
        return reply;
    }
    if let Some(reply) = failure(upstream.news_status) {
        return reply;
    }
    (
        StatusCode::OK,
        Json(json!({"status": "success", "results": [
            {"title": "Heatwave grips north India", "description": "Temperatures cross 45°C", "link": "https://news.test/1", "pubDate": "2024-05-30 08:15:00"},
            {"title": null, "content": "Monsoon reaches Kerala", "pubDate": null}
        ]})),
    )
}

async fn geocode(Query(params): Params) -> Reply {
    match params.get("name").map(String::as_str) {
        Some("Atlantis") => (StatusCode::OK, Json(json!({"generationtime_ms": 0.2}))),
        Some(name) => (
            StatusCode::OK,
            Json(json!({"results": [
                {"name": name, "latitude": 19.07, "longitude": 72.88, "country": "India"}
            ]})),
        ),
        None => (StatusCode::BAD_REQUEST, Json(json!({"error": true}))),
    }
}

async fn open_meteo_forecast(Query(params): Params) -> Reply {
    assert_eq!(params.get("current_weather").map(String::as_str), Some("true"));
    (
        StatusCode::OK,
        Json(json!({"current_weather": {"temperature": 29.5, "windspeed": 14.0, "time": "2024-06-01T14:00"}})),
    )
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_upstream(upstream: Upstream) -> String {
    let router = Router::new()
        .route("/data/2.5/weather", get(weather))
        .route("/data/2.5/forecast", get(forecast))
        .route("/data/2.5/air_pollution", get(air_pollution))
        .route("/news", get(news))
        .route("/geo/search", get(geocode))
        .route("/meteo/forecast", get(open_meteo_forecast))
        .with_state(Arc::new(upstream));
    serve(router).await
}

fn config_for(base: &str) -> WeatherDashConfig {
    let mut config = WeatherDashConfig::default();
    config.openweather.api_key = Some(API_KEY.to_string());
    config.openweather.base_url = format!("{base}/data/2.5");
    config.news.api_key = Some(API_KEY.to_string());
    config.news.base_url = format!("{base}/news");
    config.open_meteo.geocoding_url = format!("{base}/geo");
    config.open_meteo.forecast_url = format!("{base}/meteo");
    config.dashboard.timezone = Some("Asia/Kolkata".to_string());
    config
}

async fn service_for(upstream: Upstream) -> DashboardService {
    let base = spawn_upstream(upstream).await;
    DashboardService::from_config(&config_for(&base)).unwrap()
}

#[tokio::test]
async fn test_search_builds_bundle_from_all_sources() {
    let service = service_for(Upstream::default()).await;

    let bundle = service.search("Delhi").await.unwrap();

    assert_eq!(bundle.location.display_name(), "Delhi, IN");
    assert_eq!(bundle.insights.advice, "Sunny day – No rain expected");
    assert_eq!(bundle.insights.aqi.label, "Poor");
    assert_eq!(bundle.air_quality.pm25, 88.2);
    assert_eq!(bundle.forecast.len(), 6);
    assert!(bundle.forecast.iter().all(|e| e.timestamp > bundle.generated_at));
    assert_eq!(bundle.news.len(), 2);
    assert_eq!(bundle.news[1].title, "Weather Update");
    assert_eq!(bundle.news[1].description, "Monsoon reaches Kerala");

    let details = bundle.insights.details.unwrap();
    assert!(details.alerts.is_empty());
    assert_eq!(details.visibility.bucket, "Excellent");
}

#[tokio::test]
async fn test_optional_sources_degrade() {
    let service = service_for(Upstream {
        news_status: Some(500),
        air_status: Some(503),
        ..Upstream::default()
    })
    .await;

    let bundle = service.search("Delhi").await.unwrap();

    assert!(bundle.news.is_empty());
    assert!(bundle.air_quality.is_unknown());
    assert_eq!(bundle.insights.aqi.label, "Unknown");
    assert_eq!(bundle.forecast.len(), 6);
}

#[tokio::test]
async fn test_forecast_failure_is_fatal() {
    let service = service_for(Upstream {
        forecast_status: Some(502),
        ..Upstream::default()
    })
    .await;

    let err = service.search("Delhi").await.unwrap_err();
    assert!(matches!(
        err,
        WeatherDashError::RemoteService {
            service: Service::Forecast,
            status_code: 502
        }
    ));
}

#[tokio::test]
async fn test_weather_body_without_fields_is_fatal() {
    let service = service_for(Upstream {
        weather_body: Some(json!({})),
        ..Upstream::default()
    })
    .await;

    let err = service.search("Delhi").await.unwrap_err();
    assert!(matches!(
        err,
        WeatherDashError::MalformedResponse {
            service: Service::CurrentWeather,
            ..
        }
    ));
}

#[tokio::test]
async fn test_forecast_body_without_list_is_fatal() {
    let service = service_for(Upstream {
        forecast_body: Some(json!({"cod": "200"})),
        ..Upstream::default()
    })
    .await;

    let err = service.search("Delhi").await.unwrap_err();
    assert!(matches!(
        err,
        WeatherDashError::MalformedResponse {
            service: Service::Forecast,
            ..
        }
    ));
}

#[tokio::test]
async fn test_malformed_air_quality_degrades_to_unknown() {
    let service = service_for(Upstream {
        air_body: Some(json!({"list": [{}]})),
        ..Upstream::default()
    })
    .await;

    let bundle = service.search("Delhi").await.unwrap();
    assert!(bundle.air_quality.is_unknown());
    assert_eq!(bundle.insights.aqi.label, "Unknown");
    assert_eq!(bundle.forecast.len(), 6);
}

#[tokio::test]
async fn test_unreachable_upstream_keeps_api_key_out_of_errors() {
    let mut config = config_for("http://127.0.0.1:1");
    config.openweather.api_key = Some("SUPERSECRETKEY".to_string());
    let service = DashboardService::from_config(&config).unwrap();

    let err = service.search("Delhi").await.unwrap_err();
    assert!(matches!(err, WeatherDashError::Network { .. }));

    let mut renderer = TerminalRenderer::new(Vec::new());
    renderer.render_error(&err).unwrap();
    let text = String::from_utf8(renderer.into_inner()).unwrap();
    assert!(text.contains("Unable to fetch weather data"));
    assert!(!text.contains("SUPERSECRETKEY"));
}

#[tokio::test]
async fn test_unknown_city_reports_not_found() {
    let service = service_for(Upstream::default()).await;

    let err = service.search("Atlantis").await.unwrap_err();
    assert_eq!(err.service(), Some(Service::CurrentWeather));
    assert!(err.user_message().starts_with("Location not found"));
}

#[tokio::test]
async fn test_wrong_api_key_is_remote_error() {
    let base = spawn_upstream(Upstream::default()).await;
    let mut config = config_for(&base);
    config.openweather.api_key = Some("wrong".to_string());
    let service = DashboardService::from_config(&config).unwrap();

    let err = service.search("Delhi").await.unwrap_err();
    assert!(matches!(
        err,
        WeatherDashError::RemoteService {
            status_code: 401,
            ..
        }
    ));
}

#[tokio::test]
async fn test_quick_lookup_via_open_meteo() {
    let service = service_for(Upstream::default()).await;

    let quick = service.quick_lookup("Mumbai").await.unwrap();
    assert_eq!(quick.location.display_name(), "Mumbai, India");
    assert_eq!(quick.temperature_c, 29.5);
    assert!(quick.observed_at.is_some());

    let err = service.quick_lookup("Atlantis").await.unwrap_err();
    assert!(matches!(
        err,
        WeatherDashError::MalformedResponse {
            service: Service::Geocoding,
            ..
        }
    ));
}

#[tokio::test]
async fn test_compare_over_http() {
    let service = service_for(Upstream::default()).await;

    let rows = service
        .compare(&["Delhi".to_string(), "Atlantis".to_string()])
        .await;
    assert_eq!(rows[0].format_temperature(), "32°C");
    assert_eq!(rows[1].format_temperature(), "N/A");
}

#[tokio::test]
async fn test_web_api() {
    let service = service_for(Upstream::default()).await;
    let api = serve(web::app(service)).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{api}/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let share = client.get(format!("{api}/api/share")).send().await.unwrap();
    assert_eq!(share.status(), reqwest::StatusCode::BAD_REQUEST);

    let blank = client.get(format!("{api}/api/quick?city=")).send().await.unwrap();
    assert_eq!(blank.status(), reqwest::StatusCode::BAD_REQUEST);

    let weather = client
        .get(format!("{api}/api/weather?city=Delhi"))
        .send()
        .await
        .unwrap();
    assert_eq!(weather.status(), reqwest::StatusCode::OK);
    let bundle: Value = weather.json().await.unwrap();
    assert_eq!(bundle["location"]["name"], "Delhi");
    assert_eq!(bundle["insights"]["aqi"]["label"], "Poor");

    let share: Value = client
        .get(format!("{api}/api/share"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(share["text"].as_str().unwrap().starts_with("🌦️ Weather in Delhi:"));

    let toggled: Value = client
        .post(format!("{api}/api/favorites/toggle"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["favorite"], true);
    assert_eq!(toggled["favorites"][0]["name"], "Delhi");

    let missing = client
        .get(format!("{api}/api/weather?city=Atlantis"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["code"], "remote_service");

    let compare: Value = client
        .get(format!("{api}/api/compare?cities=Delhi,%20Atlantis"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(compare.as_array().unwrap().len(), 2);
    assert_eq!(compare[1]["temperature_c"], Value::Null);
}
