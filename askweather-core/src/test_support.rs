//! In-process HTTP fixtures for tests.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use crate::config::Config;

pub(crate) const GEO_PATH: &str = "/geo/1.0/direct";
pub(crate) const WEATHER_PATH: &str = "/data/2.5/weather";

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub(crate) async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fixture port");
    let addr = listener.local_addr().expect("fixture address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fixture server");
    });
    format!("http://{addr}")
}

/// Canned OpenWeather responses plus per-endpoint hit counters.
#[derive(Debug, Clone)]
pub(crate) struct OpenWeatherFixture {
    pub geo_status: StatusCode,
    pub geo_body: Value,
    pub weather_status: StatusCode,
    pub weather_body: Value,
    pub geo_hits: Arc<AtomicUsize>,
    pub weather_hits: Arc<AtomicUsize>,
    pub geo_queries: Arc<Mutex<Vec<String>>>,
}

impl OpenWeatherFixture {
    pub fn city(lat: f64, lon: f64, temp: f64, description: &str) -> Self {
        Self {
            geo_status: StatusCode::OK,
            geo_body: json!([{ "name": "fixture", "lat": lat, "lon": lon, "country": "XX" }]),
            weather_status: StatusCode::OK,
            weather_body: json!({
                "main": { "temp": temp, "feels_like": temp, "humidity": 50 },
                "weather": [{ "main": "fixture", "description": description }],
                "name": "fixture"
            }),
            geo_hits: Arc::default(),
            weather_hits: Arc::default(),
            geo_queries: Arc::default(),
        }
    }

    pub fn geo_hits(&self) -> usize {
        self.geo_hits.load(Ordering::SeqCst)
    }

    pub fn weather_hits(&self) -> usize {
        self.weather_hits.load(Ordering::SeqCst)
    }

    /// Every `q` value the geocoding route has received, in order.
    pub fn geo_queries(&self) -> Vec<String> {
        self.geo_queries.lock().unwrap().clone()
    }

    /// Both routes reject requests missing the expected query parameters with 400.
    pub fn router(&self) -> Router {
        Router::new()
            .route(GEO_PATH, get(geocode))
            .route(WEATHER_PATH, get(current_weather))
            .with_state(self.clone())
    }

    /// Start the fixture and return a config whose OpenWeather endpoints point at it.
    pub async fn start(&self) -> Config {
        let base = spawn(self.router()).await;
        let mut cfg = Config::default();
        cfg.chat.api_key = Some("CHAT_KEY".to_string());
        cfg.weather.api_key = Some("WEATHER_KEY".to_string());
        cfg.weather.geocoding_url = format!("{base}{GEO_PATH}");
        cfg.weather.weather_url = format!("{base}{WEATHER_PATH}");
        cfg
    }
}

type Params = Query<HashMap<String, String>>;

fn has(q: &HashMap<String, String>, key: &str, value: &str) -> bool {
    q.get(key).map(String::as_str) == Some(value)
}

async fn geocode(
    State(fx): State<OpenWeatherFixture>,
    Query(q): Params,
) -> (StatusCode, Json<Value>) {
    fx.geo_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(city) = q.get("q") {
        fx.geo_queries.lock().unwrap().push(city.clone());
    }
    if !(q.contains_key("q") && has(&q, "limit", "1") && has(&q, "appid", "WEATHER_KEY")) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "cod": "400" })));
    }
    (fx.geo_status, Json(fx.geo_body))
}

async fn current_weather(
    State(fx): State<OpenWeatherFixture>,
    Query(q): Params,
) -> (StatusCode, Json<Value>) {
    fx.weather_hits.fetch_add(1, Ordering::SeqCst);
    let well_formed = q.contains_key("lat")
        && q.contains_key("lon")
        && has(&q, "units", "metric")
        && has(&q, "appid", "WEATHER_KEY");
    if !well_formed {
        return (StatusCode::BAD_REQUEST, Json(json!({ "cod": "400" })));
    }
    (fx.weather_status, Json(fx.weather_body))
}
