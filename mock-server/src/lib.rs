//! In-memory stand-in for the Fitbit Web API endpoints the client core uses.
//!
//! Resource routes require `Authorization: Bearer mock-access-token`; the
//! OAuth2 routes require Basic credentials `mock-client:mock-secret`. Every
//! 200 resource response carries the three rate-limit headers.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const ACCESS_TOKEN: &str = "mock-access-token";
pub const CLIENT_ID: &str = "mock-client";
pub const CLIENT_SECRET: &str = "mock-secret";
pub const REFRESH_TOKEN: &str = "mock-refresh-token";

pub const RATE_LIMIT_LIMIT: &str = "150";
pub const RATE_LIMIT_REMAINING: &str = "149";
pub const RATE_LIMIT_RESET: &str = "1800";

/// Activity log ids present when the server starts.
pub const SEEDED_ACTIVITY_LOGS: [u64; 2] = [1001, 1002];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightLog {
    #[serde(rename = "logId")]
    pub log_id: u64,
    pub weight: f64,
    pub date: String,
    pub time: Option<String>,
}

#[derive(Deserialize)]
pub struct WeightForm {
    pub weight: f64,
    pub date: String,
    pub time: Option<String>,
}

#[derive(Deserialize)]
pub struct TokenForm {
    pub grant_type: String,
    pub refresh_token: Option<String>,
}

#[derive(Deserialize)]
pub struct RevokeForm {
    pub token: String,
}

#[derive(Debug, Default)]
pub struct Store {
    pub weights: Vec<WeightLog>,
    pub activity_logs: HashSet<u64>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let store = Store {
        weights: Vec::new(),
        activity_logs: SEEDED_ACTIVITY_LOGS.into_iter().collect(),
    };
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/1/user/{user}/profile.json", get(profile))
        .route("/1/user/{user}/devices.json", get(devices))
        .route("/1/user/{user}/activities/date/{file}", get(activities_on_date))
        .route("/1/user/{user}/activities/heart/date/{start}/{file}", get(heart_series))
        .route("/1/user/{user}/activities/{file}", delete(delete_activity_log))
        .route("/1/user/{user}/body/log/weight.json", post(log_weight))
        .route("/1.2/user/{user}/sleep/date/{file}", get(sleep_on_date))
        .route("/1/status/{code}", get(status))
        .route("/1/headers", get(echo_headers))
        .route("/oauth2/token", post(token))
        .route("/oauth2/revoke", post(revoke))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock Fitbit API listening");
    }
    axum::serve(listener, app()).await
}

fn require_bearer(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn require_basic(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}"))
    );
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// 200 with the JSON body and the rate-limit headers.
fn with_rate_limits(body: Value) -> Response {
    (
        [
            ("fitbit-rate-limit-limit", RATE_LIMIT_LIMIT),
            ("fitbit-rate-limit-remaining", RATE_LIMIT_REMAINING),
            ("fitbit-rate-limit-reset", RATE_LIMIT_RESET),
        ],
        Json(body),
    )
        .into_response()
}

/// `2024-03-15.json` -> `2024-03-15`
fn strip_json(file: &str) -> Result<&str, StatusCode> {
    file.strip_suffix(".json").ok_or(StatusCode::NOT_FOUND)
}

async fn profile(Path(user): Path<String>, headers: HeaderMap) -> Result<Response, StatusCode> {
    require_bearer(&headers)?;
    let encoded_id = if user == "-" { "MOCK01" } else { user.as_str() };
    Ok(with_rate_limits(json!({
        "user": {
            "encodedId": encoded_id,
            "displayName": "Mock Runner",
            "strideLengthRunning": 104.5,
        }
    })))
}

async fn devices(Path(_user): Path<String>, headers: HeaderMap) -> Result<Response, StatusCode> {
    require_bearer(&headers)?;
    Ok(with_rate_limits(json!([
        {"id": "123456", "deviceVersion": "Charge 6", "battery": "High"},
        {"id": "654321", "deviceVersion": "Aria Air", "battery": "Low"},
    ])))
}

async fn activities_on_date(
    Path((_user, file)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    require_bearer(&headers)?;
    let date = strip_json(&file)?;
    Ok(with_rate_limits(json!({
        "activities": [],
        "summary": {"steps": 8421, "date": date},
    })))
}

async fn heart_series(
    Path((_user, start, file)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    require_bearer(&headers)?;
    let end = strip_json(&file)?;
    Ok(with_rate_limits(json!({
        "activities-heart": [
            {"dateTime": start, "value": {"restingHeartRate": 58}},
            {"dateTime": end, "value": {"restingHeartRate": 57}},
        ]
    })))
}

async fn sleep_on_date(
    Path((_user, file)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    require_bearer(&headers)?;
    let date = strip_json(&file)?;
    Ok(with_rate_limits(json!({
        "sleep": [{"dateOfSleep": date, "minutesAsleep": 412, "isMainSleep": true}],
        "summary": {"totalMinutesAsleep": 412},
    })))
}

async fn log_weight(
    State(db): State<Db>,
    Path(_user): Path<String>,
    headers: HeaderMap,
    Form(input): Form<WeightForm>,
) -> Result<(StatusCode, Json<WeightLog>), StatusCode> {
    require_bearer(&headers)?;
    let mut store = db.write().await;
    let log = WeightLog {
        log_id: store.weights.len() as u64 + 1,
        weight: input.weight,
        date: input.date,
        time: input.time,
    };
    store.weights.push(log.clone());
    debug!(log_id = log.log_id, "weight logged");
    Ok((StatusCode::CREATED, Json(log)))
}

async fn delete_activity_log(
    State(db): State<Db>,
    Path((_user, file)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_bearer(&headers)?;
    let log_id: u64 = strip_json(&file)?
        .parse()
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    if store.activity_logs.remove(&log_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// Answers with whatever status the path names.
async fn status(Path(code): Path<u16>, headers: HeaderMap) -> Result<Response, StatusCode> {
    require_bearer(&headers)?;
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    if status == StatusCode::OK {
        return Ok(with_rate_limits(json!({"status": code})));
    }
    Ok((status, Json(json!({"errors": [{"errorType": "mock", "message": code.to_string()}]})))
        .into_response())
}

/// Echoes request headers as a JSON object keyed by lowercase name.
async fn echo_headers(headers: HeaderMap) -> Result<Response, StatusCode> {
    require_bearer(&headers)?;
    let echoed: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    Ok(with_rate_limits(json!({ "headers": echoed })))
}

async fn token(headers: HeaderMap, Form(input): Form<TokenForm>) -> Result<Json<Value>, StatusCode> {
    require_basic(&headers)?;
    if input.grant_type != "refresh_token" {
        return Err(StatusCode::BAD_REQUEST);
    }
    if input.refresh_token.as_deref() != Some(REFRESH_TOKEN) {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({
        "access_token": Uuid::new_v4().to_string(),
        "refresh_token": Uuid::new_v4().to_string(),
        "token_type": "Bearer",
        "expires_in": 28800,
        "user_id": "MOCK01",
    })))
}

async fn revoke(headers: HeaderMap, Form(input): Form<RevokeForm>) -> Result<Json<Value>, StatusCode> {
    require_basic(&headers)?;
    debug!(token_len = input.token.len(), "token revoked");
    Ok(Json(json!({})))
}
