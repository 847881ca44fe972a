use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
};
use chrono::{TimeZone, Utc};
use launchpad_launches::{parse_launch_date, Launch, NewLaunch, Planet};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::state::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "launch-api",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

pub async fn list_launches(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Launch>>, ApiError> {
    let (skip, limit) = query.skip_limit();
    let launches = state.launches.list(skip, limit).await?;
    Ok(Json(launches))
}

pub async fn add_new_launch(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Launch>), ApiError> {
    let body = request_body(&headers, &body)?;
    let new_launch = new_launch_from_body(&body)?;

    let launch = state.launches.schedule(new_launch).await?;
    Ok((StatusCode::CREATED, Json(launch)))
}

pub async fn abort_launch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let flight_number: u32 = id.parse().map_err(|_| ApiError::LaunchNotFound)?;

    if !state.launches.exists(flight_number).await? {
        return Err(ApiError::LaunchNotFound);
    }
    if !state.launches.abort(flight_number).await? {
        return Err(ApiError::NotAborted);
    }

    info!(flight_number, "Launch aborted");
    Ok(Json(json!({ "ok": true })))
}

pub async fn list_planets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Planet>>, ApiError> {
    Ok(Json(state.launches.planets().await?))
}

/// Bodies that are empty or not sent as JSON read as `{}`, so they report
/// missing properties. Only a JSON body that fails to parse is rejected.
fn request_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false);

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// Validate a schedule request. All four fields must be present before the
/// date is looked at, so a missing date reports as a missing property.
fn new_launch_from_body(body: &Value) -> Result<NewLaunch, ApiError> {
    let (Some(mission), Some(rocket), Some(destination), Some(launch_date)) = (
        text_field(body, "mission"),
        text_field(body, "rocket"),
        text_field(body, "destination"),
        body.get("launchDate").filter(|value| is_truthy(value)),
    ) else {
        return Err(ApiError::MissingProperty);
    };

    let launch_date = match launch_date {
        Value::String(text) => parse_launch_date(text),
        Value::Number(millis) => millis
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
    .ok_or(ApiError::InvalidLaunchDate)?;

    Ok(NewLaunch {
        mission,
        rocket,
        launch_date,
        destination,
    })
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_date_is_missing_property() {
        let body = json!({
            "mission": "USS Enterprise",
            "rocket": "NCC 1701-D",
            "destination": "Kepler-62 f"
        });
        assert!(matches!(
            new_launch_from_body(&body),
            Err(ApiError::MissingProperty)
        ));
    }

    #[test]
    fn test_empty_strings_are_missing() {
        let body = json!({
            "mission": "",
            "rocket": "NCC 1701-D",
            "destination": "Kepler-62 f",
            "launchDate": "zoot"
        });
        assert!(matches!(
            new_launch_from_body(&body),
            Err(ApiError::MissingProperty)
        ));
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json; charset=utf-8".parse().unwrap());
        headers
    }

    #[test]
    fn test_request_body_defaults_to_empty_object() {
        assert_eq!(request_body(&HeaderMap::new(), b"").unwrap(), json!({}));
        assert_eq!(
            request_body(&HeaderMap::new(), br#"{"mission":"x"}"#).unwrap(),
            json!({})
        );
        assert_eq!(request_body(&json_headers(), b"  \n").unwrap(), json!({}));
        assert_eq!(
            request_body(&json_headers(), br#"{"mission":"x"}"#).unwrap(),
            json!({ "mission": "x" })
        );
    }

    #[test]
    fn test_request_body_rejects_broken_json() {
        assert!(matches!(
            request_body(&json_headers(), b"{\"mission\":"),
            Err(ApiError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_invalid_date() {
        let body = json!({
            "mission": "USS Enterprise",
            "rocket": "NCC 1701-D",
            "destination": "Kepler-62 f",
            "launchDate": "zoot"
        });
        assert!(matches!(
            new_launch_from_body(&body),
            Err(ApiError::InvalidLaunchDate)
        ));
    }

    #[test]
    fn test_numeric_date_is_epoch_millis() {
        let body = json!({
            "mission": "USS Enterprise",
            "rocket": "NCC 1701-D",
            "destination": "Kepler-62 f",
            "launchDate": 1830556800000i64
        });
        let launch = new_launch_from_body(&body).unwrap();
        assert_eq!(launch.launch_date, parse_launch_date("January 4, 2028").unwrap());
    }
}
