//! Axum route handlers for the horoscope endpoints

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use zodica_core::{HoroscopeKind, Sign};

use crate::error::HoroscopeError;
use crate::service::HoroscopeService;
use crate::types::{BatchQuery, BatchResponse, HoroscopeQuery, HoroscopeResponse, PurgeResponse};

/// Build the horoscope router with all endpoints
pub fn horoscope_router(service: HoroscopeService) -> Router {
    Router::new()
        .route("/v1/horoscope", routing::get(get_horoscope))
        .route("/v1/horoscope/cache", routing::delete(purge_cache))
        .route("/v1/horoscopes/batch", routing::post(run_batch))
        .with_state(service)
}

/// Handle `GET /v1/horoscope`
async fn get_horoscope(State(service): State<HoroscopeService>, Query(query): Query<HoroscopeQuery>) -> Response {
    let (sign, kind, timezone) = match parse_query(&query) {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };

    match service.get_horoscope(sign, kind, timezone).await {
        Ok(reply) => Json(HoroscopeResponse {
            success: true,
            cached: reply.cached,
            batch_generated: reply.batch_generated,
            timezone_aware: reply.timezone_aware,
            timezone: reply.timezone,
            local_date: reply.local_date,
            data: reply.record,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Handle `POST /v1/horoscopes/batch`
///
/// Cron-style trigger: runs the daily batch for "today" in the requested
/// timezone and reports the per-sign split.
async fn run_batch(State(service): State<HoroscopeService>, Query(query): Query<BatchQuery>) -> Response {
    let (timezone, date) = service.resolve_date(query.timezone.as_deref().unwrap_or("UTC"));

    let outcome = service.generate_batch(date, HoroscopeKind::Daily).await;

    Json(BatchResponse {
        success: true,
        date,
        timezone,
        generated: outcome.generated_signs(),
        failed: outcome.errors,
    })
    .into_response()
}

/// Handle `DELETE /v1/horoscope/cache`
async fn purge_cache(State(service): State<HoroscopeService>, Query(query): Query<HoroscopeQuery>) -> Response {
    let (sign, kind, timezone) = match parse_query(&query) {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };

    let removed = service.purge(sign, kind, timezone).await;
    Json(PurgeResponse { success: true, removed }).into_response()
}

/// Validate the sign/type/timezone parameters
///
/// Bad input fails here, before any cache or generation side effect. An
/// unknown timezone is deliberately not an error; the service falls back
/// to UTC.
fn parse_query(query: &HoroscopeQuery) -> Result<(Sign, HoroscopeKind, &str), HoroscopeError> {
    let raw_sign = query
        .sign
        .as_deref()
        .ok_or_else(|| HoroscopeError::InvalidInput("missing required parameter 'sign'".to_owned()))?;
    let sign = Sign::from_str(raw_sign)
        .map_err(|_| HoroscopeError::InvalidInput(format!("unknown sign '{raw_sign}'")))?;

    let kind = match query.kind.as_deref() {
        None => HoroscopeKind::Daily,
        Some(raw) => HoroscopeKind::from_str(raw)
            .map_err(|_| HoroscopeError::InvalidInput(format!("unknown type '{raw}'")))?,
    };

    Ok((sign, kind, query.timezone.as_deref().unwrap_or("UTC")))
}

/// Convert a horoscope error to the standard JSON error envelope
fn error_response(error: &HoroscopeError) -> Response {
    use zodica_core::HttpError;

    let status = error.status_code();
    let body = serde_json::json!({
        "success": false,
        "error": {
            "type": error.error_type(),
            "message": error.client_message(),
        }
    });

    (status, Json(body)).into_response()
}
