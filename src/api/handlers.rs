//! API request handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::service::{self, CounterUpdate};

use super::error::ApiResult;
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Counter value response.
#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub value: i64,
}

/// Get the current counter value.
#[instrument(skip(state))]
pub async fn get_counter(State(state): State<AppState>) -> ApiResult<Json<CounterResponse>> {
    let value = state.values.counter_value().await?;
    Ok(Json(CounterResponse { value }))
}

/// Update the counter with either an absolute value or a delta.
///
/// Body options:
///   `{"value": <int>}` -> set to exact value
///   `{"delta": <int>}` -> increment by delta (can be negative)
#[instrument(skip(state, body))]
pub async fn post_counter(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<CounterResponse>> {
    let Json(body) = body?;
    let update = CounterUpdate::from_body(&body)?;
    let value = state.values.update_counter(update).await?;
    info!(value, "updated counter");
    Ok(Json(CounterResponse { value }))
}

/// Current message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for a stored message.
#[derive(Debug, Serialize)]
pub struct MessageAccepted {
    pub ok: bool,
    pub message: String,
}

/// Get the current message.
///
/// Returns JSON by default; plain text when the Accept header prefers
/// text/plain and does not mention JSON.
#[instrument(skip(state, headers))]
pub async fn get_message(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let message = state.values.current_message().await;

    if wants_plain_text(&headers) {
        (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    } else {
        Json(MessageResponse { message }).into_response()
    }
}

/// Store a new message from a JSON body `{"message": "..."}`.
#[instrument(skip(state, body))]
pub async fn post_message(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageAccepted>)> {
    let Json(body) = body?;
    let content = service::message_from_body(&body)?;
    state.values.update_message(content).await?;
    info!("updated current message");

    Ok((
        StatusCode::CREATED,
        Json(MessageAccepted {
            ok: true,
            message: content.to_string(),
        }),
    ))
}

fn wants_plain_text(headers: &HeaderMap) -> bool {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    accept.contains("text/plain") && !accept.contains("application/json")
}
