use crate::api::api_error::APIError;
use crate::api::server::AppState;
use crate::error::Error;
use crate::telegram::Update;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub(super) const LIVENESS: &str = "Hello! This is the webhook endpoint of the DNS management bot.";

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route(
            "/webhook",
            get(liveness).head(method_not_allowed).post(webhook),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.api_timeout))
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

#[allow(clippy::unused_async)]
async fn liveness() -> &'static str {
    LIVENESS
}

// `get` would otherwise answer HEAD as well.
#[allow(clippy::unused_async)]
async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET,POST")])
}

/// Content type is not checked. Only unparseable bodies are refused; JSON that doesn't look
/// like an update is acknowledged and dropped.
async fn webhook(State(state): State<AppState>, body: Bytes) -> Result<&'static str, APIError> {
    let update = match serde_json::from_slice::<Update>(&body) {
        Ok(update) => update,
        Err(err) if err.is_data() => {
            tracing::debug!("ignoring webhook body that isn't an update: {err}");
            return Ok("OK");
        }
        Err(err) => return Err(Error::InvalidJSON(err).into()),
    };
    tracing::debug!("received update {}", update.update_id);
    state.router.handle_update(update).await;
    Ok("OK")
}
