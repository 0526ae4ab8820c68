//! HTTP gateway (Axum).

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Request, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use handler::{
    dogbreed_handler, embed_handler, list_mappings_handler, normalize_handler,
    similarity_score_handler, update_mapping_handler,
};
pub use state::HandlerState;

use crate::constants::MAX_UPLOAD_BYTES;

pub const DOGMATCH_STATUS_HEADER: &str = "x-dogmatch-status";
pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_PENDING: &str = "pending";

pub const API_PREFIX: &str = "/api/v1";

pub fn create_router_with_state(state: HandlerState) -> Router {
    let api = Router::new()
        .route("/dogbreed", post(dogbreed_handler))
        .route(
            "/dogbreed/mappings",
            get(list_mappings_handler).put(update_mapping_handler),
        )
        .route("/embed", post(embed_handler))
        .route("/embed/normalize", post(normalize_handler))
        .route("/similarity/score", post(similarity_score_handler));

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .nest(API_PREFIX, api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub breeds: &'static str,
    pub classifier_mode: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        DOGMATCH_STATUS_HEADER,
        HeaderValue::from_static(STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let breeds_ready = state.breeds.is_ready();

    let components = ComponentStatus {
        http: STATUS_READY,
        breeds: if breeds_ready {
            STATUS_READY
        } else {
            STATUS_PENDING
        },
        classifier_mode: if state.classifier.is_stub() {
            "stub"
        } else {
            "real"
        },
        embedder_mode: if state.embedder.is_stub() {
            "stub"
        } else {
            "real"
        },
    };

    let (status_code, status_msg) = if breeds_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, STATUS_PENDING)
    };

    let mut headers = HeaderMap::new();
    headers.insert(DOGMATCH_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
