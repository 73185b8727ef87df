//! HTTP gateway (Axum) for flash requests, seller profiles and matches.
//!
//! This module is primarily used by the `flashmatch` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::GatewayError;
pub use handler::{
    create_flash_request_handler, create_profile_handler, get_flash_request_handler,
    get_matches_handler, list_profiles_handler, send_pings_handler, seed_profiles_handler,
};
pub use state::HandlerState;

use crate::config::ANY_ORIGIN;
use payload::HealthResponse;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/flash-requests", post(create_flash_request_handler))
        .route("/api/flash-requests/{id}", get(get_flash_request_handler))
        .route("/api/flash-requests/{id}/matches", get(get_matches_handler))
        .route("/api/flash-requests/{id}/pings", post(send_pings_handler))
        .route(
            "/api/profiles",
            post(create_profile_handler).get(list_profiles_handler),
        )
        .route("/api/profiles/seed", post(seed_profiles_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for the configured origins. `*` (or no usable origin) allows any.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == ANY_ORIGIN) {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(parsed)
    }
}

#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Result<Response, GatewayError> {
    let profiles = state.profiles.len().await?;
    let requests = state.requests.len().await?;

    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            model_loaded: state.engine.artifact().to_string(),
            profiles,
            requests,
        }),
    )
        .into_response())
}
