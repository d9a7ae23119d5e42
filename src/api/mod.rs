//! JSON-over-HTTP surface, mounted under `/api`.
//!
//! Handlers parse and validate at the edge, take the store lock once, and map
//! store outcomes to status codes through [`ApiError`].

use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use axum::Router;
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, Entity, ValidationError};
use crate::state::AppState;

mod clients;
mod crm;
mod dashboard;
mod health;
mod meetings;

pub type SharedState = Arc<AppState>;

pub async fn setup_and_serve(state: SharedState) -> anyhow::Result<()> {
    let addr = state.config.socket_addr()?;
    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "meetdesk listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("error running server")
}

pub fn api_router(state: SharedState) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(clients::router())
        .merge(meetings::router())
        .merge(crm::router())
        .merge(dashboard::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => tracing::warn!(error = %e, "failed to listen for shutdown signal"),
    }
}

/// Path ids are plain integers; anything else is rejected before the store is touched.
pub(crate) fn parse_id(raw: &str, entity: Entity) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidId(entity))
}

/// Decode a JSON body into `T`, turning every failure into a validation error.
pub(crate) fn decode<T: DeserializeOwned>(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;
    let decoded = serde_json::from_value(value).map_err(ValidationError::from)?;
    Ok(decoded)
}
