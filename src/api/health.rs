use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
