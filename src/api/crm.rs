use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::{decode, parse_id, SharedState};
use crate::error::{ApiError, Entity};
use crate::types::{CrmIntegration, CrmIntegrationPatch, InsertCrmIntegration};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/crm/status", get(list_integrations))
        .route("/crm/connect", post(connect_integration))
        .route("/crm/:id", get(get_integration).patch(update_integration))
}

#[tracing::instrument(skip(state))]
async fn list_integrations(State(state): State<SharedState>) -> Json<Vec<CrmIntegration>> {
    Json(state.with_db_read(|db| db.get_crm_integrations()))
}

#[tracing::instrument(skip(state))]
async fn get_integration(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CrmIntegration>, ApiError> {
    let id = parse_id(&id, Entity::Integration)?;
    state
        .with_db_read(|db| db.get_crm_integration(id))
        .map(Json)
        .ok_or(ApiError::NotFound(Entity::Integration))
}

/// Register a simulated integration. Nothing is contacted.
#[tracing::instrument(skip(state, body))]
async fn connect_integration(
    State(state): State<SharedState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CrmIntegration>), ApiError> {
    let input: InsertCrmIntegration = decode(body)?;
    input.validate()?;

    let integration = state.with_db_write(|db| db.create_crm_integration(input));
    tracing::info!(
        integration_id = integration.id,
        status = ?integration.status,
        "crm integration registered"
    );
    Ok((StatusCode::CREATED, Json(integration)))
}

#[tracing::instrument(skip(state, body))]
async fn update_integration(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<CrmIntegration>, ApiError> {
    let id = parse_id(&id, Entity::Integration)?;
    let patch: CrmIntegrationPatch = decode(body)?;

    state
        .with_db_write(|db| db.update_crm_integration(id, patch))
        .map(Json)
        .ok_or(ApiError::NotFound(Entity::Integration))
}
