use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::{decode, parse_id, SharedState};
use crate::error::{ApiError, Entity};
use crate::services::meetings::meetings_for_client;
use crate::types::{Client, ClientPatch, EnrichedMeeting, InsertClient};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/:id", get(get_client).patch(update_client))
        .route("/clients/:id/meetings", get(list_client_meetings))
}

#[tracing::instrument(skip(state))]
async fn list_clients(State(state): State<SharedState>) -> Json<Vec<Client>> {
    Json(state.with_db_read(|db| db.get_clients()))
}

#[tracing::instrument(skip(state))]
async fn get_client(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, ApiError> {
    let id = parse_id(&id, Entity::Client)?;
    state
        .with_db_read(|db| db.get_client(id))
        .map(Json)
        .ok_or(ApiError::NotFound(Entity::Client))
}

#[tracing::instrument(skip(state, body))]
async fn create_client(
    State(state): State<SharedState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let input: InsertClient = decode(body)?;
    input.validate()?;

    let client = state.with_db_write(|db| db.create_client(input));
    tracing::info!(client_id = client.id, "client created");
    Ok((StatusCode::CREATED, Json(client)))
}

#[tracing::instrument(skip(state, body))]
async fn update_client(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Client>, ApiError> {
    let id = parse_id(&id, Entity::Client)?;
    let patch: ClientPatch = decode(body)?;

    state
        .with_db_write(|db| db.update_client(id, patch))
        .map(Json)
        .ok_or(ApiError::NotFound(Entity::Client))
}

/// Meetings for one client, oldest first.
#[tracing::instrument(skip(state))]
async fn list_client_meetings(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EnrichedMeeting>>, ApiError> {
    let id = parse_id(&id, Entity::Client)?;
    state
        .with_db_read(|db| meetings_for_client(db, id))
        .map_err(|e| ApiError::from_store("retrieve client meetings", e))?
        .map(Json)
        .ok_or(ApiError::NotFound(Entity::Client))
}
