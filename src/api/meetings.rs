use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;

use super::{decode, parse_id, SharedState};
use crate::error::{ApiError, Entity};
use crate::services::meetings;
use crate::types::{EnrichedMeeting, InsertMeeting, MeetingPatch, MeetingType};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/meetings", get(list_meetings).post(create_meeting))
        .route("/meetings/upcoming", get(upcoming_meetings))
        .route("/meetings/history", get(meeting_history))
        .route("/meetings/calendar", get(calendar_meetings))
        .route("/meetings/:id", get(get_meeting).patch(update_meeting))
        .route("/meeting-types", get(list_meeting_types))
}

#[tracing::instrument(skip(state))]
async fn list_meetings(
    State(state): State<SharedState>,
) -> Result<Json<Vec<EnrichedMeeting>>, ApiError> {
    state
        .with_db_read(meetings::get_meetings)
        .map(Json)
        .map_err(|e| ApiError::from_store("retrieve meetings", e))
}

/// Future meetings plus everything earlier today, soonest first.
#[tracing::instrument(skip(state))]
async fn upcoming_meetings(
    State(state): State<SharedState>,
) -> Result<Json<Vec<EnrichedMeeting>>, ApiError> {
    let now = Local::now();
    state
        .with_db_read(|db| meetings::upcoming_at(db, &now))
        .map(Json)
        .map_err(|e| ApiError::from_store("retrieve upcoming meetings", e))
}

/// Meetings before today, most recent first.
#[tracing::instrument(skip(state))]
async fn meeting_history(
    State(state): State<SharedState>,
) -> Result<Json<Vec<EnrichedMeeting>>, ApiError> {
    let now = Local::now();
    state
        .with_db_read(|db| meetings::history_at(db, &now))
        .map(Json)
        .map_err(|e| ApiError::from_store("retrieve meeting history", e))
}

#[tracing::instrument(skip(state))]
async fn calendar_meetings(
    State(state): State<SharedState>,
) -> Result<Json<Vec<EnrichedMeeting>>, ApiError> {
    state
        .with_db_read(meetings::get_meetings)
        .map(Json)
        .map_err(|e| ApiError::from_store("retrieve calendar meetings", e))
}

#[tracing::instrument(skip(state))]
async fn get_meeting(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<EnrichedMeeting>, ApiError> {
    let id = parse_id(&id, Entity::Meeting)?;
    state
        .with_db_read(|db| meetings::get_meeting(db, id))
        .map_err(|e| ApiError::from_store("retrieve meeting", e))?
        .map(Json)
        .ok_or(ApiError::NotFound(Entity::Meeting))
}

#[tracing::instrument(skip(state, body))]
async fn create_meeting(
    State(state): State<SharedState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EnrichedMeeting>), ApiError> {
    let input: InsertMeeting = decode(body)?;
    input.validate()?;

    let meeting = state
        .with_db_write(|db| meetings::create_meeting(db, input))
        .map_err(|e| ApiError::from_store("create meeting", e))?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

#[tracing::instrument(skip(state, body))]
async fn update_meeting(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<EnrichedMeeting>, ApiError> {
    let id = parse_id(&id, Entity::Meeting)?;
    let patch: MeetingPatch = decode(body)?;

    state
        .with_db_write(|db| meetings::update_meeting(db, id, patch))
        .map_err(|e| ApiError::from_store("update meeting", e))?
        .map(Json)
        .ok_or(ApiError::NotFound(Entity::Meeting))
}

#[tracing::instrument(skip(state))]
async fn list_meeting_types(State(state): State<SharedState>) -> Json<Vec<MeetingType>> {
    Json(state.with_db_read(|db| db.get_meeting_types()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};

    use crate::api::test_support::{get, router_with, send};
    use crate::db::test_utils::{insert_meeting, seed_client, test_db};
    use crate::types::InsertMeetingType;

    fn meeting_body(client_id: i64, start: &str, end: &str) -> Value {
        json!({
            "clientId": client_id,
            "title": "Quarterly review",
            "type": "strategy-review",
            "startTime": start,
            "endTime": end,
            "location": "teams",
            "participants": [{"name": "John Smith", "email": "john@acme.com"}]
        })
    }

    fn ids(body: &Value) -> Vec<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_create_meeting_enriches_and_ratchets() {
        let mut db = test_db();
        seed_client(&mut db, "Acme");
        let (app, state) = router_with(db);

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/meetings",
            Some(meeting_body(1, "2024-06-01T10:00:00.000Z", "2024-06-01T11:00:00.000Z")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "scheduled");
        assert_eq!(created["followUpStatus"], "none");
        assert_eq!(created["syncedWithCrm"], false);
        assert!(created["followUpDays"].is_null());

        let (status, fetched) = get(&app, "/api/meetings/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["client"]["name"], "Acme");
        assert_eq!(fetched["client"]["lastMeeting"], "2024-06-01T10:00:00.000Z");
        assert_eq!(fetched["startTime"], "2024-06-01T10:00:00.000Z");

        // An earlier meeting does not move lastMeeting back.
        send(
            &app,
            Method::POST,
            "/api/meetings",
            Some(meeting_body(1, "2024-05-01T10:00:00Z", "2024-05-01T10:30:00Z")),
        )
        .await;
        let last = state.db().get_client(1).unwrap().last_meeting.unwrap();
        assert_eq!(last.to_rfc3339(), "2024-06-01T10:00:00+00:00");
    }

    #[tokio::test]
    async fn test_create_meeting_validation() {
        let mut db = test_db();
        seed_client(&mut db, "Acme");
        let (app, state) = router_with(db);

        let mut missing_title = meeting_body(1, "2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z");
        missing_title.as_object_mut().unwrap().remove("title");
        let (status, body) = send(&app, Method::POST, "/api/meetings", Some(missing_title)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation error");

        let backwards = meeting_body(1, "2024-06-01T10:00:00Z", "2024-06-01T09:00:00Z");
        let (status, body) = send(&app, Method::POST, "/api/meetings", Some(backwards)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "endTime must be after startTime");

        let bad_time = meeting_body(1, "tomorrow", "2024-06-01T09:00:00Z");
        let (status, _) = send(&app, Method::POST, "/api/meetings", Some(bad_time)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(state.db().meeting_count(), 0);
    }

    #[tokio::test]
    async fn test_create_meeting_with_null_participants() {
        let mut db = test_db();
        seed_client(&mut db, "Acme");
        let (app, _) = router_with(db);

        let mut body = meeting_body(1, "2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z");
        body["participants"] = Value::Null;
        let (status, created) = send(&app, Method::POST, "/api/meetings", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["participants"], json!([]));
    }

    #[tokio::test]
    async fn test_create_meeting_for_unknown_client() {
        let (app, state) = router_with(test_db());
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/meetings",
            Some(meeting_body(5, "2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Client not found");
        assert_eq!(state.db().meeting_count(), 0);
    }

    #[tokio::test]
    async fn test_patch_unknown_meeting_is_404() {
        let mut db = test_db();
        seed_client(&mut db, "Acme");
        let (app, state) = router_with(db);

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/meetings/9999",
            Some(json!({"title": "Renamed"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Meeting not found");
        assert_eq!(state.db().meeting_count(), 0);
    }

    #[tokio::test]
    async fn test_patch_meeting_twice_is_stable() {
        let mut db = test_db();
        seed_client(&mut db, "Acme");
        let (app, _) = router_with(db);
        send(
            &app,
            Method::POST,
            "/api/meetings",
            Some(meeting_body(1, "2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z")),
        )
        .await;

        let patch = json!({"followUpStatus": "overdue", "followUpDays": 3, "notes": null});
        let (status, first) =
            send(&app, Method::PATCH, "/api/meetings/1", Some(patch.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = send(&app, Method::PATCH, "/api/meetings/1", Some(patch)).await;
        assert_eq!(first, second);
        assert_eq!(second["followUpStatus"], "overdue");
        assert_eq!(second["followUpDays"], 3);

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/meetings/1",
            Some(json!({"clientId": 42})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, unchanged) = get(&app, "/api/meetings/1").await;
        assert_eq!(unchanged["clientId"], 1);
    }

    #[tokio::test]
    async fn test_meeting_id_must_be_numeric() {
        let (app, _) = router_with(test_db());
        let (status, body) = get(&app, "/api/meetings/first").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid meeting ID");
        let (status, _) = get(&app, "/api/meetings/3").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upcoming_history_and_calendar() {
        let mut db = test_db();
        seed_client(&mut db, "Acme");
        let (app, _) = router_with(db);

        let now = Utc::now();
        for offset in [3, -5, 1, -2] {
            let start = now + Duration::days(offset);
            let body = json!({
                "clientId": 1,
                "title": "Sync",
                "type": "introduction",
                "startTime": start.to_rfc3339(),
                "endTime": (start + Duration::minutes(30)).to_rfc3339(),
                "location": "zoom"
            });
            send(&app, Method::POST, "/api/meetings", Some(body)).await;
        }

        let (status, upcoming) = get(&app, "/api/meetings/upcoming").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&upcoming), vec![3, 1]);
        assert_eq!(upcoming[0]["client"]["name"], "Acme");

        let (_, history) = get(&app, "/api/meetings/history").await;
        assert_eq!(ids(&history), vec![4, 2]);

        let (_, calendar) = get(&app, "/api/meetings/calendar").await;
        assert_eq!(ids(&calendar), vec![1, 2, 3, 4]);
        let (_, all) = get(&app, "/api/meetings").await;
        assert_eq!(all, calendar);
    }

    #[tokio::test]
    async fn test_dangling_client_is_an_internal_error() {
        let mut db = test_db();
        db.insert_meeting(insert_meeting(8, Utc::now()));
        let (app, _) = router_with(db);

        let (status, body) = get(&app, "/api/meetings").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to retrieve meetings"}));

        let (status, body) = get(&app, "/api/meetings/1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to retrieve meeting"}));
    }

    #[tokio::test]
    async fn test_meeting_types_listed_in_id_order() {
        let mut db = test_db();
        let types = [("Strategy Review", "strategy-review"), ("Sales Pitch", "sales-pitch")];
        for (label, value) in types {
            db.create_meeting_type(InsertMeetingType {
                label: label.to_string(),
                value: value.to_string(),
            })
            .unwrap();
        }
        let (app, _) = router_with(db);
        let (status, body) = get(&app, "/api/meeting-types").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": 1, "label": "Strategy Review", "value": "strategy-review"},
                {"id": 2, "label": "Sales Pitch", "value": "sales-pitch"}
            ])
        );
    }
}
