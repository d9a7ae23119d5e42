use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;

use super::SharedState;
use crate::latency::LatencyRollupsPayload;
use crate::services::dashboard::{get_stats_at, DashboardStats};
use crate::services::reports::{get_report, ReportData, TimeRange};

const STATS_ROUTE: &str = "GET /api/stats";

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/reports", get(get_reports))
        .route("/diagnostics/latency", get(get_latency))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportQuery {
    time_range: Option<String>,
}

/// Dashboard cards, computed against the local clock on every call.
#[tracing::instrument(skip(state))]
async fn get_stats(State(state): State<SharedState>) -> Json<DashboardStats> {
    let budget_ms = u128::from(state.config.stats_latency_budget_ms);
    let stats = state.latency.time(STATS_ROUTE, budget_ms, || {
        let now = Local::now();
        state.with_db_read(|db| get_stats_at(db, &now))
    });
    Json(stats)
}

#[tracing::instrument]
async fn get_reports(Query(query): Query<ReportQuery>) -> Json<ReportData> {
    Json(get_report(TimeRange::parse(query.time_range.as_deref())))
}

#[tracing::instrument(skip(state))]
async fn get_latency(State(state): State<SharedState>) -> Json<LatencyRollupsPayload> {
    Json(state.latency.snapshot())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::json;

    use crate::api::test_support::{get, router_with};
    use crate::db::test_utils::test_db;
    use crate::types::{CrmIntegrationPatch, CrmStatus, CrmType, InsertCrmIntegration};

    fn integration(name: &str, crm_type: CrmType, status: CrmStatus) -> InsertCrmIntegration {
        InsertCrmIntegration {
            name: name.to_string(),
            crm_type,
            status,
            config: json!({}),
        }
    }

    fn hubspot_disconnected() -> InsertCrmIntegration {
        integration("HubSpot", CrmType::Hubspot, CrmStatus::Disconnected)
    }

    #[tokio::test]
    async fn test_stats_crm_synced() {
        let mut db = test_db();
        let salesforce = db.create_crm_integration(integration(
            "Salesforce",
            CrmType::Salesforce,
            CrmStatus::Connected,
        ));
        db.create_crm_integration(hubspot_disconnected());
        db.update_crm_integration(
            salesforce.id,
            CrmIntegrationPatch {
                last_sync: Some(Some(Utc::now() - Duration::minutes(10))),
                ..Default::default()
            },
        );
        let (app, _) = router_with(db);

        let (status, body) = get(&app, "/api/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["crmSync"],
            json!({
                "status": "Synced",
                "description": "10 min ago",
                "connectedServices": "Salesforce"
            })
        );
    }

    #[tokio::test]
    async fn test_stats_without_connected_crm() {
        let mut db = test_db();
        db.create_crm_integration(hubspot_disconnected());
        let (app, _) = router_with(db);

        let (_, body) = get(&app, "/api/stats").await;
        assert_eq!(
            body["crmSync"],
            json!({"status": "Not Connected", "description": "No CRM integrations"})
        );
        assert_eq!(body["upcomingMeetings"]["description"], "No upcoming meetings");
        assert_eq!(body["monthlyMeetings"]["change"], "+100% vs last month");
    }

    #[tokio::test]
    async fn test_stats_records_latency() {
        let (app, _) = router_with(test_db());
        get(&app, "/api/stats").await;
        get(&app, "/api/stats").await;

        let (status, body) = get(&app, "/api/diagnostics/latency").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["routes"][0]["route"], "GET /api/stats");
        assert_eq!(body["routes"][0]["sampleCount"], 2);
        assert_eq!(body["routes"][0]["budgetMs"], 100);
    }

    #[tokio::test]
    async fn test_reports_ignore_time_range() {
        let (app, _) = router_with(test_db());
        let (status, month) = get(&app, "/api/reports").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(month["summary"]["totalMeetings"], 32);

        let (_, week) = get(&app, "/api/reports?timeRange=week").await;
        let (status, odd) = get(&app, "/api/reports?timeRange=decade").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(month, week);
        assert_eq!(month, odd);
    }
}
