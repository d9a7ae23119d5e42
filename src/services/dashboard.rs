// Dashboard service
// Summary cards for the dashboard header. Derived on every request, never stored.

use chrono::{DateTime, Datelike, Months, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::db::MeetingDb;
use crate::services::meetings::{classify, is_same_day};
use crate::types::{CrmIntegration, CrmStatus, FollowUpStatus, Meeting};

/// Meetings-per-month goal shown under the monthly card: this month's count plus this.
const MONTHLY_GOAL_HEADROOM: usize = 5;

/// One summary card: a headline number plus two short captions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub count: usize,
    pub change: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmSyncSummary {
    pub status: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_services: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub upcoming_meetings: StatCard,
    pub followups: StatCard,
    pub monthly_meetings: StatCard,
    pub crm_sync: CrmSyncSummary,
}

/// Build all dashboard cards relative to `now`. Calendar-day and month boundaries
/// are taken in `now`'s timezone.
pub fn get_stats_at<Tz: TimeZone>(db: &MeetingDb, now: &DateTime<Tz>) -> DashboardStats {
    let meetings = db.get_meetings();
    let (upcoming, history) = classify(meetings.clone(), now);

    DashboardStats {
        upcoming_meetings: upcoming_card(&upcoming, now),
        followups: followups_card(&history, now),
        monthly_meetings: monthly_card(&meetings, now),
        crm_sync: crm_sync_summary_at(&db.get_crm_integrations(), now.with_timezone(&Utc)),
    }
}

fn upcoming_card<Tz: TimeZone>(upcoming: &[Meeting], now: &DateTime<Tz>) -> StatCard {
    let today = upcoming
        .iter()
        .filter(|m| is_same_day(&m.start_time, now))
        .count();

    StatCard {
        count: upcoming.len(),
        change: if today > 0 {
            format!("+{today} today")
        } else {
            "None today".to_string()
        },
        description: match upcoming.first() {
            Some(next) => format!(
                "Next in {}",
                time_until_phrase(next.start_time, now.with_timezone(&Utc))
            ),
            None => "No upcoming meetings".to_string(),
        },
    }
}

fn followups_card<Tz: TimeZone>(history: &[Meeting], now: &DateTime<Tz>) -> StatCard {
    let overdue: Vec<&Meeting> = history
        .iter()
        .filter(|m| m.follow_up_status == FollowUpStatus::Overdue)
        .collect();
    let oldest = overdue.iter().map(|m| m.start_time).min();

    StatCard {
        count: overdue.len(),
        change: if overdue.is_empty() {
            String::new()
        } else {
            format!("{} overdue", overdue.len())
        },
        description: match oldest {
            Some(start) => format!(
                "Oldest from {}",
                start.with_timezone(&now.timezone()).date_naive().format("%b %-d")
            ),
            None => "No follow-ups needed".to_string(),
        },
    }
}

fn monthly_card<Tz: TimeZone>(meetings: &[Meeting], now: &DateTime<Tz>) -> StatCard {
    let this_month = month_start(now, 0);
    let last_month = month_start(now, 1);

    let current = meetings
        .iter()
        .filter(|m| m.start_time >= this_month)
        .count();
    let previous = meetings
        .iter()
        .filter(|m| m.start_time >= last_month && m.start_time < this_month)
        .count();

    let pct = percent_change(current, previous);
    let sign = if pct > 0 { "+" } else { "" };

    StatCard {
        count: current,
        change: format!("{sign}{pct}% vs last month"),
        description: format!("Goal: {}", current + MONTHLY_GOAL_HEADROOM),
    }
}

/// CRM card. Only `connected` integrations count; the freshest non-null `last_sync`
/// among them drives the caption.
pub fn crm_sync_summary_at(integrations: &[CrmIntegration], now: DateTime<Utc>) -> CrmSyncSummary {
    let connected: Vec<&CrmIntegration> = integrations
        .iter()
        .filter(|c| c.status == CrmStatus::Connected)
        .collect();

    if connected.is_empty() {
        return CrmSyncSummary {
            status: "Not Connected".to_string(),
            description: "No CRM integrations".to_string(),
            connected_services: None,
        };
    }

    let Some(latest) = connected.iter().filter_map(|c| c.last_sync).max() else {
        return CrmSyncSummary {
            status: "Connected".to_string(),
            description: "No sync yet".to_string(),
            connected_services: None,
        };
    };

    let names = connected
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    CrmSyncSummary {
        status: "Synced".to_string(),
        description: format!("{} ago", elapsed_phrase(latest, now)),
        connected_services: Some(names),
    }
}

/// "45 minutes", "1 hour", "3 hours"; "in progress" once the start has passed.
pub fn time_until_phrase(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = start - now;
    if diff < chrono::Duration::zero() {
        return "in progress".to_string();
    }
    let minutes = diff.num_minutes();
    if minutes < 60 {
        format!("{minutes} minutes")
    } else {
        hours_phrase(minutes / 60)
    }
}

/// "10 min", "1 hour", "5 hours". A timestamp in the future reads as 0 min.
pub fn elapsed_phrase(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - since).num_minutes().max(0);
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        hours_phrase(minutes / 60)
    }
}

fn hours_phrase(hours: i64) -> String {
    if hours == 1 {
        "1 hour".to_string()
    } else {
        format!("{hours} hours")
    }
}

/// Whole-percent change, halves rounded toward +infinity. 100 when there is no baseline.
pub fn percent_change(current: usize, previous: usize) -> i64 {
    if previous == 0 {
        return 100;
    }
    let ratio = (current as f64 - previous as f64) / previous as f64 * 100.0;
    (ratio + 0.5).floor() as i64
}

/// Midnight on the first of the month, `months_back` months before `now`'s month.
fn month_start<Tz: TimeZone>(now: &DateTime<Tz>, months_back: u32) -> DateTime<Utc> {
    let today = now.date_naive();
    let first = today
        .with_day(1)
        .and_then(|d| d.checked_sub_months(Months::new(months_back)))
        .unwrap_or(today);
    let midnight = first.and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
