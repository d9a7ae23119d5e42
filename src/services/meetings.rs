// Meetings service
// Client join on read, lastMeeting ratchet on create, upcoming/history classification.

use chrono::{DateTime, TimeZone, Utc};

use crate::db::MeetingDb;
use crate::error::StoreError;
use crate::types::{EnrichedMeeting, InsertMeeting, Meeting, MeetingPatch};

/// Attach the client as it is right now. Never cached.
///
/// A meeting whose client is gone is an internal-consistency failure, not a partial record.
pub fn enrich(db: &MeetingDb, meeting: Meeting) -> Result<EnrichedMeeting, StoreError> {
    let client = db
        .get_client(meeting.client_id)
        .ok_or(StoreError::MissingClient {
            meeting_id: meeting.id,
            client_id: meeting.client_id,
        })?;
    Ok(EnrichedMeeting { meeting, client })
}

pub fn enrich_all(
    db: &MeetingDb,
    meetings: Vec<Meeting>,
) -> Result<Vec<EnrichedMeeting>, StoreError> {
    meetings.into_iter().map(|m| enrich(db, m)).collect()
}

/// Every meeting, enriched, in id order.
pub fn get_meetings(db: &MeetingDb) -> Result<Vec<EnrichedMeeting>, StoreError> {
    enrich_all(db, db.get_meetings())
}

pub fn get_meeting(db: &MeetingDb, id: i64) -> Result<Option<EnrichedMeeting>, StoreError> {
    db.get_meeting(id).map(|m| enrich(db, m)).transpose()
}

/// A client's meetings, earliest first. `None` when the client is unknown.
pub fn meetings_for_client(
    db: &MeetingDb,
    client_id: i64,
) -> Result<Option<Vec<EnrichedMeeting>>, StoreError> {
    if !db.has_client(client_id) {
        return Ok(None);
    }
    let mut meetings: Vec<Meeting> = db
        .get_meetings()
        .into_iter()
        .filter(|m| m.client_id == client_id)
        .collect();
    meetings.sort_by_key(|m| m.start_time);
    enrich_all(db, meetings).map(Some)
}

/// Insert a meeting and move its client's `last_meeting` forward if this one is later.
///
/// Caller holds the store lock for the whole call, so the insert and the ratchet land together.
pub fn create_meeting(
    db: &mut MeetingDb,
    input: InsertMeeting,
) -> Result<EnrichedMeeting, StoreError> {
    if !db.has_client(input.client_id) {
        return Err(StoreError::ClientNotFound(input.client_id));
    }
    let meeting = db.insert_meeting(input);
    advance_last_meeting(db, meeting.client_id, meeting.start_time);
    log::info!(
        "Created meeting {} for client {} at {}",
        meeting.id,
        meeting.client_id,
        meeting.start_time
    );
    enrich(db, meeting)
}

/// Patch a meeting. `Ok(None)` when the meeting id is unknown.
///
/// Moving `start_time` does not recompute the client's `last_meeting`.
pub fn update_meeting(
    db: &mut MeetingDb,
    id: i64,
    patch: MeetingPatch,
) -> Result<Option<EnrichedMeeting>, StoreError> {
    if db.get_meeting(id).is_none() {
        return Ok(None);
    }
    if let Some(client_id) = patch.client_id {
        if !db.has_client(client_id) {
            return Err(StoreError::ClientNotFound(client_id));
        }
    }
    db.update_meeting(id, patch)
        .map(|m| enrich(db, m))
        .transpose()
}

/// Forward-only update of `Client.last_meeting`. Returns whether it moved.
pub(crate) fn advance_last_meeting(
    db: &mut MeetingDb,
    client_id: i64,
    start: DateTime<Utc>,
) -> bool {
    let Some(client) = db.client_mut(client_id) else {
        log::warn!("Meeting references unknown client {client_id}; lastMeeting not updated");
        return false;
    };
    match client.last_meeting {
        Some(current) if start <= current => false,
        _ => {
            client.last_meeting = Some(start);
            true
        }
    }
}

// =============================================================================
// Temporal classification
// =============================================================================

/// Same calendar day as `now`, in `now`'s timezone.
pub fn is_same_day<Tz: TimeZone>(ts: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    ts.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

/// Upcoming = starts at or after `now`, or anywhere on today's date.
///
/// Earlier-today meetings count as upcoming so the morning's meetings stay on "Today".
pub fn is_upcoming<Tz: TimeZone>(start: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    *start >= now.with_timezone(&Utc) || is_same_day(start, now)
}

/// Split meetings into (upcoming ascending, history descending).
pub fn classify<Tz: TimeZone>(
    meetings: Vec<Meeting>,
    now: &DateTime<Tz>,
) -> (Vec<Meeting>, Vec<Meeting>) {
    let (mut upcoming, mut history): (Vec<Meeting>, Vec<Meeting>) = meetings
        .into_iter()
        .partition(|m| is_upcoming(&m.start_time, now));
    upcoming.sort_by_key(|m| m.start_time);
    history.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    (upcoming, history)
}

pub fn upcoming_at<Tz: TimeZone>(
    db: &MeetingDb,
    now: &DateTime<Tz>,
) -> Result<Vec<EnrichedMeeting>, StoreError> {
    let (upcoming, _) = classify(db.get_meetings(), now);
    enrich_all(db, upcoming)
}

pub fn history_at<Tz: TimeZone>(
    db: &MeetingDb,
    now: &DateTime<Tz>,
) -> Result<Vec<EnrichedMeeting>, StoreError> {
    let (_, history) = classify(db.get_meetings(), now);
    enrich_all(db, history)
}
