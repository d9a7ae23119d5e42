use chrono::Utc;

use super::MeetingDb;
use crate::types::{FollowUpStatus, InsertMeeting, Meeting, MeetingPatch};

impl MeetingDb {
    // =========================================================================
    // Meetings
    // =========================================================================
    //
    // Rows hold only `client_id`. Joining the client and maintaining
    // `Client.last_meeting` is `services::meetings`' job.

    /// All stored meetings, in id order, without their clients.
    pub fn get_meetings(&self) -> Vec<Meeting> {
        self.meetings.values().cloned().collect()
    }

    pub fn get_meeting(&self, id: i64) -> Option<Meeting> {
        self.meetings.get(id).cloned()
    }

    /// Insert a meeting with store defaults: status falls back to `scheduled`,
    /// follow-up starts at `none` with no day count, and nothing is synced yet.
    pub fn insert_meeting(&mut self, input: InsertMeeting) -> Meeting {
        let now = Utc::now();
        self.meetings
            .insert_with(|id| Meeting {
                id,
                client_id: input.client_id,
                title: input.title,
                meeting_type: input.meeting_type,
                start_time: input.start_time,
                end_time: input.end_time,
                location: input.location,
                status: input.status.unwrap_or_default(),
                participants: input.participants,
                agenda: input.agenda,
                notes: input.notes,
                follow_up_status: FollowUpStatus::None,
                follow_up_days: None,
                synced_with_crm: false,
                created_at: now,
            })
            .clone()
    }

    /// Insert a fully-formed row, bypassing defaults. The closure receives the new id.
    pub(crate) fn insert_meeting_record(&mut self, build: impl FnOnce(i64) -> Meeting) -> Meeting {
        self.meetings.insert_with(build).clone()
    }

    /// Shallow-merge `patch` onto the meeting. `None` when the id is unknown.
    pub fn update_meeting(&mut self, id: i64, patch: MeetingPatch) -> Option<Meeting> {
        let meeting = self.meetings.get_mut(id)?;
        patch.apply(meeting);
        Some(meeting.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::db::test_utils::{insert_meeting, test_db};
    use crate::types::{FollowUpStatus, MeetingPatch, MeetingStatus};

    #[test]
    fn test_insert_meeting_applies_defaults() {
        let mut db = test_db();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let meeting = db.insert_meeting(insert_meeting(1, start));

        assert_eq!(meeting.id, 1);
        assert_eq!(meeting.status, MeetingStatus::Scheduled);
        assert_eq!(meeting.follow_up_status, FollowUpStatus::None);
        assert_eq!(meeting.follow_up_days, None);
        assert!(!meeting.synced_with_crm);
    }

    #[test]
    fn test_insert_meeting_keeps_given_status() {
        let mut db = test_db();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let mut input = insert_meeting(1, start);
        input.status = Some(MeetingStatus::Confirmed);
        assert_eq!(db.insert_meeting(input).status, MeetingStatus::Confirmed);
    }

    #[test]
    fn test_update_meeting_unknown_id() {
        let mut db = test_db();
        assert!(db.update_meeting(9999, MeetingPatch::default()).is_none());
        assert_eq!(db.meeting_count(), 0);
    }

    #[test]
    fn test_update_meeting_does_not_bump_ids() {
        let mut db = test_db();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let meeting = db.insert_meeting(insert_meeting(1, start));
        let patch = MeetingPatch {
            synced_with_crm: Some(true),
            ..Default::default()
        };
        let updated = db.update_meeting(meeting.id, patch).unwrap();
        assert!(updated.synced_with_crm);
        assert_eq!(updated.id, meeting.id);
        assert_eq!(db.insert_meeting(insert_meeting(1, start)).id, 2);
    }
}
