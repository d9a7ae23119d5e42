//! In-memory entity store for clients, meetings, meeting types and CRM integrations.
//!
//! The store is volatile: it lives as long as the process and is rebuilt (and optionally
//! re-seeded) on every start. Each entity kind is an id-keyed [`Table`] with its own
//! monotonic counter. Ids start at 1, are assigned in insertion order and are never
//! reused; nothing is ever deleted.
//!
//! Reads return owned clones so callers never hold borrows into the store across the
//! lock in [`crate::state::AppState`]. Unknown ids come back as `None`.

use std::collections::BTreeMap;

mod clients;
mod crm;
mod meeting_types;
mod meetings;

/// One identity-keyed collection with its id counter.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    /// Assign the next id, build the row with it, and store it.
    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(build(id))
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// Rows in id order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The whole store. Wrap it in a single lock; no method here is safe to interleave.
#[derive(Debug, Default)]
pub struct MeetingDb {
    clients: Table<crate::types::Client>,
    meetings: Table<crate::types::Meeting>,
    meeting_types: Table<crate::types::MeetingType>,
    crm_integrations: Table<crate::types::CrmIntegration>,
}

impl MeetingDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }

    pub fn meeting_type_count(&self) -> usize {
        self.meeting_types.len()
    }

    pub fn crm_integration_count(&self) -> usize {
        self.crm_integrations.len()
    }
}

#[cfg(test)]
pub mod test_utils {
    use chrono::{DateTime, Utc};

    use super::MeetingDb;
    use crate::types::{Client, InsertClient, InsertMeeting};

    /// Empty store for a single test.
    pub fn test_db() -> MeetingDb {
        MeetingDb::new()
    }

    pub fn insert_client(name: &str) -> InsertClient {
        InsertClient {
            name: name.to_string(),
            company: format!("{name} Inc."),
            email: format!("hello@{}.com", name.to_lowercase()),
            phone: None,
            status: Default::default(),
            avatar_bg: None,
            avatar_color: None,
            notes: None,
            contacts: vec![],
        }
    }

    pub fn seed_client(db: &mut MeetingDb, name: &str) -> Client {
        db.create_client(insert_client(name))
    }

    pub fn insert_meeting(client_id: i64, start: DateTime<Utc>) -> InsertMeeting {
        InsertMeeting {
            client_id,
            title: format!("Meeting at {}", start.format("%Y-%m-%d %H:%M")),
            meeting_type: "strategy-review".to_string(),
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            location: "zoom".to_string(),
            status: None,
            participants: vec![],
            agenda: None,
            notes: None,
        }
    }
}
