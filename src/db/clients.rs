use chrono::Utc;

use super::MeetingDb;
use crate::types::{Client, ClientPatch, InsertClient};

impl MeetingDb {
    // =========================================================================
    // Clients
    // =========================================================================

    /// All clients, in id order.
    pub fn get_clients(&self) -> Vec<Client> {
        self.clients.values().cloned().collect()
    }

    pub fn get_client(&self, id: i64) -> Option<Client> {
        self.clients.get(id).cloned()
    }

    pub fn has_client(&self, id: i64) -> bool {
        self.clients.get(id).is_some()
    }

    /// Insert a client. `lastMeeting` always starts out empty.
    pub fn create_client(&mut self, input: InsertClient) -> Client {
        let now = Utc::now();
        self.clients
            .insert_with(|id| Client {
                id,
                name: input.name,
                company: input.company,
                email: input.email,
                phone: input.phone,
                status: input.status,
                avatar_bg: input.avatar_bg,
                avatar_color: input.avatar_color,
                notes: input.notes,
                last_meeting: None,
                contacts: input.contacts,
                created_at: now,
            })
            .clone()
    }

    /// Shallow-merge `patch` onto the client. `None` when the id is unknown.
    pub fn update_client(&mut self, id: i64, patch: ClientPatch) -> Option<Client> {
        let client = self.clients.get_mut(id)?;
        patch.apply(client);
        Some(client.clone())
    }

    pub(crate) fn client_mut(&mut self, id: i64) -> Option<&mut Client> {
        self.clients.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_utils::{insert_client, test_db};
    use crate::types::{ClientPatch, ClientStatus};

    #[test]
    fn test_create_client_assigns_increasing_ids() {
        let mut db = test_db();
        let mut last = 0;
        for name in ["Acme", "Globex", "Initech"] {
            let client = db.create_client(insert_client(name));
            assert!(client.id > last);
            last = client.id;
        }
        assert_eq!(db.client_count(), 3);
    }

    #[test]
    fn test_create_client_starts_without_last_meeting() {
        let mut db = test_db();
        let client = db.create_client(insert_client("Acme"));
        assert!(client.last_meeting.is_none());
        assert_eq!(client.status, ClientStatus::Active);
        assert_eq!(db.get_client(client.id), Some(client));
    }

    #[test]
    fn test_get_client_unknown_is_none() {
        let db = test_db();
        assert!(db.get_client(1).is_none());
        assert!(!db.has_client(1));
    }

    #[test]
    fn test_update_client_merges_only_given_fields() {
        let mut db = test_db();
        let client = db.create_client(insert_client("Acme"));
        let patch: ClientPatch =
            serde_json::from_value(serde_json::json!({"status": "inactive", "notes": "Paused"}))
                .unwrap();

        let updated = db.update_client(client.id, patch).expect("client exists");
        assert_eq!(updated.status, ClientStatus::Inactive);
        assert_eq!(updated.notes.as_deref(), Some("Paused"));
        assert_eq!(updated.name, client.name);
        assert_eq!(updated.created_at, client.created_at);
    }

    #[test]
    fn test_update_client_unknown_id_changes_nothing() {
        let mut db = test_db();
        db.create_client(insert_client("Acme"));
        let before = db.get_clients();
        assert!(db.update_client(99, ClientPatch::default()).is_none());
        assert_eq!(db.get_clients(), before);
    }

    #[test]
    fn test_repeated_patch_is_idempotent() {
        let mut db = test_db();
        let client = db.create_client(insert_client("Acme"));
        let body = serde_json::json!({"company": "Acme Holdings", "phone": null});

        let first = db
            .update_client(client.id, serde_json::from_value(body.clone()).unwrap())
            .unwrap();
        let second = db
            .update_client(client.id, serde_json::from_value(body).unwrap())
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(db.client_count(), 1);
    }
}
