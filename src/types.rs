//! Records held by the store and the payloads that create or patch them.
//!
//! All records serialize camelCase with timestamps in `2024-06-01T10:00:00.000Z` form.
//! Insert payloads carry only caller-owned fields; ids, creation timestamps and the
//! denormalized `lastMeeting` are assigned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::util::{
    double_option, null_as_default, timestamp, timestamp_option, timestamp_option_patch,
    timestamp_patch,
};

// =============================================================================
// Enums
// =============================================================================

/// Relationship state of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Potential,
}

/// Lifecycle of a meeting, independent of its follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
}

/// Post-meeting action urgency. Stored, never derived.
///
/// `Overdue` pairs with `followUpDays` = days past due; `DueSoon` means within about a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FollowUpStatus {
    #[default]
    None,
    DueSoon,
    Overdue,
    Completed,
    NotRequired,
}

/// Which CRM a simulated integration stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrmType {
    Salesforce,
    Microsoft,
    Google,
    Hubspot,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrmStatus {
    Connected,
    Pending,
    #[default]
    Disconnected,
}

// =============================================================================
// Clients
// =============================================================================

/// A person at a client company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub avatar_bg: Option<String>,
    pub avatar_color: Option<String>,
    pub notes: Option<String>,
    /// Latest meeting start seen for this client. Only ever moves forward on meeting create.
    #[serde(with = "timestamp_option")]
    pub last_meeting: Option<DateTime<Utc>>,
    pub contacts: Vec<Contact>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertClient {
    pub name: String,
    pub company: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ClientStatus,
    #[serde(default)]
    pub avatar_bg: Option<String>,
    #[serde(default)]
    pub avatar_color: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contacts: Vec<Contact>,
}

impl InsertClient {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("company", &self.company)?;
        require("email", &self.email)
    }
}

/// Partial client update. Absent fields are left alone; `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    pub status: Option<ClientStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_bg: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_color: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "timestamp_option_patch::deserialize")]
    pub last_meeting: Option<Option<DateTime<Utc>>>,
    pub contacts: Option<Vec<Contact>>,
}

impl ClientPatch {
    pub fn apply(self, client: &mut Client) {
        if let Some(name) = self.name {
            client.name = name;
        }
        if let Some(company) = self.company {
            client.company = company;
        }
        if let Some(email) = self.email {
            client.email = email;
        }
        if let Some(phone) = self.phone {
            client.phone = phone;
        }
        if let Some(status) = self.status {
            client.status = status;
        }
        if let Some(avatar_bg) = self.avatar_bg {
            client.avatar_bg = avatar_bg;
        }
        if let Some(avatar_color) = self.avatar_color {
            client.avatar_color = avatar_color;
        }
        if let Some(notes) = self.notes {
            client.notes = notes;
        }
        if let Some(last_meeting) = self.last_meeting {
            client.last_meeting = last_meeting;
        }
        if let Some(contacts) = self.contacts {
            client.contacts = contacts;
        }
    }
}

// =============================================================================
// Meetings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub email: String,
}

/// A stored meeting. Holds only the client's id; see [`EnrichedMeeting`] for reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: i64,
    pub client_id: i64,
    pub title: String,
    /// Key into the meeting-type reference list (`MeetingType::value`).
    #[serde(rename = "type")]
    pub meeting_type: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub status: MeetingStatus,
    pub participants: Vec<Participant>,
    pub agenda: Option<String>,
    pub notes: Option<String>,
    pub follow_up_status: FollowUpStatus,
    pub follow_up_days: Option<i64>,
    pub synced_with_crm: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Meeting joined with the current state of its client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMeeting {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub client: Client,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMeeting {
    pub client_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub meeting_type: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub status: Option<MeetingStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub agenda: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InsertMeeting {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("type", &self.meeting_type)?;
        require("location", &self.location)?;
        if self.end_time <= self.start_time {
            return Err(ValidationError::EndNotAfterStart);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPatch {
    pub client_id: Option<i64>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub meeting_type: Option<String>,
    #[serde(default, deserialize_with = "timestamp_patch::deserialize")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp_patch::deserialize")]
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub status: Option<MeetingStatus>,
    pub participants: Option<Vec<Participant>>,
    #[serde(default, deserialize_with = "double_option")]
    pub agenda: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub follow_up_status: Option<FollowUpStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub follow_up_days: Option<Option<i64>>,
    pub synced_with_crm: Option<bool>,
}

impl MeetingPatch {
    /// Shallow merge. Does not touch the owning client's `lastMeeting`.
    pub fn apply(self, meeting: &mut Meeting) {
        if let Some(client_id) = self.client_id {
            meeting.client_id = client_id;
        }
        if let Some(title) = self.title {
            meeting.title = title;
        }
        if let Some(meeting_type) = self.meeting_type {
            meeting.meeting_type = meeting_type;
        }
        if let Some(start_time) = self.start_time {
            meeting.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            meeting.end_time = end_time;
        }
        if let Some(location) = self.location {
            meeting.location = location;
        }
        if let Some(status) = self.status {
            meeting.status = status;
        }
        if let Some(participants) = self.participants {
            meeting.participants = participants;
        }
        if let Some(agenda) = self.agenda {
            meeting.agenda = agenda;
        }
        if let Some(notes) = self.notes {
            meeting.notes = notes;
        }
        if let Some(follow_up_status) = self.follow_up_status {
            meeting.follow_up_status = follow_up_status;
        }
        if let Some(follow_up_days) = self.follow_up_days {
            meeting.follow_up_days = follow_up_days;
        }
        if let Some(synced) = self.synced_with_crm {
            meeting.synced_with_crm = synced;
        }
    }
}

// =============================================================================
// Reference data + CRM
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingType {
    pub id: i64,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMeetingType {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmIntegration {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub crm_type: CrmType,
    pub status: CrmStatus,
    /// Opaque per-integration settings; never interpreted.
    pub config: serde_json::Value,
    #[serde(with = "timestamp_option")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCrmIntegration {
    pub name: String,
    #[serde(rename = "type")]
    pub crm_type: CrmType,
    #[serde(default)]
    pub status: CrmStatus,
    #[serde(default = "empty_config")]
    pub config: serde_json::Value,
}

impl InsertCrmIntegration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmIntegrationPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub crm_type: Option<CrmType>,
    pub status: Option<CrmStatus>,
    pub config: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "timestamp_option_patch::deserialize")]
    pub last_sync: Option<Option<DateTime<Utc>>>,
}

impl CrmIntegrationPatch {
    pub fn apply(self, integration: &mut CrmIntegration) {
        if let Some(name) = self.name {
            integration.name = name;
        }
        if let Some(crm_type) = self.crm_type {
            integration.crm_type = crm_type;
        }
        if let Some(status) = self.status {
            integration.status = status;
        }
        if let Some(config) = self.config {
            integration.config = config;
        }
        if let Some(last_sync) = self.last_sync {
            integration.last_sync = last_sync;
        }
    }
}

fn empty_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}
