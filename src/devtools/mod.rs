//! Demo data for a fresh store.
//!
//! Everything is placed relative to `now` so the dashboard always has meetings today,
//! a recent history with mixed follow-up states, and a CRM that synced minutes ago.
//! Rows go through the same store paths as API writes, so `lastMeeting` is
//! maintained by the normal ratchet.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use crate::db::MeetingDb;
use crate::error::StoreError;
use crate::services::meetings::advance_last_meeting;
use crate::types::{
    ClientStatus, Contact, CrmIntegration, CrmStatus, CrmType, FollowUpStatus, InsertClient,
    InsertMeetingType, Meeting, MeetingStatus, Participant,
};

const HOST_NAME: &str = "Sarah Johnson";
const HOST_EMAIL: &str = "sarah.johnson@yourdomain.com";

const MEETING_TYPES: [(&str, &str); 7] = [
    ("Strategy Review", "strategy-review"),
    ("Sales Pitch", "sales-pitch"),
    ("Contract Discussion", "contract-discussion"),
    ("Introduction", "introduction"),
    ("Partnership Discussion", "partnership-discussion"),
    ("Product Demo", "product-demo"),
    ("Investment Opportunity", "investment-opportunity"),
];

/// Row counts written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub meeting_types: usize,
    pub crm_integrations: usize,
    pub clients: usize,
    pub meetings: usize,
}

/// One fixture meeting before it is stored.
struct SeedMeeting {
    client_id: i64,
    title: &'static str,
    meeting_type: &'static str,
    start: DateTime<Utc>,
    minutes: i64,
    location: &'static str,
    status: MeetingStatus,
    guests: Vec<Participant>,
    agenda: &'static str,
    notes: Option<&'static str>,
    follow_up_status: FollowUpStatus,
    follow_up_days: Option<i64>,
}

/// Populate an empty store. "Today" is `now`'s calendar day in `now`'s timezone.
pub fn seed_demo_data<Tz: TimeZone>(
    db: &mut MeetingDb,
    now: &DateTime<Tz>,
) -> Result<SeedSummary, StoreError> {
    let now_utc = now.with_timezone(&Utc);

    for (label, value) in MEETING_TYPES {
        db.create_meeting_type(InsertMeetingType {
            label: label.to_string(),
            value: value.to_string(),
        })?;
    }

    let synced = now_utc - Duration::minutes(15);
    let integrations = [
        ("Salesforce", CrmType::Salesforce, CrmStatus::Connected, Some(synced)),
        ("Microsoft Dynamics", CrmType::Microsoft, CrmStatus::Pending, None),
        ("Google Calendar", CrmType::Google, CrmStatus::Connected, Some(synced)),
        ("HubSpot", CrmType::Hubspot, CrmStatus::Disconnected, None),
    ];
    for (name, crm_type, status, last_sync) in integrations {
        db.insert_crm_record(|id| CrmIntegration {
            id,
            name: name.to_string(),
            crm_type,
            status,
            config: serde_json::json!({}),
            last_sync,
            created_at: now_utc,
        });
    }

    let [acme, techstart, shipping, nova] = demo_clients().map(|input| db.create_client(input).id);

    let mut meetings = vec![
        SeedMeeting {
            client_id: acme,
            title: "Acme Corp Strategy Review",
            meeting_type: "strategy-review",
            start: today_at(now, 11, 0),
            minutes: 60,
            location: "teams",
            status: MeetingStatus::Confirmed,
            guests: vec![
                participant("John Smith", "john.smith@acme.com"),
                participant("Emily Davis", "emily.davis@acme.com"),
            ],
            agenda: "Review Q3 strategy and discuss expansion plans",
            notes: None,
            follow_up_status: FollowUpStatus::None,
            follow_up_days: None,
        },
        SeedMeeting {
            client_id: techstart,
            title: "TechStart Product Demo",
            meeting_type: "product-demo",
            start: today_at(now, 13, 30),
            minutes: 60,
            location: "zoom",
            status: MeetingStatus::Scheduled,
            guests: vec![participant("Michael Johnson", "michael.johnson@techstart.com")],
            agenda: "Demonstrate new features of the platform",
            notes: None,
            follow_up_status: FollowUpStatus::None,
            follow_up_days: None,
        },
        SeedMeeting {
            client_id: shipping,
            title: "Global Shipping Partners",
            meeting_type: "partnership-discussion",
            start: today_at(now, 15, 0),
            minutes: 60,
            location: "in-person",
            status: MeetingStatus::Scheduled,
            guests: vec![participant("Robert Chen", "robert.chen@globalshipping.com")],
            agenda: "Discuss logistics partnership opportunities",
            notes: None,
            follow_up_status: FollowUpStatus::None,
            follow_up_days: None,
        },
    ];

    let days_ago = |n: i64| now_utc - Duration::days(n);
    meetings.extend([
        SeedMeeting {
            client_id: acme,
            title: "Acme Corporation Strategy Review",
            meeting_type: "strategy-review",
            start: days_ago(4),
            minutes: 60,
            location: "teams",
            status: MeetingStatus::Completed,
            guests: vec![participant("John Smith", "john.smith@acme.com")],
            agenda: "Initial review of strategy for Q3",
            notes: Some(
                "Client interested in expanding partnership. Follow up needed on pricing details.",
            ),
            follow_up_status: FollowUpStatus::DueSoon,
            follow_up_days: Some(1),
        },
        SeedMeeting {
            client_id: techstart,
            title: "TechStart Inc. Contract Negotiation",
            meeting_type: "contract-discussion",
            start: days_ago(6),
            minutes: 90,
            location: "zoom",
            status: MeetingStatus::Completed,
            guests: vec![participant("Michael Johnson", "michael.johnson@techstart.com")],
            agenda: "Review contract terms and negotiate pricing",
            notes: Some("Need to follow up with revised proposal"),
            follow_up_status: FollowUpStatus::Overdue,
            follow_up_days: Some(2),
        },
        SeedMeeting {
            client_id: shipping,
            title: "Global Shipping Partnership Discussion",
            meeting_type: "partnership-discussion",
            start: days_ago(9),
            minutes: 45,
            location: "in-person",
            status: MeetingStatus::Completed,
            guests: vec![participant("Robert Chen", "robert.chen@globalshipping.com")],
            agenda: "Initial partnership discussion",
            notes: Some("Successful meeting, all follow-ups completed"),
            follow_up_status: FollowUpStatus::Completed,
            follow_up_days: None,
        },
        SeedMeeting {
            client_id: nova,
            title: "Nova Ventures Investment Opportunity",
            meeting_type: "investment-opportunity",
            start: days_ago(12),
            minutes: 60,
            location: "google-meet",
            status: MeetingStatus::Rescheduled,
            guests: vec![participant("Sarah Kim", "sarah.kim@novaventures.com")],
            agenda: "Present investment opportunity",
            notes: Some("Rescheduled due to client emergency"),
            follow_up_status: FollowUpStatus::NotRequired,
            follow_up_days: None,
        },
    ]);

    for seed in meetings {
        let client_id = seed.client_id;
        let start = seed.start;
        db.insert_meeting_record(|id| seed.into_meeting(id));
        advance_last_meeting(db, client_id, start);
    }

    let summary = SeedSummary {
        meeting_types: db.meeting_type_count(),
        crm_integrations: db.crm_integration_count(),
        clients: db.client_count(),
        meetings: db.meeting_count(),
    };
    log::info!(
        "Seeded demo data: {} meeting types, {} CRM integrations, {} clients, {} meetings",
        summary.meeting_types,
        summary.crm_integrations,
        summary.clients,
        summary.meetings
    );
    Ok(summary)
}

impl SeedMeeting {
    fn into_meeting(self, id: i64) -> Meeting {
        let mut participants = self.guests;
        participants.push(participant(HOST_NAME, HOST_EMAIL));

        Meeting {
            id,
            client_id: self.client_id,
            title: self.title.to_string(),
            meeting_type: self.meeting_type.to_string(),
            start_time: self.start,
            end_time: self.start + Duration::minutes(self.minutes),
            location: self.location.to_string(),
            status: self.status,
            participants,
            agenda: Some(self.agenda.to_string()),
            notes: self.notes.map(str::to_string),
            follow_up_status: self.follow_up_status,
            follow_up_days: self.follow_up_days,
            synced_with_crm: false,
            created_at: self.start - Duration::days(7),
        }
    }
}

fn demo_clients() -> [InsertClient; 4] {
    [
        client(
            ("Acme Corporation", "Acme Inc.", "john.smith@acme.com", "555-123-4567"),
            ClientStatus::Active,
            ("bg-indigo-100", "text-accent"),
            "Major client, interested in a full platform license",
            vec![
                contact("John Smith", "CEO", "john.smith@acme.com", "555-123-4567"),
                contact("Emily Davis", "CTO", "emily.davis@acme.com", "555-987-6543"),
            ],
        ),
        client(
            ("TechStart Inc.", "TechStart", "michael.johnson@techstart.com", "555-222-3333"),
            ClientStatus::Active,
            ("bg-blue-100", "text-blue-600"),
            "Startup looking for enterprise tools",
            vec![contact(
                "Michael Johnson",
                "Product Manager",
                "michael.johnson@techstart.com",
                "555-222-3333",
            )],
        ),
        client(
            (
                "Global Shipping",
                "Global Shipping Partners",
                "robert.chen@globalshipping.com",
                "555-444-5555",
            ),
            ClientStatus::Active,
            ("bg-green-100", "text-green-600"),
            "Interested in logistics optimization",
            vec![contact(
                "Robert Chen",
                "VP Operations",
                "robert.chen@globalshipping.com",
                "555-444-5555",
            )],
        ),
        client(
            ("Nova Ventures", "Nova Ventures LLC", "sarah.kim@novaventures.com", "555-666-7777"),
            ClientStatus::Potential,
            ("bg-purple-100", "text-purple-600"),
            "Looking for investment opportunities in tech",
            vec![contact(
                "Sarah Kim",
                "Managing Partner",
                "sarah.kim@novaventures.com",
                "555-666-7777",
            )],
        ),
    ]
}

fn client(
    (name, company, email, phone): (&str, &str, &str, &str),
    status: ClientStatus,
    (avatar_bg, avatar_color): (&str, &str),
    notes: &str,
    contacts: Vec<Contact>,
) -> InsertClient {
    InsertClient {
        name: name.to_string(),
        company: company.to_string(),
        email: email.to_string(),
        phone: Some(phone.to_string()),
        status,
        avatar_bg: Some(avatar_bg.to_string()),
        avatar_color: Some(avatar_color.to_string()),
        notes: Some(notes.to_string()),
        contacts,
    }
}

fn contact(name: &str, title: &str, email: &str, phone: &str) -> Contact {
    Contact {
        name: name.to_string(),
        title: title.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    }
}

fn participant(name: &str, email: &str) -> Participant {
    Participant {
        name: name.to_string(),
        email: email.to_string(),
    }
}

/// `hour:minute` on `now`'s calendar day, as wall-clock time in `now`'s timezone.
fn today_at<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32, minute: u32) -> DateTime<Utc> {
    let local = now
        .date_naive()
        .and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN));
    now.timezone()
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| local.and_utc())
}
