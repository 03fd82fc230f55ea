//! Startup seeding
//!
//! Loads the default event vocabularies and a year of demo meetings into
//! an empty store.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc, Weekday};
use tracing::info;

use super::{MeetingStore, MetadataStore, StoreResult};
use crate::models::{
    AttendanceModeDefinition, EventStatusDefinition, Meeting, MetadataItem, ATTENDANCE_MODE_TYPE,
    EVENT_STATUS_TYPE,
};

const MEETING_LOCATION: &str = "Riverside Innovation Hub, 42 Harbour Street";
const SEEDED_MONTHS: u32 = 10;

/// Talk topics cycled through by the seeded meetings.
const TOPICS: [(&str, &str, &[&str]); 10] = [
    (
        "Getting Started with Async Rust",
        "A tour of futures, executors and the tokio runtime, ending with a small HTTP service.",
        &["rust", "async", "tokio"],
    ),
    (
        "Designing REST APIs That Last",
        "Resource modelling, versioning and error contracts for long-lived HTTP APIs.",
        &["api", "rest", "http"],
    ),
    (
        "Caching Without Tears",
        "When to cache, how to invalidate, and how to keep concurrent misses from stampeding the database.",
        &["caching", "performance", "concurrency"],
    ),
    (
        "Document Databases in Practice",
        "Partition keys, query patterns and schema evolution for document stores.",
        &["database", "nosql", "data modelling"],
    ),
    (
        "Observability for Small Teams",
        "Structured logging, tracing and the three dashboards every service needs.",
        &["observability", "tracing", "logging"],
    ),
    (
        "Testing Strategies for Web Services",
        "Unit, property and integration testing for request handlers and their stores.",
        &["testing", "property testing", "integration tests"],
    ),
    (
        "Containers and Local Development",
        "Reproducible developer environments and fast inner loops with containers.",
        &["containers", "docker", "developer experience"],
    ),
    (
        "Securing Admin Endpoints",
        "Tokens, roles and least privilege for the routes that change data.",
        &["security", "authorization", "tokens"],
    ),
    (
        "Event Vocabularies and Structured Data",
        "Using schema.org Event types to describe meetups so search engines understand them.",
        &["schema.org", "structured data", "events"],
    ),
    (
        "What's New in the Ecosystem",
        "A roundup of this year's releases, tooling improvements and community news.",
        &["ecosystem", "releases", "community"],
    ),
];

/// Default event status vocabulary.
pub fn default_event_statuses() -> Vec<EventStatusDefinition> {
    vec![
        EventStatusDefinition::new("EventScheduled", "Scheduled", 1),
        EventStatusDefinition::new("EventCancelled", "Cancelled", 2),
        EventStatusDefinition::new("EventMovedOnline", "Moved Online", 3),
        EventStatusDefinition::new("EventPostponed", "Postponed", 4),
        EventStatusDefinition::new("EventRescheduled", "Rescheduled", 5)
            .requiring_previous_start_date(),
    ]
}

/// Default attendance mode vocabulary.
pub fn default_attendance_modes() -> Vec<AttendanceModeDefinition> {
    vec![
        AttendanceModeDefinition::new("OfflineEventAttendanceMode", "In Person", 1),
        AttendanceModeDefinition::new("OnlineEventAttendanceMode", "Online", 2),
        AttendanceModeDefinition::new("MixedEventAttendanceMode", "Hybrid", 3),
    ]
}

/// Inserts the default vocabularies for every category that is empty.
///
/// Returns the number of items created.
pub async fn seed_metadata<S: MetadataStore>(store: &S) -> StoreResult<usize> {
    let mut created = 0;

    if store.query_by_type(EVENT_STATUS_TYPE).await?.is_empty() {
        for status in default_event_statuses() {
            store.create(MetadataItem::from(status)).await?;
            created += 1;
        }
    }

    if store.query_by_type(ATTENDANCE_MODE_TYPE).await?.is_empty() {
        for mode in default_attendance_modes() {
            store.create(MetadataItem::from(mode)).await?;
            created += 1;
        }
    }

    if created > 0 {
        info!(created, "seeded metadata vocabularies");
    }
    Ok(created)
}

/// 18:00 UTC on the third Wednesday of the month containing `month`.
pub fn third_wednesday_evening(month: NaiveDate) -> Option<DateTime<Utc>> {
    let first = NaiveDate::from_ymd_opt(month.year(), month.month(), 1)?;
    let offset = (7 + Weekday::Wed.num_days_from_monday() as i64
        - first.weekday().num_days_from_monday() as i64)
        % 7;
    let day = first + Duration::days(offset + 14);
    Some(day.and_hms_opt(18, 0, 0)?.and_utc())
}

/// Builds the monthly demo meetings ending in the month of `now`.
pub fn demo_meetings(now: DateTime<Utc>) -> Vec<Meeting> {
    let this_month = now.date_naive();

    (0..SEEDED_MONTHS)
        .filter_map(|i| {
            let month = this_month.checked_sub_months(Months::new(SEEDED_MONTHS - 1 - i))?;
            let start = third_wednesday_evening(month)?;
            let (title, description, keywords) = TOPICS[i as usize % TOPICS.len()];

            let mut meeting = Meeting::new(title, start, start + Duration::hours(2));
            meeting.description = description.to_string();
            meeting.keywords = keywords.iter().map(|k| k.to_string()).collect();
            meeting.location = Some(MEETING_LOCATION.to_string());
            meeting.is_accessible_for_free = Some(true);
            meeting.audience = Some("Software Developers".to_string());
            meeting.event_attendance_mode = Some("OfflineEventAttendanceMode".to_string());
            meeting.event_status = Some("EventScheduled".to_string());
            meeting.maximum_attendee_capacity = Some(50);
            meeting.organizer = Some("Orbital Developer Community".to_string());
            Some(meeting)
        })
        .collect()
}

/// Creates the demo meetings when the store holds none.
///
/// Returns the number of meetings created.
pub async fn seed_meetings<S: MeetingStore>(store: &S) -> StoreResult<usize> {
    if !store.list_meetings().await?.is_empty() {
        return Ok(0);
    }

    let meetings = demo_meetings(Utc::now());
    let count = meetings.len();
    for meeting in meetings {
        store.create_meeting(meeting).await?;
    }

    info!(count, "seeded demo meetings");
    Ok(count)
}
