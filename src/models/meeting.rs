//! Meeting model
//!
//! An event record whose optional fields follow the schema.org Event
//! vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metadata::is_path_segment;

/// Document type tag shared by every meeting.
pub const MEETING_TYPE: &str = "meeting";

/// Maximum title length in characters
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

fn meeting_type() -> String {
    MEETING_TYPE.to_string()
}

// == Meeting ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "meeting_type")]
    pub meeting_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_accessible_for_free: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// Value from the attendance mode vocabulary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_attendance_mode: Option<String>,
    /// Value from the event status vocabulary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_attendee_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub performers: Vec<String>,
    /// Ids of meetings nested under this one
    #[serde(default)]
    pub sub_events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_start_date: Option<DateTime<Utc>>,
}

impl Meeting {
    /// Creates a meeting with only the required fields set.
    pub fn new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            meeting_type: meeting_type(),
            title: title.into(),
            description: String::new(),
            start_time,
            end_time,
            location: None,
            keywords: Vec::new(),
            is_accessible_for_free: None,
            audience: None,
            event_attendance_mode: None,
            event_status: None,
            maximum_attendee_capacity: None,
            organizer: None,
            attendees: Vec::new(),
            performers: Vec::new(),
            sub_events: Vec::new(),
            url: None,
            image: None,
            in_language: None,
            previous_start_date: None,
        }
    }

    /// Validates the meeting fields.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("Title is required".to_string());
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Some(format!(
                "Title cannot exceed {} characters",
                MAX_TITLE_LENGTH
            ));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Some(format!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            ));
        }
        if self.end_time <= self.start_time {
            return Some("End time must be after start time".to_string());
        }
        if !is_path_segment(&self.id) {
            return Some("Id cannot contain '/' or control characters".to_string());
        }
        None
    }
}
