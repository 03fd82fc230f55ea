//! Metadata record models
//!
//! A metadata item is one controlled-vocabulary entry (an event status, an
//! attendance mode, ...). Items are stored as schemaless documents, so
//! fields beyond the common capability set are carried in `extra` and read
//! by the typed record shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category holding event status values.
pub const EVENT_STATUS_TYPE: &str = "EventStatusType";

/// Category holding attendance mode values.
pub const ATTENDANCE_MODE_TYPE: &str = "EventAttendanceModeEnumeration";

const REQUIRES_PREVIOUS_START_DATE: &str = "requiresPreviousStartDate";

fn default_active() -> bool {
    true
}

// == Metadata Item ==
/// Generic metadata document as stored and exchanged on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataItem {
    /// Opaque identifier, assigned by the store when blank
    #[serde(default)]
    pub id: String,
    /// Category / partition key
    #[serde(rename = "type", default)]
    pub metadata_type: String,
    /// Machine-readable code, unique within the category
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Inactive items are hidden from listings and validation
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    /// Shape-specific document fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for MetadataItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            metadata_type: String::new(),
            value: String::new(),
            display_name: String::new(),
            description: String::new(),
            is_active: true,
            sort_order: 0,
            extra: Map::new(),
        }
    }
}

/// True when `s` can be placed in a URL path segment and a header value
/// without escaping.
pub(crate) fn is_path_segment(s: &str) -> bool {
    !s.chars().any(|c| c == '/' || c.is_control())
}

impl MetadataItem {
    /// Creates an active item with no id.
    pub fn new(
        metadata_type: impl Into<String>,
        value: impl Into<String>,
        display_name: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self {
            metadata_type: metadata_type.into(),
            value: value.into(),
            display_name: display_name.into(),
            sort_order,
            ..Self::default()
        }
    }

    /// Checks the fields required to create an item.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate_for_create(&self) -> Option<String> {
        if self.metadata_type.trim().is_empty() || self.value.trim().is_empty() {
            return Some("Type and Value are required".to_string());
        }
        if !is_path_segment(&self.metadata_type) || !is_path_segment(&self.id) {
            return Some(
                "Type and Id cannot contain '/' or control characters".to_string(),
            );
        }
        None
    }

    /// Checks the fields required to replace an item.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate_for_update(&self) -> Option<String> {
        if self.id.trim().is_empty() || self.metadata_type.trim().is_empty() {
            return Some("Id and Type are required".to_string());
        }
        None
    }
}

// == Record Shapes ==
/// Tag identifying which typed view a cached collection was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordShape {
    Generic,
    EventStatus,
    AttendanceMode,
}

/// Capability shared by every typed view over a metadata document.
///
/// Service accessors are generic over this trait so that the same category
/// can be read as plain items or as a richer definition type.
pub trait MetadataRecord: Clone + Send + Sync + 'static {
    /// Cache partition tag for this shape
    const SHAPE: RecordShape;

    /// Builds the typed view from a stored document.
    fn from_item(item: MetadataItem) -> Self;

    /// Borrows the common fields.
    fn item(&self) -> &MetadataItem;

    fn id(&self) -> &str {
        &self.item().id
    }

    fn metadata_type(&self) -> &str {
        &self.item().metadata_type
    }

    fn value(&self) -> &str {
        &self.item().value
    }

    fn display_name(&self) -> &str {
        &self.item().display_name
    }

    fn description(&self) -> &str {
        &self.item().description
    }

    fn is_active(&self) -> bool {
        self.item().is_active
    }

    fn sort_order(&self) -> i32 {
        self.item().sort_order
    }
}

impl MetadataRecord for MetadataItem {
    const SHAPE: RecordShape = RecordShape::Generic;

    fn from_item(item: MetadataItem) -> Self {
        item
    }

    fn item(&self) -> &MetadataItem {
        self
    }
}

// == Event Status ==
/// Event status entry (scheduled, cancelled, postponed, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatusDefinition {
    #[serde(flatten)]
    pub item: MetadataItem,
    /// Whether a meeting in this status must record its previous start date
    pub requires_previous_start_date: bool,
}

impl EventStatusDefinition {
    pub fn new(value: impl Into<String>, display_name: impl Into<String>, sort_order: i32) -> Self {
        Self {
            item: MetadataItem::new(EVENT_STATUS_TYPE, value, display_name, sort_order),
            requires_previous_start_date: false,
        }
    }

    pub fn requiring_previous_start_date(mut self) -> Self {
        self.requires_previous_start_date = true;
        self
    }
}

impl Default for EventStatusDefinition {
    fn default() -> Self {
        Self::new("", "", 0)
    }
}

impl MetadataRecord for EventStatusDefinition {
    const SHAPE: RecordShape = RecordShape::EventStatus;

    fn from_item(mut item: MetadataItem) -> Self {
        let requires_previous_start_date = item
            .extra
            .remove(REQUIRES_PREVIOUS_START_DATE)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        Self {
            item,
            requires_previous_start_date,
        }
    }

    fn item(&self) -> &MetadataItem {
        &self.item
    }
}

impl From<EventStatusDefinition> for MetadataItem {
    fn from(def: EventStatusDefinition) -> Self {
        let mut item = def.item;
        item.extra.insert(
            REQUIRES_PREVIOUS_START_DATE.to_string(),
            Value::Bool(def.requires_previous_start_date),
        );
        item
    }
}

// == Attendance Mode ==
/// Attendance mode entry (offline, online, mixed).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceModeDefinition {
    #[serde(flatten)]
    pub item: MetadataItem,
}

impl AttendanceModeDefinition {
    pub fn new(value: impl Into<String>, display_name: impl Into<String>, sort_order: i32) -> Self {
        Self {
            item: MetadataItem::new(ATTENDANCE_MODE_TYPE, value, display_name, sort_order),
        }
    }
}

impl Default for AttendanceModeDefinition {
    fn default() -> Self {
        Self::new("", "", 0)
    }
}

impl MetadataRecord for AttendanceModeDefinition {
    const SHAPE: RecordShape = RecordShape::AttendanceMode;

    fn from_item(item: MetadataItem) -> Self {
        Self { item }
    }

    fn item(&self) -> &MetadataItem {
        &self.item
    }
}

impl From<AttendanceModeDefinition> for MetadataItem {
    fn from(def: AttendanceModeDefinition) -> Self {
        def.item
    }
}
