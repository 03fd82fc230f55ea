//! Data models for the meetings service
//!
//! Domain records (meetings, metadata items) plus the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod meeting;
pub mod metadata;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use meeting::{Meeting, MEETING_TYPE};
pub use metadata::{
    AttendanceModeDefinition, EventStatusDefinition, MetadataItem, MetadataRecord, RecordShape,
    ATTENDANCE_MODE_TYPE, EVENT_STATUS_TYPE,
};
pub use requests::RefreshQuery;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
