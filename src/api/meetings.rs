//! Meeting Handlers
//!
//! CRUD endpoints for meetings. Controlled-vocabulary fields are checked
//! against the cached metadata before anything is written.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};
use tracing::info;

use super::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    EventStatusDefinition, Meeting, ATTENDANCE_MODE_TYPE, EVENT_STATUS_TYPE, MEETING_TYPE,
};
use crate::store::MeetingStore;

/// Validates field rules and vocabulary references.
async fn validate_meeting(state: &AppState, meeting: &Meeting) -> Result<()> {
    if let Some(error_msg) = meeting.validate() {
        return Err(AppError::Validation(error_msg));
    }

    if let Some(status) = &meeting.event_status {
        let definition = state
            .metadata
            .get_item_by_value::<EventStatusDefinition>(EVENT_STATUS_TYPE, status)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown event status '{}'", status)))?;

        if definition.requires_previous_start_date && meeting.previous_start_date.is_none() {
            return Err(AppError::Validation(format!(
                "Event status '{}' requires a previous start date",
                status
            )));
        }
    }

    if let Some(mode) = &meeting.event_attendance_mode {
        if !state
            .metadata
            .is_valid_value(ATTENDANCE_MODE_TYPE, mode)
            .await?
        {
            return Err(AppError::Validation(format!(
                "Unknown attendance mode '{}'",
                mode
            )));
        }
    }

    Ok(())
}

/// Handler for GET /api/meetings
pub async fn list_meetings(State(state): State<AppState>) -> Result<Json<Vec<Meeting>>> {
    Ok(Json(state.meetings.list_meetings().await?))
}

/// Handler for GET /api/meetings/:id
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meeting>> {
    state
        .meetings
        .get_meeting(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Meeting '{}'", id)))
}

/// Handler for POST /api/meetings
///
/// Responds 201 with the stored meeting and its location.
pub async fn create_meeting(
    State(state): State<AppState>,
    Json(mut meeting): Json<Meeting>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Meeting>)> {
    meeting.meeting_type = MEETING_TYPE.to_string();
    validate_meeting(&state, &meeting).await?;

    let created = state.meetings.create_meeting(meeting).await?;
    info!(id = %created.id, title = %created.title, "meeting created");

    let location = format!("/api/meetings/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// Handler for PUT /api/meetings/:id
///
/// The path id wins over any id in the body.
pub async fn update_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut meeting): Json<Meeting>,
) -> Result<Json<Meeting>> {
    meeting.id = id;
    meeting.meeting_type = MEETING_TYPE.to_string();
    validate_meeting(&state, &meeting).await?;

    let id = meeting.id.clone();
    let updated = state
        .meetings
        .update_meeting(meeting)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Meeting '{}'", id)))?;

    info!(id = %updated.id, "meeting updated");
    Ok(Json(updated))
}
