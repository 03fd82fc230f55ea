//! Metadata Handlers
//!
//! Read endpoints are served through the metadata cache. Admin writes go to
//! the store and then refresh the affected category.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use tracing::info;

use super::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    AttendanceModeDefinition, EventStatusDefinition, MetadataItem, RefreshQuery,
};

/// Handler for GET /api/metadata/eventStatuses
pub async fn get_event_statuses(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventStatusDefinition>>> {
    Ok(Json(state.metadata.event_statuses().await?))
}

/// Handler for GET /api/metadata/attendanceModes
pub async fn get_attendance_modes(
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendanceModeDefinition>>> {
    Ok(Json(state.metadata.attendance_modes().await?))
}

/// Handler for GET /api/metadata/:type
pub async fn get_metadata_by_type(
    State(state): State<AppState>,
    Path(metadata_type): Path<String>,
) -> Result<Json<Vec<MetadataItem>>> {
    Ok(Json(
        state
            .metadata
            .get_items::<MetadataItem>(&metadata_type)
            .await?,
    ))
}

/// Handler for POST /api/metadata (admin)
///
/// Responds 201 with the stored item and its location.
pub async fn create_metadata_item(
    State(state): State<AppState>,
    Json(item): Json<MetadataItem>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<MetadataItem>)> {
    if let Some(error_msg) = item.validate_for_create() {
        return Err(AppError::Validation(error_msg));
    }

    let created = state.metadata.create_item(item).await?;
    state
        .metadata
        .refresh_cache(Some(&created.metadata_type))
        .await;

    let location = format!("/api/metadata/{}/{}", created.metadata_type, created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// Handler for PUT /api/metadata (admin)
///
/// Responds 204 on success, 404 when no item has this id and type.
pub async fn update_metadata_item(
    State(state): State<AppState>,
    Json(item): Json<MetadataItem>,
) -> Result<StatusCode> {
    if let Some(error_msg) = item.validate_for_update() {
        return Err(AppError::Validation(error_msg));
    }

    let metadata_type = item.metadata_type.clone();
    let id = item.id.clone();
    if !state.metadata.update_item(item).await? {
        return Err(AppError::NotFound(format!(
            "Metadata item '{}' of type '{}'",
            id, metadata_type
        )));
    }

    state.metadata.refresh_cache(Some(&metadata_type)).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/metadata/:type/:id (admin)
pub async fn delete_metadata_item(
    State(state): State<AppState>,
    Path((metadata_type, id)): Path<(String, String)>,
) -> Result<StatusCode> {
    if !state.metadata.delete_item(&id, &metadata_type).await? {
        return Err(AppError::NotFound(format!(
            "Metadata item '{}' of type '{}'",
            id, metadata_type
        )));
    }

    state.metadata.refresh_cache(Some(&metadata_type)).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/metadata/refresh (admin)
///
/// Drops one category (`?type=`) or the whole cache.
pub async fn refresh_metadata_cache(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> StatusCode {
    let category = query.category();
    state.metadata.refresh_cache(category).await;
    info!(metadata_type = category.unwrap_or("*"), "metadata cache refresh requested");
    StatusCode::NO_CONTENT
}
