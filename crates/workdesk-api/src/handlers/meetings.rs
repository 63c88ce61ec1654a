use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::*;
use crate::services::meetings;
use crate::AppState;

/// List meetings of the caller's company
#[utoipa::path(
    get,
    path = "/meeting",
    responses(
        (status = 200, description = "Meetings ordered by date and time", body = Vec<Meeting>),
        (status = 403, description = "Caller has no company", body = ErrorResponse)
    ),
    tag = "meetings"
)]
pub async fn list_meetings(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
) -> Result<Json<Vec<Meeting>>, ApiError> {
    debug!("Listing meetings for user {}", me.id);

    let found = meetings::list_meetings(&state.db, &me).await?;

    Ok(Json(found.into_iter().map(Meeting::from).collect()))
}

/// Schedule a meeting (manager or admin)
#[utoipa::path(
    post,
    path = "/meeting",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = Meeting),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Not a manager or no company", body = ErrorResponse)
    ),
    tag = "meetings"
)]
pub async fn create_meeting(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Json(req): Json<CreateMeetingRequest>,
) -> Result<(StatusCode, Json<Meeting>), ApiError> {
    info!("User {} scheduling meeting '{}'", me.id, req.title);

    let created = meetings::create_meeting(&state.db, &me, req).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update a meeting (manager or admin)
#[utoipa::path(
    patch,
    path = "/meeting/{id}",
    params(
        ("id" = i32, Path, description = "Meeting ID")
    ),
    request_body = ChangeMeetingRequest,
    responses(
        (status = 200, description = "Updated meeting", body = Meeting),
        (status = 400, description = "Empty or invalid update", body = ErrorResponse),
        (status = 403, description = "Not a manager or other company", body = ErrorResponse),
        (status = 404, description = "Meeting not found", body = ErrorResponse),
        (status = 409, description = "A participant is busy at the new slot", body = ErrorResponse)
    ),
    tag = "meetings"
)]
pub async fn change_meeting(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
    Json(patch): Json<ChangeMeetingRequest>,
) -> Result<Json<Meeting>, ApiError> {
    info!("User {} updating meeting {}", me.id, id);

    let updated = meetings::change_meeting(&state.db, &me, id, patch).await?;

    Ok(Json(updated.into()))
}

/// Cancel a meeting (manager or admin)
#[utoipa::path(
    delete,
    path = "/meeting/{id}",
    params(
        ("id" = i32, Path, description = "Meeting ID")
    ),
    responses(
        (status = 204, description = "Meeting deleted with its calendar entries"),
        (status = 403, description = "Not a manager or other company", body = ErrorResponse),
        (status = 404, description = "Meeting not found", body = ErrorResponse)
    ),
    tag = "meetings"
)]
pub async fn delete_meeting(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    info!("User {} deleting meeting {}", me.id, id);

    meetings::delete_meeting(&state.db, &me, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add a participant (manager or admin)
#[utoipa::path(
    post,
    path = "/meeting/{id}/participants/{user_id}",
    params(
        ("id" = i32, Path, description = "Meeting ID"),
        ("user_id" = i32, Path, description = "Participant user ID")
    ),
    responses(
        (status = 201, description = "Participant booked", body = CalendarEvent),
        (status = 403, description = "Not a manager or participant outside the company", body = ErrorResponse),
        (status = 404, description = "Meeting or user not found", body = ErrorResponse),
        (status = 409, description = "Participant already has an event at that date and time", body = ErrorResponse)
    ),
    tag = "meetings"
)]
pub async fn add_participant(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path((id, user_id)): Path<(i32, i32)>,
) -> Result<(StatusCode, Json<CalendarEvent>), ApiError> {
    info!("User {} adding user {} to meeting {}", me.id, user_id, id);

    let entry = meetings::add_participant(&state.db, &me, id, user_id).await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}
