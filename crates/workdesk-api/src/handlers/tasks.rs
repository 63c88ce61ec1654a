//! Tasks and their comments and ratings

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::*;
use crate::services::{comments, ratings, tasks};
use crate::AppState;

/// Create a task
#[utoipa::path(
    post,
    path = "/companies/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created with a deadline entry in the assignee's calendar", body = Task),
        (status = 400, description = "Invalid fields or date range", body = ErrorResponse),
        (status = 403, description = "Caller or assignee outside the company", body = ErrorResponse),
        (status = 404, description = "Assignee not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    info!("User {} creating task for user {}", me.id, req.target_id);

    let created = tasks::create_task(&state.db, &me, req).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a task
#[utoipa::path(
    get,
    path = "/companies/tasks/{id}",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task", body = Task),
        (status = 403, description = "Task belongs to another company", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    debug!("Getting task {}", id);

    let found = tasks::get_task(&state.db, &me, id).await?;

    Ok(Json(found.into()))
}

/// Update task fields
#[utoipa::path(
    patch,
    path = "/companies/tasks/{id}",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    request_body = ChangeTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 400, description = "Empty or invalid update", body = ErrorResponse),
        (status = 403, description = "Task or new assignee outside the company, or status changed by someone other than the assignee", body = ErrorResponse),
        (status = 404, description = "Task or assignee not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn change_task(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
    Json(patch): Json<ChangeTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    info!("User {} updating task {}", me.id, id);

    let updated = tasks::change_task(&state.db, &me, id, patch).await?;

    Ok(Json(updated.into()))
}

/// Change task status (assignee only)
#[utoipa::path(
    patch,
    path = "/companies/tasks/{id}/status",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    request_body = ChangeTaskStatusRequest,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 403, description = "Caller is not the assignee", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn change_task_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<ChangeTaskStatusRequest>,
) -> Result<Json<Task>, ApiError> {
    info!("User {} setting task {} status to {:?}", me.id, id, req.status);

    let updated = tasks::change_task_status(&state.db, &me, id, req.status.into()).await?;

    Ok(Json(updated.into()))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/companies/tasks/{id}",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted with its comments, ratings and calendar entry"),
        (status = 403, description = "Task belongs to another company", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    info!("User {} deleting task {}", me.id, id);

    tasks::delete_task(&state.db, &me, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List comments of a task
#[utoipa::path(
    get,
    path = "/companies/tasks/{id}/comments",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = Vec<Comment>),
        (status = 403, description = "Task belongs to another company", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    debug!("Listing comments of task {}", id);

    let found = comments::list_comments(&state.db, &me, id).await?;

    Ok(Json(found.into_iter().map(Comment::from).collect()))
}

/// Comment on a task
#[utoipa::path(
    post,
    path = "/companies/tasks/{id}/comments",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Empty or oversized comment", body = ErrorResponse),
        (status = 403, description = "Task belongs to another company", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    info!("User {} commenting on task {}", me.id, id);

    let created = comments::create_comment(&state.db, &me, id, req).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Delete a comment (author or admin)
#[utoipa::path(
    delete,
    path = "/companies/tasks/{id}/comments/{comment_id}",
    params(
        ("id" = i32, Path, description = "Task ID"),
        ("comment_id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author or an admin", body = ErrorResponse),
        (status = 404, description = "Task or comment not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path((id, comment_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    info!("User {} deleting comment {} of task {}", me.id, comment_id, id);

    comments::delete_comment(&state.db, &me, id, comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Rate a finished task (manager or admin)
#[utoipa::path(
    post,
    path = "/companies/tasks/{id}/ratings",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    request_body = CreateRatingRequest,
    responses(
        (status = 201, description = "Rating recorded for the assignee", body = Rating),
        (status = 400, description = "Score outside 1..=5", body = ErrorResponse),
        (status = 403, description = "Not a manager, other company, or task not done", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<CreateRatingRequest>,
) -> Result<(StatusCode, Json<Rating>), ApiError> {
    info!("User {} rating task {}", me.id, id);

    let created =
        ratings::create_rating(&state.db, &me, id, req, Utc::now().date_naive()).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}
