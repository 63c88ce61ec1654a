//! Current-user endpoints and admin actions on colleagues

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
use crate::services::users;
use crate::AppState;

/// Get the current user
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_me(CurrentUser(me): CurrentUser) -> Json<User> {
    Json(me.into())
}

/// Update the current user
#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = ChangeUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Empty or invalid update", body = ErrorResponse),
        (status = 404, description = "Unknown company code", body = ErrorResponse),
        (status = 409, description = "Email taken or department still headed", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn change_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Json(patch): Json<ChangeUserRequest>,
) -> Result<Json<User>, ApiError> {
    info!("User {} updating profile", me.id);

    let updated = users::change_me(&state.db, &me, patch).await?;

    Ok(Json(updated.into()))
}

/// Delete the current user
#[utoipa::path(
    delete,
    path = "/users/me",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 409, description = "User still belongs to a company or heads a department", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
) -> Result<StatusCode, ApiError> {
    info!("User {} deleting account", me.id);

    users::delete_me(&state.db, &me).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Tasks assigned to the current user
#[utoipa::path(
    get,
    path = "/users/me/tasks",
    responses(
        (status = 200, description = "Assigned tasks ordered by deadline", body = Vec<Task>)
    ),
    tag = "users"
)]
pub async fn my_tasks(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    debug!("Listing tasks assigned to user {}", me.id);

    let tasks = users::my_tasks(&state.db, &me).await?;

    Ok(Json(tasks.into_iter().map(Task::from).collect()))
}

/// Tasks the current user assigned
#[utoipa::path(
    get,
    path = "/users/me/tasks/owned",
    responses(
        (status = 200, description = "Owned tasks ordered by deadline", body = Vec<Task>)
    ),
    tag = "users"
)]
pub async fn owned_tasks(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    debug!("Listing tasks owned by user {}", me.id);

    let tasks = users::owned_tasks(&state.db, &me).await?;

    Ok(Json(tasks.into_iter().map(Task::from).collect()))
}

/// Ratings received by the current user
#[utoipa::path(
    get,
    path = "/users/me/ratings",
    responses(
        (status = 200, description = "Ratings, newest first", body = Vec<Rating>)
    ),
    tag = "users"
)]
pub async fn my_ratings(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
) -> Result<Json<Vec<Rating>>, ApiError> {
    debug!("Listing ratings of user {}", me.id);

    let ratings = users::my_ratings(&state.db, &me).await?;

    Ok(Json(ratings.into_iter().map(Rating::from).collect()))
}

/// Quarter-to-date rating averages of the current user
#[utoipa::path(
    get,
    path = "/users/me/ratings/average",
    responses(
        (status = 200, description = "Average scores since the start of the quarter", body = AverageRating)
    ),
    tag = "users"
)]
pub async fn average_rating(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
) -> Result<Json<AverageRating>, ApiError> {
    debug!("Computing rating averages of user {}", me.id);

    let averages = users::average_rating(&state.db, &me, Utc::now().date_naive()).await?;

    Ok(Json(averages))
}

/// Change a colleague's role (admin)
#[utoipa::path(
    patch,
    path = "/users/{id}/role",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 403, description = "Not an admin or not the same company", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn change_role(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<User>, ApiError> {
    info!("User {} changing role of user {}", me.id, id);

    let updated = users::change_role(&state.db, &me, id, req.company_role.into()).await?;

    Ok(Json(updated.into()))
}

/// Detach a colleague from their department (admin)
#[utoipa::path(
    delete,
    path = "/users/{id}/department",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 403, description = "Not an admin, not the same company, or not in a department", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "User heads the department", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn remove_from_department(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    info!("User {} removing user {} from their department", me.id, id);

    let updated = users::remove_from_department(&state.db, &me, id).await?;

    Ok(Json(updated.into()))
}
