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
use crate::services::departments;
use crate::AppState;

/// List departments of a company
#[utoipa::path(
    get,
    path = "/companies/{id}/departments",
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Departments", body = Vec<Department>),
        (status = 403, description = "Caller is not a member", body = ErrorResponse)
    ),
    tag = "departments"
)]
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Department>>, ApiError> {
    debug!("Listing departments of company {}", id);

    let found = departments::list_departments(&state.db, &me, id).await?;

    Ok(Json(found.into_iter().map(Department::from).collect()))
}

/// Create a department (admin)
#[utoipa::path(
    post,
    path = "/companies/{id}/departments",
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 403, description = "Not an admin of this company or head outside it", body = ErrorResponse),
        (status = 404, description = "Head user not found", body = ErrorResponse),
        (status = 409, description = "Name taken or head already heads a department", body = ErrorResponse)
    ),
    tag = "departments"
)]
pub async fn create_department(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    info!("User {} creating department '{}' in company {}", me.id, req.name, id);

    let created = departments::create_department(&state.db, &me, id, req).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Change the head of a department (admin)
#[utoipa::path(
    patch,
    path = "/companies/{id}/departments/{dep_id}",
    params(
        ("id" = i32, Path, description = "Company ID"),
        ("dep_id" = i32, Path, description = "Department ID")
    ),
    request_body = ChangeHeadRequest,
    responses(
        (status = 200, description = "Department with its new head", body = Department),
        (status = 403, description = "Not an admin of this company or head outside it", body = ErrorResponse),
        (status = 404, description = "Department or user not found", body = ErrorResponse),
        (status = 409, description = "New head already heads another department", body = ErrorResponse)
    ),
    tag = "departments"
)]
pub async fn change_department_head(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path((id, dep_id)): Path<(i32, i32)>,
    Json(req): Json<ChangeHeadRequest>,
) -> Result<Json<Department>, ApiError> {
    info!(
        "User {} changing head of department {} to user {}",
        me.id, dep_id, req.head_user_id
    );

    let updated =
        departments::change_head_user(&state.db, &me, id, dep_id, req.head_user_id).await?;

    Ok(Json(updated.into()))
}

/// Delete a department (admin)
#[utoipa::path(
    delete,
    path = "/companies/{id}/departments/{dep_id}",
    params(
        ("id" = i32, Path, description = "Company ID"),
        ("dep_id" = i32, Path, description = "Department ID")
    ),
    responses(
        (status = 204, description = "Department deleted and members detached"),
        (status = 403, description = "Not an admin of this company", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    tag = "departments"
)]
pub async fn delete_department(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path((id, dep_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    info!("User {} deleting department {}", me.id, dep_id);

    departments::delete_department(&state.db, &me, id, dep_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Put a company member into a department (admin)
#[utoipa::path(
    post,
    path = "/companies/{id}/departments/{dep_id}/members/{user_id}",
    params(
        ("id" = i32, Path, description = "Company ID"),
        ("dep_id" = i32, Path, description = "Department ID"),
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User placed in the department", body = User),
        (status = 403, description = "Not an admin of this company or user outside it", body = ErrorResponse),
        (status = 404, description = "Department or user not found", body = ErrorResponse),
        (status = 409, description = "User heads another department", body = ErrorResponse)
    ),
    tag = "departments"
)]
pub async fn add_department_member(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path((id, dep_id, user_id)): Path<(i32, i32, i32)>,
) -> Result<Json<User>, ApiError> {
    info!("User {} adding user {} to department {}", me.id, user_id, dep_id);

    let updated = departments::add_member(&state.db, &me, id, dep_id, user_id).await?;

    Ok(Json(updated.into()))
}
