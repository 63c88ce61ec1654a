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
use crate::services::companies;
use crate::AppState;

/// Create a company (admin)
#[utoipa::path(
    post,
    path = "/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created; the caller joins it as admin", body = Company),
        (status = 400, description = "Invalid codes", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 409, description = "Caller already in a company or name taken", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    info!("User {} creating company '{}'", me.id, req.name);

    let created = companies::create_company(&state.db, &me, req).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List members of a company
#[utoipa::path(
    get,
    path = "/companies/{id}/users",
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company members", body = Vec<User>),
        (status = 403, description = "Caller is not a member", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn list_company_users(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<User>>, ApiError> {
    debug!("Listing members of company {}", id);

    let members = companies::list_users(&state.db, &me, id).await?;

    Ok(Json(members.into_iter().map(User::from).collect()))
}

/// Add a user to the company (admin)
#[utoipa::path(
    post,
    path = "/companies/{id}/users/{user_id}",
    params(
        ("id" = i32, Path, description = "Company ID"),
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User added", body = User),
        (status = 403, description = "Not an admin of this company", body = ErrorResponse),
        (status = 404, description = "Company or user not found", body = ErrorResponse),
        (status = 409, description = "User already belongs to a company", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn add_company_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path((id, user_id)): Path<(i32, i32)>,
) -> Result<Json<User>, ApiError> {
    info!("User {} adding user {} to company {}", me.id, user_id, id);

    let updated = companies::add_user(&state.db, &me, id, user_id).await?;

    Ok(Json(updated.into()))
}

/// Remove a user from the company (admin)
#[utoipa::path(
    delete,
    path = "/companies/{id}/users/{user_id}",
    params(
        ("id" = i32, Path, description = "Company ID"),
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User removed from company and department", body = User),
        (status = 403, description = "Not an admin of this company or user not a member", body = ErrorResponse),
        (status = 404, description = "Company or user not found", body = ErrorResponse),
        (status = 409, description = "User heads a department", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn remove_company_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path((id, user_id)): Path<(i32, i32)>,
) -> Result<Json<User>, ApiError> {
    info!("User {} removing user {} from company {}", me.id, user_id, id);

    let updated = companies::remove_user(&state.db, &me, id, user_id).await?;

    Ok(Json(updated.into()))
}

/// Delete a company (admin)
#[utoipa::path(
    delete,
    path = "/companies/{id}",
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    responses(
        (status = 204, description = "Company, its departments, tasks, meetings and news deleted"),
        (status = 403, description = "Not an admin of this company", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    info!("User {} deleting company {}", me.id, id);

    companies::delete_company(&state.db, &me, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
