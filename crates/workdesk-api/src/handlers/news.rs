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
use crate::services::news;
use crate::AppState;

/// Company news feed
#[utoipa::path(
    get,
    path = "/companies/{id}/news",
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "News, newest first", body = Vec<News>),
        (status = 403, description = "Caller is not a member", body = ErrorResponse)
    ),
    tag = "news"
)]
pub async fn list_news(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<News>>, ApiError> {
    debug!("Listing news of company {}", id);

    let found = news::list_news(&state.db, &me, id).await?;

    Ok(Json(found.into_iter().map(News::from).collect()))
}

/// Publish news (admin)
#[utoipa::path(
    post,
    path = "/companies/{id}/news",
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    request_body = CreateNewsRequest,
    responses(
        (status = 201, description = "News published", body = News),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Not an admin of this company", body = ErrorResponse)
    ),
    tag = "news"
)]
pub async fn create_news(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<CreateNewsRequest>,
) -> Result<(StatusCode, Json<News>), ApiError> {
    info!("User {} publishing news in company {}", me.id, id);

    let created = news::create_news(&state.db, &me, id, req).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Delete news (admin)
#[utoipa::path(
    delete,
    path = "/companies/{id}/news/{news_id}",
    params(
        ("id" = i32, Path, description = "Company ID"),
        ("news_id" = i32, Path, description = "News ID")
    ),
    responses(
        (status = 204, description = "News deleted"),
        (status = 403, description = "Not an admin of this company", body = ErrorResponse),
        (status = 404, description = "News not found in this company", body = ErrorResponse)
    ),
    tag = "news"
)]
pub async fn delete_news(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path((id, news_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    info!("User {} deleting news {} of company {}", me.id, news_id, id);

    news::delete_news(&state.db, &me, id, news_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
