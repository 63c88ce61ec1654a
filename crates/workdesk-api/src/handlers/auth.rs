//! Registration and session endpoints

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::middleware::SESSION_COOKIE;
use crate::models::*;
use crate::services::users;
use crate::AppState;

fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/registration",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid registration data", body = ErrorResponse),
        (status = 404, description = "Unknown company code", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    info!("Registration request for {}", req.email);

    let created = users::register(&state.db, req).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Log in and receive a session cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session_token cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = users::login(
        &state.db,
        &state.jwt_secret,
        state.session_ttl,
        &req.email,
        &req.password,
    )
    .await
    .inspect_err(|e| warn!("Login failed for {}: {}", req.email, e))?;

    info!("User {} logged in", session.user.id);

    let cookie = session_cookie(&session.token, state.session_ttl.num_seconds());
    let body = LoginResponse {
        user: session.user.into(),
        token: session.token,
        expires_at: session.expires_at,
    };

    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(body)))
}

/// Log out by clearing the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout() -> impl IntoResponse {
    let cleared = HeaderValue::from_str(&session_cookie("", 0))
        .unwrap_or_else(|_| HeaderValue::from_static("session_token=; Max-Age=0"));

    (
        AppendHeaders([(header::SET_COOKIE, cleared)]),
        Json(MessageResponse::new("Logged out")),
    )
}
