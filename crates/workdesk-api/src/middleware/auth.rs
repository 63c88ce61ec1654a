//! JWT Authentication Middleware
//!
//! Extracts the session JWT from the `session_token` cookie or the
//! Authorization header, validates it, and makes the caller available to
//! handlers through request extensions and the [`CurrentUser`] extractor.

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use workdesk_auth::{JwtValidator, SESSION_TOKEN_TYPE};
use workdesk_db::entities::{user, User};

use crate::error::ApiError;
use crate::models::ErrorResponse;
use crate::AppState;

/// Name of the HTTP-only cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_token";

/// Authenticated user context extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    /// Company role at login time; authorization uses the stored role
    pub role: String,
    pub token_type: String,
}

/// JWT validation state shared across middleware instances
#[derive(Clone)]
pub struct JwtState {
    pub validator: Arc<JwtValidator>,
}

impl JwtState {
    /// Create new JWT state with the given secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            validator: Arc::new(JwtValidator::new(secret)),
        }
    }
}

fn unauthorized(error: impl Into<String>, code: &str) -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: error.into(),
            code: Some(code.to_string()),
        }),
    )
}

fn session_cookie(request: &Request) -> Option<&str> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .map(str::trim)
        .find_map(|c| {
            c.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty())
}

/// Authentication middleware that validates JWT session tokens
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - Both cookie and Authorization header are missing
/// - Token is malformed, expired or signed with another key
/// - Token type is not "session"
/// - Token carries no `user_id`
pub async fn require_auth(
    state: axum::extract::State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match session_cookie(&request) {
        Some(t) => t.to_string(),
        None => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    unauthorized(
                        "Missing authentication token (cookie or Authorization header)",
                        "MISSING_AUTH",
                    )
                })?;

            auth_header
                .strip_prefix("Bearer ")
                .ok_or_else(|| {
                    unauthorized(
                        "Invalid Authorization header format. Expected 'Bearer <token>'",
                        "INVALID_AUTH_FORMAT",
                    )
                })?
                .to_string()
        }
    };

    let claims = state.validator.validate(&token).map_err(|e| {
        warn!("Rejected session token: {}", e);
        unauthorized(format!("Invalid or expired token: {}", e), "INVALID_TOKEN")
    })?;

    let token_type = match claims.token_type {
        Some(token_type) if token_type == SESSION_TOKEN_TYPE => token_type,
        Some(token_type) => {
            return Err(unauthorized(
                format!(
                    "Invalid token type '{}'. Expected 'session' token for API access",
                    token_type
                ),
                "INVALID_TOKEN_TYPE",
            ));
        }
        None => {
            return Err(unauthorized(
                "Token missing 'token_type' claim",
                "MISSING_TOKEN_TYPE",
            ));
        }
    };

    let user_id = claims
        .user_id
        .ok_or_else(|| unauthorized("Token missing 'user_id' claim", "MISSING_USER_ID"))?;

    request.extensions_mut().insert(AuthUser {
        user_id,
        role: claims.company_role.unwrap_or_default(),
        token_type,
    });

    Ok(next.run(request).await)
}

/// The caller's user row, loaded fresh for every request
///
/// Requires [`require_auth`] to have run first.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| unauthorized("Not authenticated", "MISSING_AUTH"))?;

        let found = User::find_by_id(auth.user_id)
            .one(&state.db)
            .await
            .map_err(|e| ApiError::from(crate::error::ServiceError::from(e)))?;

        match found {
            Some(user) if user.is_active => Ok(CurrentUser(user)),
            Some(_) => {
                warn!("Inactive user {} presented a session token", auth.user_id);
                Err(unauthorized("User account is disabled", "USER_INACTIVE"))
            }
            None => {
                warn!("Session token references unknown user {}", auth.user_id);
                Err(unauthorized("User no longer exists", "USER_NOT_FOUND"))
            }
        }
    }
}
