//! API Middleware
//!
//! Session authentication, the current-user extractor and role guards.

pub mod auth;
pub mod guards;

pub use auth::{require_auth, AuthUser, CurrentUser, JwtState, SESSION_COOKIE};
pub use guards::{require_admin, require_company, require_manager, require_member_of};
