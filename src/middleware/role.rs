//! Role gates for the profile, `/teacher` and `/admin` route groups.
//!
//! Token claims are a snapshot from login, so each gate re-reads the
//! caller's row and checks the current role and admin flag. The fresh row
//! is stored in the request extensions as [`CurrentUser`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use edudesk_core::{AppError, ErrorCode};
use edudesk_models::User;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// The caller's row as loaded by a role gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::token_invalid)
    }
}

async fn load_caller(state: &AppState, parts: &mut Parts) -> Result<User, AppError> {
    let auth_user = AuthUser::from_request_parts(parts, state).await?;
    let user_id = auth_user.user_id()?;

    // A token whose user has since been deleted is no longer valid.
    state.users.get(user_id).await.map_err(|e| match e.code {
        ErrorCode::NotFound => AppError::token_invalid(),
        _ => e,
    })
}

async fn require(
    state: &AppState,
    req: Request,
    next: Next,
    allowed: fn(&User) -> bool,
    reason: &'static str,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let caller = load_caller(state, &mut parts).await?;

    if !allowed(&caller) {
        debug!(user_id = caller.id, role = %caller.role, "role gate rejected caller");
        return Err(AppError::forbidden(reason));
    }

    parts.extensions.insert(CurrentUser(caller));
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Any caller whose row still exists.
pub async fn require_user(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require(&state, req, next, |_| true, "").await
}

/// Teachers and admins.
pub async fn require_teacher(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require(&state, req, next, User::can_teach, "teacher role required").await
}

/// Users with the admin flag.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require(&state, req, next, |u| u.is_admin, "admin privileges required").await
}
