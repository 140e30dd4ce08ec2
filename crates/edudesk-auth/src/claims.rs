//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::jwt::TokenError;

/// Claims embedded in access tokens.
///
/// Role information is a snapshot taken at login. Role-gated routes
/// re-read the user row instead of trusting `role` and `is_admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub name: String,
    /// `student` or `teacher`
    pub role: String,
    pub is_admin: bool,
    pub iss: String,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
    /// Expiration (Unix timestamp)
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}
