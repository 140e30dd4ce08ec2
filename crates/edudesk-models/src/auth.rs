use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::User;

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub password: String,
}

/// The identity returned alongside a token. Contact details stay out of it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct LoginUser {
    pub id: i64,
    pub name: String,
}

impl From<&User> for LoginUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub user: LoginUser,
}
