use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use edudesk_auth::{Claims, TokenError, verify_token};
use edudesk_core::AppError;

use crate::state::AppState;

/// Extractor that validates the bearer token and provides its claims.
///
/// A missing header, an expired token and any other bad token are reported
/// with distinct error codes.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<i64, AppError> {
        Ok(self.0.user_id()?)
    }
}

/// The raw token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, TokenError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::Invalid)?;

    // Trailing whitespace is trimmed off header values, so an empty
    // `Bearer ` arrives as the bare scheme.
    if value.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Missing);
    }

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(TokenError::Invalid)?
        .trim();

    if token.is_empty() {
        return Err(TokenError::Missing);
    }
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let settings = state.settings.current();
        let claims = verify_token(token, &settings.jwt)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_classification() {
        assert_eq!(bearer_token(&parts(None)), Err(TokenError::Missing));
        assert_eq!(bearer_token(&parts(Some("Bearer "))), Err(TokenError::Missing));
        assert_eq!(bearer_token(&parts(Some("Bearer"))), Err(TokenError::Missing));
        assert_eq!(bearer_token(&parts(Some("bearer"))), Err(TokenError::Missing));
        assert_eq!(bearer_token(&parts(Some("Bearerabc"))), Err(TokenError::Invalid));
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), Err(TokenError::Invalid));
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Ok("abc.def"));
    }

    #[test]
    fn test_auth_user_id_from_subject() {
        let user = AuthUser(Claims {
            sub: "42".to_string(),
            name: "ann".to_string(),
            role: "teacher".to_string(),
            is_admin: false,
            iss: "edudesk".to_string(),
            iat: 0,
            exp: 0,
        });
        assert_eq!(user.user_id().unwrap(), 42);
    }
}
