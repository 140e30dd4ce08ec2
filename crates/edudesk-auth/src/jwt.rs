//! JWT creation and verification.
//!
//! Tokens are HS256 signed with `jwt.secret`, carry `jwt.issuer` as `iss`
//! and expire `jwt.expire_secs` after issue. Verification checks the
//! signature, the expiry and the issuer.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use edudesk_config::JwtConfig;
use edudesk_core::AppError;

use crate::claims::Claims;

/// Why a request could not be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("authentication token is missing")]
    Missing,
    #[error("authentication token has expired")]
    Expired,
    #[error("authentication token is invalid")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => AppError::token_missing(),
            TokenError::Expired => AppError::token_expired(),
            TokenError::Invalid => AppError::token_invalid(),
        }
    }
}

/// The identity a token is issued for.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: i64,
    pub name: &'a str,
    pub role: &'a str,
    pub is_admin: bool,
}

pub fn create_access_token(
    subject: &TokenSubject<'_>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let exp = now + jwt_config.expire_secs.max(0) as usize;

    let claims = Claims {
        sub: subject.user_id.to_string(),
        name: subject.name.to_string(),
        role: subject.role.to_string(),
        is_admin: subject.is_admin,
        iss: jwt_config.issuer.clone(),
        iat: now,
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("failed to create token: {e}")))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    if token.trim().is_empty() {
        return Err(TokenError::Missing);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[jwt_config.issuer.as_str()]);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
