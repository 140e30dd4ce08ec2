//! # Edudesk Auth
//!
//! Authentication types and JWT utilities for the Edudesk API.
//!
//! - [`claims`]: access token claims
//! - [`jwt`]: token creation and verification, with failures classified as
//!   missing, expired or invalid ([`TokenError`])
//!
//! # Example
//!
//! ```ignore
//! use edudesk_auth::{TokenSubject, create_access_token, verify_token};
//!
//! let token = create_access_token(&TokenSubject::from(&user), &settings.jwt)?;
//! let claims = verify_token(&token, &settings.jwt)?;
//! let user_id = claims.user_id()?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{TokenError, TokenSubject, create_access_token, verify_token};
