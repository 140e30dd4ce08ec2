//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: bearer token verification into [`auth::AuthUser`]
//! - [`role`]: profile, teacher and admin gates that re-read the caller's row
//! - [`locale`]: picks the language of validation messages
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the token and exposes its claims
//! 3. On every route except login, health and docs, the gate loads the caller's
//!    current row, checks the role or admin flag, and stores it as
//!    [`role::CurrentUser`]
//! 4. The handler runs
//!
//! # Example
//!
//! ```ignore
//! async fn create_class(CurrentUser(caller): CurrentUser, ...) -> ApiResult<Class> {
//!     // only reached by teachers and admins
//! }
//! ```

pub mod auth;
pub mod locale;
pub mod role;
