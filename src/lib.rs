//! # Edudesk API
//!
//! A REST backend for a small school built with Axum and PostgreSQL:
//! students and teachers, classes, subjects and uploaded learning
//! materials.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Bearer auth, role gates, locale selection
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Login
//! │   ├── users/       # Own profile, admin user management
//! │   ├── students/    # Student management for teachers
//! │   ├── classes/     # Classes and class membership
//! │   ├── subjects/    # Subjects
//! │   ├── learning_materials/  # Uploads and downloads
//! │   └── health/      # Liveness and readiness probes
//! ├── i18n.rs           # Localized validation messages
//! ├── validator.rs      # Enveloped request extractors
//! └── state.rs          # Shared application state
//! ```
//!
//! Each feature module has a `controller.rs` (HTTP handlers), a
//! `service.rs` (business rules over repository traits) and a `router.rs`.
//! Models live in `edudesk-models` and repositories in `edudesk-db`.
//!
//! ## Access levels
//!
//! | Prefix | Who |
//! |--------|-----|
//! | `/api/v1/login`, `/liveness`, `/readiness`, `/swagger` | anyone |
//! | `/api/v1/users/me`, read-only catalog routes | any valid token |
//! | `/api/v1/teacher/*` | teachers and admins |
//! | `/api/v1/admin/*` | users with the admin flag |
//!
//! Role gates re-read the caller's row on every request, so a changed role
//! or admin flag takes effect before the token expires.
//!
//! ## Responses
//!
//! Every JSON response is `{"meta": {"err_code", "err_msg", "err_details"},
//! "data": ...}`; `err_code` is 0 on success. List endpoints return
//! `{"pn", "ps", "total", "items"}` in `data`.

pub mod docs;
pub mod i18n;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use edudesk_auth;
pub use edudesk_config;
pub use edudesk_core;
pub use edudesk_db;
pub use edudesk_models;
