//! # Edudesk Core
//!
//! Core types, errors, and utilities for the Edudesk API.
//!
//! - [`errors`]: Application error type, stable error codes and HTTP conversion
//! - [`response`]: The `{meta, data}` JSON envelope returned by every endpoint
//! - [`pagination`]: `pn`/`ps` page resolution and paged list payloads
//! - [`password`]: Password hashing and verification
//! - [`file_storage`]: Storage abstraction for uploaded learning materials
//! - [`serde`]: Query-string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use edudesk_core::{AppError, ApiResponse, Page, PageData};
//!
//! let page = Page::new(Some(2), Some(10), 20, 100);
//! let data = PageData::new(&page, total, items);
//! Ok(ApiResponse::ok(data))
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod response;
pub mod serde;

pub use errors::{AppError, ErrorCode};
pub use pagination::{Page, PageData, PageParams};
pub use password::{hash_password, hash_password_with_cost, verify_password};
pub use response::{ApiResponse, ApiResult, Empty, Meta};
