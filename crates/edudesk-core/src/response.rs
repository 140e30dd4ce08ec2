//! The JSON envelope shared by every endpoint.
//!
//! ```json
//! {
//!   "meta": { "err_code": 0, "err_msg": "", "err_details": [] },
//!   "data": { ... }
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::AppError;

/// Outcome metadata. `err_code` is 0 on success.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Meta {
    pub err_code: i32,
    pub err_msg: String,
    pub err_details: Vec<String>,
}

impl Meta {
    pub fn success() -> Self {
        Self {
            err_code: 0,
            err_msg: String::new(),
            err_details: Vec::new(),
        }
    }
}

/// Serializes as `{}`; used where an operation has no payload.
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct Empty {}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub meta: Meta,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            meta: Meta::success(),
            data,
        }
    }
}

impl ApiResponse<Empty> {
    pub fn empty() -> Self {
        Self::ok(Empty {})
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;
