use axum::extract::State;
use tracing::instrument;

use edudesk_core::{ApiResponse, ApiResult};
use edudesk_models::auth::{LoginRequestDto, LoginResponse};

use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Login and receive an access token
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Validation error or incorrect name or password")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto), fields(name = %dto.name))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequestDto>,
) -> ApiResult<LoginResponse> {
    let response = state.auth.login(&dto.name, &dto.password).await?;
    Ok(ApiResponse::ok(response))
}
