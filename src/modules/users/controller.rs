use axum::extract::State;
use tracing::instrument;

use edudesk_core::{ApiResponse, ApiResult, Empty, PageData, PageParams};
use edudesk_models::users::{
    ChangePasswordDto, CreateUserDto, ToggleAdminDto, UpdateProfileDto, UpdateRoleDto,
    UpdateUserDto,
};
use edudesk_models::{User, UserDetail, UserFilter};

use crate::middleware::role::CurrentUser;
use crate::state::AppState;
use crate::validator::{PathId, QueryParams, ValidatedJson};

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDetail>),
        (status = 401, description = "Missing, expired or invalid token")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller), fields(caller_id = caller.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<UserDetail> {
    let detail = state.users.get_detail(caller.id).await?;
    Ok(ApiResponse::ok(detail))
}

/// Update own phone and email
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<User>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Phone or email already taken")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> ApiResult<User> {
    let user = state.users.update(caller.id, dto.into()).await?;
    Ok(ApiResponse::ok(user))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/api/v1/users/me/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<Empty>),
        (status = 400, description = "Validation error or old password incorrect")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> ApiResult<Empty> {
    state
        .users
        .update_password(caller.id, &dto.old_password, &dto.new_password)
        .await?;
    Ok(ApiResponse::empty())
}

/// Create a user of any role
#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin privileges required"),
        (status = 409, description = "Name, phone or email already taken")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> ApiResult<User> {
    let user = state.users.create(dto.into_new_user(caller.id)).await?;
    Ok(ApiResponse::ok(user))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(UserFilter, PageParams),
    responses(
        (status = 200, description = "Page of users", body = ApiResponse<PageData<User>>),
        (status = 403, description = "Admin privileges required")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<UserFilter>,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<PageData<User>> {
    let page = state.page(&params);
    let users = state.users.list(&filter, page).await?;
    Ok(ApiResponse::ok(users))
}

/// Get a user with their creator
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDetail>),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<UserDetail> {
    let detail = state.users.get_detail(id).await?;
    Ok(ApiResponse::ok(detail))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Cannot change your own role"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Name, phone or email already taken")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> ApiResult<User> {
    let user = state.users.update_as(&caller, id, dto.into()).await?;
    Ok(ApiResponse::ok(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<Empty>),
        (status = 403, description = "Cannot delete your own account")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller), fields(caller_id = caller.id))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    PathId(id): PathId,
) -> ApiResult<Empty> {
    state.users.delete(&caller, id).await?;
    Ok(ApiResponse::empty())
}

/// Grant or revoke admin privileges
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/admin",
    params(("id" = i64, Path, description = "User ID")),
    request_body = ToggleAdminDto,
    responses(
        (status = 200, description = "Admin flag updated", body = ApiResponse<User>),
        (status = 403, description = "Cannot revoke your own admin privileges"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller), fields(caller_id = caller.id))]
pub async fn toggle_admin(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<ToggleAdminDto>,
) -> ApiResult<User> {
    let user = state.users.toggle_admin(&caller, id, dto.is_admin).await?;
    Ok(ApiResponse::ok(user))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/role",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<User>),
        (status = 403, description = "Cannot change your own role"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller), fields(caller_id = caller.id))]
pub async fn update_role(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> ApiResult<User> {
    let user = state.users.update_role(&caller, id, dto.role).await?;
    Ok(ApiResponse::ok(user))
}
