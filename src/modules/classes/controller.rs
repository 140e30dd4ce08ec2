use axum::extract::State;
use tracing::instrument;

use edudesk_core::{ApiResponse, ApiResult, Empty, PageData, PageParams};
use edudesk_models::classes::{CreateClassDto, UpdateClassDto};
use edudesk_models::{Class, ClassDetail, NameFilter, User};

use crate::middleware::role::CurrentUser;
use crate::state::AppState;
use crate::validator::{PathId, QueryParams, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/v1/classes",
    params(NameFilter, PageParams),
    responses(
        (status = 200, description = "Page of classes", body = ApiResponse<PageData<Class>>),
        (status = 401, description = "Missing, expired or invalid token")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_classes(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<NameFilter>,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<PageData<Class>> {
    let page = state.page(&params);
    Ok(ApiResponse::ok(state.classes.list(&filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/classes/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ApiResponse<ClassDetail>),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_class(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<ClassDetail> {
    Ok(ApiResponse::ok(state.classes.get_detail(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/classes/{id}/members",
    params(("id" = i64, Path, description = "Class ID"), PageParams),
    responses(
        (status = 200, description = "Page of class members", body = ApiResponse<PageData<User>>),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    PathId(id): PathId,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<PageData<User>> {
    let page = state.page(&params);
    Ok(ApiResponse::ok(state.classes.members(id, page).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/teacher/classes",
    request_body = CreateClassDto,
    responses(
        (status = 200, description = "Class created", body = ApiResponse<Class>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Teacher role required"),
        (status = 409, description = "Name already taken")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn create_class(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> ApiResult<Class> {
    let class = state.classes.create(dto.into_new_class(caller.id)).await?;
    Ok(ApiResponse::ok(class))
}

#[utoipa::path(
    put,
    path = "/api/v1/teacher/classes/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = ApiResponse<Class>),
        (status = 404, description = "Class not found"),
        (status = 409, description = "Name already taken")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> ApiResult<Class> {
    Ok(ApiResponse::ok(state.classes.update(id, dto.into()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/teacher/classes/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted and its members detached", body = ApiResponse<Empty>)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_class(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Empty> {
    state.classes.delete(id).await?;
    Ok(ApiResponse::empty())
}
