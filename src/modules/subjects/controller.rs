use axum::extract::State;
use tracing::instrument;

use edudesk_core::{ApiResponse, ApiResult, Empty, PageData, PageParams};
use edudesk_models::subjects::{CreateSubjectDto, UpdateSubjectDto};
use edudesk_models::{NameFilter, Subject, SubjectDetail};

use crate::middleware::role::CurrentUser;
use crate::state::AppState;
use crate::validator::{PathId, QueryParams, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/v1/subjects",
    params(NameFilter, PageParams),
    responses(
        (status = 200, description = "Page of subjects", body = ApiResponse<PageData<Subject>>)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_subjects(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<NameFilter>,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<PageData<Subject>> {
    let page = state.page(&params);
    Ok(ApiResponse::ok(state.subjects.list(&filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/subjects/{id}",
    params(("id" = i64, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject details", body = ApiResponse<SubjectDetail>),
        (status = 404, description = "Subject not found")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subject(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<SubjectDetail> {
    Ok(ApiResponse::ok(state.subjects.get_detail(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/teacher/subjects",
    request_body = CreateSubjectDto,
    responses(
        (status = 200, description = "Subject created", body = ApiResponse<Subject>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Name already taken")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn create_subject(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> ApiResult<Subject> {
    let subject = state.subjects.create(dto.into_new_subject(caller.id)).await?;
    Ok(ApiResponse::ok(subject))
}

#[utoipa::path(
    put,
    path = "/api/v1/teacher/subjects/{id}",
    params(("id" = i64, Path, description = "Subject ID")),
    request_body = UpdateSubjectDto,
    responses(
        (status = 200, description = "Subject updated", body = ApiResponse<Subject>),
        (status = 404, description = "Subject not found"),
        (status = 409, description = "Name already taken")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_subject(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateSubjectDto>,
) -> ApiResult<Subject> {
    Ok(ApiResponse::ok(state.subjects.update(id, dto.into()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/teacher/subjects/{id}",
    params(("id" = i64, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted", body = ApiResponse<Empty>),
        (status = 409, description = "Subject still has learning materials")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_subject(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Empty> {
    state.subjects.delete(id).await?;
    Ok(ApiResponse::empty())
}
