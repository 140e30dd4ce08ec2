//! Student management for teachers.
//!
//! Every route here runs behind the teacher gate. Non-admin teachers may
//! only modify rows whose role is `student`; the rule lives in
//! [`UserService`](crate::modules::users::UserService).

use axum::extract::State;
use tracing::instrument;

use edudesk_core::{ApiResponse, ApiResult, Empty, PageData, PageParams};
use edudesk_models::users::{
    AssignClassDto, CreateStudentDto, ExistsDto, ExistsResponse, UpdateStudentDto,
};
use edudesk_models::{User, UserFilter};

use crate::middleware::role::CurrentUser;
use crate::state::AppState;
use crate::validator::{PathId, QueryParams, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/teacher/students",
    request_body = CreateStudentDto,
    responses(
        (status = 200, description = "Student created", body = ApiResponse<User>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Teacher role required"),
        (status = 409, description = "Name, phone or email already taken")
    ),
    tag = "Teacher",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn create_student(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> ApiResult<User> {
    let student = state.users.create(dto.into_new_user(caller.id)).await?;
    Ok(ApiResponse::ok(student))
}

#[utoipa::path(
    get,
    path = "/api/v1/teacher/students",
    params(UserFilter, PageParams),
    responses(
        (status = 200, description = "Page of students", body = ApiResponse<PageData<User>>),
        (status = 403, description = "Teacher role required")
    ),
    tag = "Teacher",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<UserFilter>,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<PageData<User>> {
    let page = state.page(&params);
    let students = state.users.list_students(filter, page).await?;
    Ok(ApiResponse::ok(students))
}

#[utoipa::path(
    put,
    path = "/api/v1/teacher/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = ApiResponse<User>),
        (status = 403, description = "Target is not a student"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Phone or email already taken")
    ),
    tag = "Teacher",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn update_student(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> ApiResult<User> {
    let student = state.users.update_as(&caller, id, dto.into()).await?;
    Ok(ApiResponse::ok(student))
}

#[utoipa::path(
    delete,
    path = "/api/v1/teacher/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = ApiResponse<Empty>),
        (status = 403, description = "Target is not a student")
    ),
    tag = "Teacher",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller), fields(caller_id = caller.id))]
pub async fn delete_student(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    PathId(id): PathId,
) -> ApiResult<Empty> {
    state.users.delete(&caller, id).await?;
    Ok(ApiResponse::empty())
}

/// Put a student in a class, or take them out with `class_id: null`
#[utoipa::path(
    put,
    path = "/api/v1/teacher/students/{id}/class",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = AssignClassDto,
    responses(
        (status = 200, description = "Class assignment updated", body = ApiResponse<User>),
        (status = 403, description = "Target is not a student"),
        (status = 404, description = "Student or class not found")
    ),
    tag = "Teacher",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller), fields(caller_id = caller.id))]
pub async fn assign_class(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<AssignClassDto>,
) -> ApiResult<User> {
    if let Some(class_id) = dto.class_id {
        state.classes.ensure_exists(class_id).await?;
    }
    let student = state.users.assign_class(&caller, id, dto.class_id).await?;
    Ok(ApiResponse::ok(student))
}

/// Check whether a name, phone or email is already taken
#[utoipa::path(
    post,
    path = "/api/v1/teacher/users/exists",
    request_body = ExistsDto,
    responses(
        (status = 200, description = "Probe result", body = ApiResponse<ExistsResponse>),
        (status = 400, description = "Validation error")
    ),
    tag = "Teacher",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto), fields(field = ?dto.field))]
pub async fn user_exists(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ExistsDto>,
) -> ApiResult<ExistsResponse> {
    let exists = state
        .users
        .exists(dto.field, &dto.value, dto.exclude_id)
        .await?;
    Ok(ApiResponse::ok(ExistsResponse { exists }))
}
