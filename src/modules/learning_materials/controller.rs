use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use edudesk_core::{ApiResponse, ApiResult, AppError, Empty, PageData, PageParams};
use edudesk_models::LearningMaterial;
use edudesk_models::learning_materials::{
    CreateLearningMaterialForm, LearningMaterialFilter, LearningMaterialUpload,
    UpdateLearningMaterialDto, UploadedFile,
};

use crate::i18n::Locale;
use crate::middleware::role::CurrentUser;
use crate::state::AppState;
use crate::validator::{PathId, QueryParams, ValidatedJson, validate_with_locale};

fn multipart_error(err: MultipartError) -> AppError {
    AppError::bad_request(format!("invalid multipart body: {}", err.body_text()))
}

/// Reads the upload form: text fields `name`, `description`, `subject_id`
/// and one `file` part. Unknown parts are ignored.
async fn read_upload(
    mut multipart: Multipart,
    locale: Locale,
) -> Result<(CreateLearningMaterialForm, UploadedFile), AppError> {
    let mut form = CreateLearningMaterialForm::default();
    let mut name = None;
    let mut subject_id = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or_default() {
            "name" => name = Some(field.text().await.map_err(multipart_error)?),
            "description" => form.description = field.text().await.map_err(multipart_error)?,
            "subject_id" => {
                let raw = field.text().await.map_err(multipart_error)?;
                let id = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| AppError::bad_request(locale.invalid_type()))?;
                subject_id = Some(id);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let content = field.bytes().await.map_err(multipart_error)?.to_vec();
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    content,
                });
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    match name {
        Some(name) => form.name = name,
        None => missing.push(locale.missing_field("name")),
    }
    match subject_id {
        Some(id) => form.subject_id = id,
        None => missing.push(locale.missing_field("subject_id")),
    }
    if file.is_none() {
        missing.push(locale.missing_field("file"));
    }
    if !missing.is_empty() {
        return Err(AppError::validation(locale.invalid_params(), missing));
    }

    validate_with_locale(&form, locale)?;
    let file = file.ok_or_else(|| AppError::bad_request(locale.missing_field("file")))?;
    Ok((form, file))
}

/// `attachment` disposition with a quoted, ASCII-only file name.
fn content_disposition(file_name: &str) -> HeaderValue {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();

    HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[utoipa::path(
    get,
    path = "/api/v1/learning-materials",
    params(LearningMaterialFilter, PageParams),
    responses(
        (status = 200, description = "Page of learning materials", body = ApiResponse<PageData<LearningMaterial>>)
    ),
    tag = "Learning materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_materials(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<LearningMaterialFilter>,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<PageData<LearningMaterial>> {
    let page = state.page(&params);
    Ok(ApiResponse::ok(state.learning_materials.list(&filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/learning-materials/{id}",
    params(("id" = i64, Path, description = "Learning material ID")),
    responses(
        (status = 200, description = "Learning material metadata", body = ApiResponse<LearningMaterial>),
        (status = 404, description = "Learning material not found")
    ),
    tag = "Learning materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_material(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<LearningMaterial> {
    Ok(ApiResponse::ok(state.learning_materials.get(id).await?))
}

/// Download the stored file
#[utoipa::path(
    get,
    path = "/api/v1/learning-materials/{id}/content",
    params(("id" = i64, Path, description = "Learning material ID")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Learning material not found")
    ),
    tag = "Learning materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn download_material(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Response, AppError> {
    let (material, bytes) = state.learning_materials.content(id).await?;

    let content_type = HeaderValue::from_str(&material.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition(&material.file_name)),
        ],
        bytes,
    )
        .into_response())
}

/// Upload a learning material
#[utoipa::path(
    post,
    path = "/api/v1/teacher/learning-materials",
    request_body(content = LearningMaterialUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Learning material created", body = ApiResponse<LearningMaterial>),
        (status = 400, description = "Missing field, empty or oversized file"),
        (status = 404, description = "Subject not found"),
        (status = 409, description = "Name already taken")
    ),
    tag = "Learning materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, multipart), fields(caller_id = caller.id))]
pub async fn upload_material(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    locale: Locale,
    multipart: Multipart,
) -> ApiResult<LearningMaterial> {
    let (form, file) = read_upload(multipart, locale).await?;
    let material = state.learning_materials.create(form, file, caller.id).await?;
    Ok(ApiResponse::ok(material))
}

#[utoipa::path(
    put,
    path = "/api/v1/teacher/learning-materials/{id}",
    params(("id" = i64, Path, description = "Learning material ID")),
    request_body = UpdateLearningMaterialDto,
    responses(
        (status = 200, description = "Learning material updated", body = ApiResponse<LearningMaterial>),
        (status = 404, description = "Learning material not found"),
        (status = 409, description = "Name already taken")
    ),
    tag = "Learning materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, dto), fields(caller_id = caller.id))]
pub async fn update_material(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateLearningMaterialDto>,
) -> ApiResult<LearningMaterial> {
    let material = state
        .learning_materials
        .update(id, dto.into_patch(caller.id))
        .await?;
    Ok(ApiResponse::ok(material))
}

#[utoipa::path(
    delete,
    path = "/api/v1/teacher/learning-materials/{id}",
    params(("id" = i64, Path, description = "Learning material ID")),
    responses(
        (status = 200, description = "Learning material and its file deleted", body = ApiResponse<Empty>)
    ),
    tag = "Learning materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_material(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Empty> {
    state.learning_materials.delete(id).await?;
    Ok(ApiResponse::empty())
}
