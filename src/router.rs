use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::i18n::LOCALE_HEADER;
use crate::logging::logging_middleware;
use crate::middleware::locale::select_locale;
use crate::middleware::role::{require_admin, require_teacher, require_user};
use crate::modules::auth::init_auth_router;
use crate::modules::classes::{init_classes_router, init_manage_classes_router};
use crate::modules::health::init_health_router;
use crate::modules::learning_materials::{
    init_learning_materials_router, init_manage_learning_materials_router,
};
use crate::modules::students::{init_students_router, init_user_probe_router};
use crate::modules::subjects::{init_manage_subjects_router, init_subjects_router};
use crate::modules::users::{init_profile_router, init_users_router};
use crate::state::AppState;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::HeaderName::from_static(LOCALE_HEADER),
        ])
        .allow_credentials(true)
}

/// Routes open to teachers and admins.
fn teacher_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/students", init_students_router())
        .nest("/users", init_user_probe_router())
        .nest("/classes", init_manage_classes_router())
        .nest("/subjects", init_manage_subjects_router())
        .nest(
            "/learning-materials",
            init_manage_learning_materials_router(state.learning_materials.max_file_size()),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_teacher))
}

/// Profile and read-only catalog routes open to any valid token.
fn user_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/users", init_profile_router())
        .nest("/classes", init_classes_router())
        .nest("/subjects", init_subjects_router())
        .nest("/learning-materials", init_learning_materials_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user))
}

fn admin_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/users", init_users_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

pub fn init_router(state: AppState) -> Router {
    let settings = state.settings.current();

    let api = Router::new()
        .merge(init_auth_router())
        .merge(user_router(&state))
        .nest("/teacher", teacher_router(&state))
        .nest("/admin", admin_router(&state));

    Router::new()
        .merge(SwaggerUi::new("/swagger").url("/swagger/openapi.json", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest("/api/v1", api)
        .with_state(state)
        .layer(middleware::from_fn(select_locale))
        .layer(TimeoutLayer::new(settings.server.request_timeout()))
        .layer(cors_layer(&settings.cors.allowed_origins))
        .layer(middleware::from_fn(logging_middleware))
}
