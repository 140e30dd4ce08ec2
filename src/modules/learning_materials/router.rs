use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    delete_material, download_material, get_material, list_materials, update_material,
    upload_material,
};

/// Room for the multipart framing and text fields around the file.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn init_learning_materials_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials))
        .route("/{id}", get(get_material))
        .route("/{id}/content", get(download_material))
}

pub fn init_manage_learning_materials_router(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(upload_material)
                .layer(DefaultBodyLimit::max(max_file_size + FORM_OVERHEAD_BYTES)),
        )
        .route("/{id}", put(update_material).delete(delete_material))
}
