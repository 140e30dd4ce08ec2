use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{create_subject, delete_subject, get_subject, list_subjects, update_subject};

pub fn init_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subjects))
        .route("/{id}", get(get_subject))
}

pub fn init_manage_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subject))
        .route("/{id}", put(update_subject).delete(delete_subject))
}
