use axum::{
    Router,
    routing::{post, put},
};

use crate::modules::students::controller::{
    assign_class, create_student, delete_student, list_students, update_student, user_exists,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(list_students))
        .route("/{id}", put(update_student).delete(delete_student))
        .route("/{id}/class", put(assign_class))
}

pub fn init_user_probe_router() -> Router<AppState> {
    Router::new().route("/exists", post(user_exists))
}
