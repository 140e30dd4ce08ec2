use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_class, delete_class, get_class, list_classes, list_members, update_class,
};

/// Read-only routes for any authenticated user.
pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes))
        .route("/{id}", get(get_class))
        .route("/{id}/members", get(list_members))
}

/// Management routes, mounted behind the teacher gate.
pub fn init_manage_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class))
        .route("/{id}", put(update_class).delete(delete_class))
}
