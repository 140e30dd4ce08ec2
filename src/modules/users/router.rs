use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    change_password, create_user, delete_user, get_profile, get_user, list_users, toggle_admin,
    update_profile, update_role, update_user,
};

/// Self-service routes, open to any authenticated user.
pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile).put(update_profile))
        .route("/me/password", put(change_password))
}

/// User management, mounted under `/admin/users` behind the admin gate.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/admin", put(toggle_admin))
        .route("/{id}/role", put(update_role))
}
