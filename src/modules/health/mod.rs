//! Liveness and readiness probes. Both answer with an empty body.

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tracing::warn;

use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/liveness",
    responses((status = 204, description = "Process is up")),
    tag = "Health"
)]
pub async fn liveness() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Ready when the database answers `SELECT 1`.
#[utoipa::path(
    get,
    path = "/readiness",
    responses(
        (status = 204, description = "Database reachable"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Health"
)]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(db) = &state.db else {
        return StatusCode::SERVICE_UNAVAILABLE;
    };

    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(db).await {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/liveness", get(liveness))
        .route("/readiness", get(readiness))
}
