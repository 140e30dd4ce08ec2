//! # Edudesk DB
//!
//! Database pool, schema bootstrap and repositories for the Edudesk API.
//!
//! Every entity has a repository trait with a PostgreSQL implementation.
//! With the `test-utils` feature an in-memory implementation of each trait
//! is available in [`memory`], so services and routers can be exercised
//! without a database.
//!
//! # Example
//!
//! ```ignore
//! use edudesk_db::{init_db_pool, ensure_schema, users::PgUserRepository};
//!
//! let pool = init_db_pool(&settings.database).await?;
//! ensure_schema(&pool).await?;
//! let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
//! ```

pub mod classes;
pub mod error;
pub mod learning_materials;
pub mod schema;
pub mod subjects;
pub mod users;

#[cfg(feature = "test-utils")]
pub mod memory;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use edudesk_config::DatabaseConfig;

pub use classes::{ClassRepository, PgClassRepository};
pub use error::{DbError, DbResult, DbResultExt};
pub use learning_materials::{LearningMaterialRepository, PgLearningMaterialRepository};
pub use schema::ensure_schema;
pub use subjects::{PgSubjectRepository, SubjectRepository};
pub use users::{PgUserRepository, UserRepository};

/// Initializes a PostgreSQL connection pool from the database settings.
///
/// Called once at startup; the pool is cheaply cloneable and shared through
/// the application state.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect(&config.connection_url())
        .await?;

    info!(
        host = %config.host,
        database = %config.database,
        max_connections = config.max_connections,
        "database pool initialized"
    );

    Ok(pool)
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// `%text%` pattern for `ILIKE`, with LIKE wildcards in `text` escaped.
pub(crate) fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Non-empty, trimmed search text.
pub(crate) fn search_text(query: &Option<String>) -> Option<&str> {
    query.as_deref().map(str::trim).filter(|q| !q.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ann"), "%ann%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_search_text_ignores_blank() {
        assert_eq!(search_text(&None), None);
        assert_eq!(search_text(&Some("  ".into())), None);
        assert_eq!(search_text(&Some(" ann ".into())), Some("ann"));
    }
}
