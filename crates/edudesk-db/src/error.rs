use edudesk_core::AppError;

/// Storage failures, classified just enough for the service layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("row not found")]
    NotFound,

    /// A unique constraint rejected the write (named by its constraint).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint rejected the write.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => return Self::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                return Self::UniqueViolation(db_err.constraint().unwrap_or("unique").to_string());
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                return Self::ForeignKeyViolation(
                    db_err.constraint().unwrap_or("foreign_key").to_string(),
                );
            }
            _ => {}
        }
        Self::Sqlx(err)
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AppError::not_found("resource not found"),
            DbError::UniqueViolation(_) => AppError::conflict("resource already exists"),
            DbError::ForeignKeyViolation(_) => {
                AppError::conflict("resource is referenced by other records")
            }
            DbError::Sqlx(e) => AppError::internal(e),
        }
    }
}

/// Names the missing entity in not-found errors.
pub trait DbResultExt<T> {
    fn or_not_found(self, entity: &str) -> Result<T, AppError>;
}

impl<T> DbResultExt<T> for DbResult<T> {
    fn or_not_found(self, entity: &str) -> Result<T, AppError> {
        self.map_err(|e| match e {
            DbError::NotFound => AppError::not_found(format!("{entity} not found")),
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edudesk_core::ErrorCode;

    #[test]
    fn test_row_not_found_is_classified() {
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::NotFound));
    }

    #[test]
    fn test_app_error_mapping() {
        let err: AppError = DbError::UniqueViolation("users_name_key".into()).into();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err: AppError = DbError::NotFound.into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = DbError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert!(err.source.is_some());
    }

    #[test]
    fn test_or_not_found_names_entity() {
        let result: DbResult<()> = Err(DbError::NotFound);
        let err = result.or_not_found("class").unwrap_err();
        assert_eq!(err.message, "class not found");
    }
}
