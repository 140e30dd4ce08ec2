use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use edudesk_core::Page;
use edudesk_models::{NameFilter, NewSubject, Subject, SubjectPatch};

use crate::{DbError, DbResult, like_pattern, search_text};

const SUBJECT_COLUMNS: &str = "id, name, description, created_by_id, created_at, updated_at";

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn create(&self, subject: NewSubject) -> DbResult<Subject>;
    async fn get(&self, id: i64) -> DbResult<Subject>;
    async fn list_and_count(
        &self,
        filter: &NameFilter,
        page: Page,
    ) -> DbResult<(Vec<Subject>, i64)>;
    async fn update(&self, id: i64, patch: &SubjectPatch) -> DbResult<Subject>;
    async fn delete(&self, id: i64) -> DbResult<()>;
    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool>;
}

#[derive(Clone)]
pub struct PgSubjectRepository {
    db: PgPool,
}

impl PgSubjectRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &NameFilter) {
    qb.push(" WHERE TRUE");
    if let Some(query) = search_text(&filter.query) {
        let pattern = like_pattern(query);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl SubjectRepository for PgSubjectRepository {
    async fn create(&self, subject: NewSubject) -> DbResult<Subject> {
        let sql = format!(
            "INSERT INTO subjects (name, description, created_by_id) VALUES ($1, $2, $3) \
             RETURNING {SUBJECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Subject>(&sql)
            .bind(subject.name)
            .bind(subject.description)
            .bind(subject.created_by_id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> DbResult<Subject> {
        let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = $1");
        let row = sqlx::query_as::<_, Subject>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn list_and_count(
        &self,
        filter: &NameFilter,
        page: Page,
    ) -> DbResult<(Vec<Subject>, i64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM subjects");
        push_filter(&mut count_qb, filter);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.db).await?;

        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {SUBJECT_COLUMNS} FROM subjects"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb.build_query_as::<Subject>().fetch_all(&self.db).await?;

        Ok((rows, total))
    }

    async fn update(&self, id: i64, patch: &SubjectPatch) -> DbResult<Subject> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE subjects SET ");
        let mut set = qb.separated(", ");
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(description) = &patch.description {
            set.push("description = ").push_bind_unseparated(description.clone());
        }
        set.push("updated_at = NOW()");

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {SUBJECT_COLUMNS}"));

        qb.build_query_as::<Subject>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM subjects WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }
}
