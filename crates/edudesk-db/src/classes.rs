use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use edudesk_core::Page;
use edudesk_models::{Class, ClassPatch, NameFilter, NewClass};

use crate::{DbError, DbResult, like_pattern, search_text};

const CLASS_COLUMNS: &str = "id, name, description, created_by_id, created_at, updated_at";

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn create(&self, class: NewClass) -> DbResult<Class>;
    async fn get(&self, id: i64) -> DbResult<Class>;
    async fn list_and_count(&self, filter: &NameFilter, page: Page) -> DbResult<(Vec<Class>, i64)>;
    async fn update(&self, id: i64, patch: &ClassPatch) -> DbResult<Class>;
    async fn delete(&self, id: i64) -> DbResult<()>;
    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool>;
}

#[derive(Clone)]
pub struct PgClassRepository {
    db: PgPool,
}

impl PgClassRepository {
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
impl ClassRepository for PgClassRepository {
    async fn create(&self, class: NewClass) -> DbResult<Class> {
        let sql = format!(
            "INSERT INTO classes (name, description, created_by_id) VALUES ($1, $2, $3) \
             RETURNING {CLASS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Class>(&sql)
            .bind(class.name)
            .bind(class.description)
            .bind(class.created_by_id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> DbResult<Class> {
        let sql = format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1");
        let row = sqlx::query_as::<_, Class>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn list_and_count(&self, filter: &NameFilter, page: Page) -> DbResult<(Vec<Class>, i64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM classes");
        push_filter(&mut count_qb, filter);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.db).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {CLASS_COLUMNS} FROM classes"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb.build_query_as::<Class>().fetch_all(&self.db).await?;

        Ok((rows, total))
    }

    async fn update(&self, id: i64, patch: &ClassPatch) -> DbResult<Class> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE classes SET ");
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
            .push(format!(" RETURNING {CLASS_COLUMNS}"));

        qb.build_query_as::<Class>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM classes WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }
}
