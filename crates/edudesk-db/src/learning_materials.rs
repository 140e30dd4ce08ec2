use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use edudesk_core::Page;
use edudesk_models::{
    LearningMaterial, LearningMaterialPatch, NewLearningMaterial,
    learning_materials::LearningMaterialFilter,
};

use crate::{DbError, DbResult, like_pattern, search_text};

const MATERIAL_COLUMNS: &str = "id, name, description, content_hash, file_path, file_name, \
                                content_type, size_bytes, subject_id, created_by_id, \
                                updated_by_id, created_at, updated_at";

#[async_trait]
pub trait LearningMaterialRepository: Send + Sync {
    async fn create(&self, material: NewLearningMaterial) -> DbResult<LearningMaterial>;
    async fn get(&self, id: i64) -> DbResult<LearningMaterial>;
    async fn list_and_count(
        &self,
        filter: &LearningMaterialFilter,
        page: Page,
    ) -> DbResult<(Vec<LearningMaterial>, i64)>;
    async fn update(&self, id: i64, patch: &LearningMaterialPatch) -> DbResult<LearningMaterial>;
    async fn delete(&self, id: i64) -> DbResult<()>;
    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool>;
    async fn count_by_subject(&self, subject_id: i64) -> DbResult<i64>;
}

#[derive(Clone)]
pub struct PgLearningMaterialRepository {
    db: PgPool,
}

impl PgLearningMaterialRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &LearningMaterialFilter) {
    qb.push(" WHERE TRUE");
    if let Some(query) = search_text(&filter.query) {
        let pattern = like_pattern(query);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(subject_id) = filter.subject_id {
        qb.push(" AND subject_id = ").push_bind(subject_id);
    }
}

#[async_trait]
impl LearningMaterialRepository for PgLearningMaterialRepository {
    async fn create(&self, material: NewLearningMaterial) -> DbResult<LearningMaterial> {
        let sql = format!(
            "INSERT INTO learning_materials \
             (name, description, content_hash, file_path, file_name, content_type, size_bytes, subject_id, created_by_id, updated_by_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) RETURNING {MATERIAL_COLUMNS}"
        );
        let row = sqlx::query_as::<_, LearningMaterial>(&sql)
            .bind(material.name)
            .bind(material.description)
            .bind(material.content_hash)
            .bind(material.file_path)
            .bind(material.file_name)
            .bind(material.content_type)
            .bind(material.size_bytes)
            .bind(material.subject_id)
            .bind(material.created_by_id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> DbResult<LearningMaterial> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM learning_materials WHERE id = $1");
        let row = sqlx::query_as::<_, LearningMaterial>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn list_and_count(
        &self,
        filter: &LearningMaterialFilter,
        page: Page,
    ) -> DbResult<(Vec<LearningMaterial>, i64)> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM learning_materials");
        push_filter(&mut count_qb, filter);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.db).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {MATERIAL_COLUMNS} FROM learning_materials"
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb
            .build_query_as::<LearningMaterial>()
            .fetch_all(&self.db)
            .await?;

        Ok((rows, total))
    }

    async fn update(&self, id: i64, patch: &LearningMaterialPatch) -> DbResult<LearningMaterial> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE learning_materials SET ");
        let mut set = qb.separated(", ");
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(description) = &patch.description {
            set.push("description = ").push_bind_unseparated(description.clone());
        }
        if let Some(updated_by_id) = patch.updated_by_id {
            set.push("updated_by_id = ").push_bind_unseparated(updated_by_id);
        }
        set.push("updated_at = NOW()");

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {MATERIAL_COLUMNS}"));

        qb.build_query_as::<LearningMaterial>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM learning_materials WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM learning_materials WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn count_by_subject(&self, subject_id: i64) -> DbResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM learning_materials WHERE subject_id = $1",
        )
        .bind(subject_id)
        .fetch_one(&self.db)
        .await?;
        Ok(total)
    }
}
