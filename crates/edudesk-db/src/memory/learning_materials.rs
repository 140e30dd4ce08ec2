use async_trait::async_trait;
use chrono::Utc;

use edudesk_core::Page;
use edudesk_models::{
    LearningMaterial, LearningMaterialPatch, NewLearningMaterial,
    learning_materials::LearningMaterialFilter,
};

use super::{Table, matches_query, next_id, paginate};
use crate::{DbError, DbResult, LearningMaterialRepository};

pub struct InMemoryLearningMaterialRepository {
    table: Table<LearningMaterial>,
}

impl InMemoryLearningMaterialRepository {
    pub fn new() -> Self {
        Self { table: Table::new() }
    }
}

impl Default for InMemoryLearningMaterialRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LearningMaterialRepository for InMemoryLearningMaterialRepository {
    async fn create(&self, material: NewLearningMaterial) -> DbResult<LearningMaterial> {
        let mut guard = self.table.lock();
        if guard.0.values().any(|m| m.name == material.name) {
            return Err(DbError::UniqueViolation(
                "learning_materials_name_key".to_string(),
            ));
        }

        let id = next_id(&mut guard);
        let now = Utc::now();
        let row = LearningMaterial {
            id,
            name: material.name,
            description: material.description,
            content_hash: material.content_hash,
            file_path: material.file_path,
            file_name: material.file_name,
            content_type: material.content_type,
            size_bytes: material.size_bytes,
            subject_id: material.subject_id,
            created_by_id: material.created_by_id,
            updated_by_id: material.created_by_id,
            created_at: now,
            updated_at: now,
        };
        guard.0.insert(id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> DbResult<LearningMaterial> {
        self.table.get(id)
    }

    async fn list_and_count(
        &self,
        filter: &LearningMaterialFilter,
        page: Page,
    ) -> DbResult<(Vec<LearningMaterial>, i64)> {
        let rows = self.table.filtered(|m| {
            matches_query(&filter.query, &[&m.name, &m.description])
                && filter.subject_id.is_none_or(|id| m.subject_id == id)
        });
        Ok(paginate(rows, page))
    }

    async fn update(&self, id: i64, patch: &LearningMaterialPatch) -> DbResult<LearningMaterial> {
        let mut guard = self.table.lock();
        let renamed_onto_taken = patch
            .name
            .as_ref()
            .is_some_and(|name| guard.0.values().any(|m| m.id != id && &m.name == name));
        if renamed_onto_taken {
            return Err(DbError::UniqueViolation(
                "learning_materials_name_key".to_string(),
            ));
        }

        let row = guard.0.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        if let Some(description) = &patch.description {
            row.description = description.clone();
        }
        if let Some(updated_by_id) = patch.updated_by_id {
            row.updated_by_id = Some(updated_by_id);
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        self.table.remove(id);
        Ok(())
    }

    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        Ok(!self
            .table
            .filtered(|m| m.name == name && Some(m.id) != exclude_id)
            .is_empty())
    }

    async fn count_by_subject(&self, subject_id: i64) -> DbResult<i64> {
        Ok(self.table.filtered(|m| m.subject_id == subject_id).len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(name: &str, subject_id: i64) -> NewLearningMaterial {
        NewLearningMaterial {
            name: name.to_string(),
            description: String::new(),
            content_hash: "abc".to_string(),
            file_path: format!("materials/{name}.pdf"),
            file_name: format!("{name}.pdf"),
            content_type: "application/pdf".to_string(),
            size_bytes: 3,
            subject_id,
            created_by_id: Some(1),
        }
    }

    #[tokio::test]
    async fn test_subject_filter_and_count() {
        let repo = InMemoryLearningMaterialRepository::new();
        repo.create(material("algebra", 1)).await.unwrap();
        repo.create(material("geometry", 1)).await.unwrap();
        repo.create(material("poetry", 2)).await.unwrap();

        assert_eq!(repo.count_by_subject(1).await.unwrap(), 2);
        assert_eq!(repo.count_by_subject(3).await.unwrap(), 0);

        let filter = LearningMaterialFilter {
            query: Some("GEO".into()),
            subject_id: Some(1),
        };
        let page = Page::new(None, None, 20, 100);
        let (items, total) = repo.list_and_count(&filter, page).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "geometry");
    }

    #[tokio::test]
    async fn test_update_records_editor() {
        let repo = InMemoryLearningMaterialRepository::new();
        let row = repo.create(material("algebra", 1)).await.unwrap();
        assert_eq!(row.updated_by_id, Some(1));

        let patch = LearningMaterialPatch {
            description: Some("chapter one".into()),
            updated_by_id: Some(5),
            ..Default::default()
        };
        let updated = repo.update(row.id, &patch).await.unwrap();
        assert_eq!(updated.updated_by_id, Some(5));
        assert_eq!(updated.name, "algebra");
    }
}
