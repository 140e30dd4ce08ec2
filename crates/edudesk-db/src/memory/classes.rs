use async_trait::async_trait;
use chrono::Utc;

use edudesk_core::Page;
use edudesk_models::{Class, ClassPatch, NameFilter, NewClass};

use super::{Table, matches_query, next_id, paginate};
use crate::{ClassRepository, DbError, DbResult};

pub struct InMemoryClassRepository {
    table: Table<Class>,
}

impl InMemoryClassRepository {
    pub fn new() -> Self {
        Self { table: Table::new() }
    }
}

impl Default for InMemoryClassRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClassRepository for InMemoryClassRepository {
    async fn create(&self, class: NewClass) -> DbResult<Class> {
        let mut guard = self.table.lock();
        if guard.0.values().any(|c| c.name == class.name) {
            return Err(DbError::UniqueViolation("classes_name_key".to_string()));
        }

        let id = next_id(&mut guard);
        let now = Utc::now();
        let row = Class {
            id,
            name: class.name,
            description: class.description,
            created_by_id: class.created_by_id,
            created_at: now,
            updated_at: now,
        };
        guard.0.insert(id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> DbResult<Class> {
        self.table.get(id)
    }

    async fn list_and_count(&self, filter: &NameFilter, page: Page) -> DbResult<(Vec<Class>, i64)> {
        let rows = self
            .table
            .filtered(|c| matches_query(&filter.query, &[&c.name, &c.description]));
        Ok(paginate(rows, page))
    }

    async fn update(&self, id: i64, patch: &ClassPatch) -> DbResult<Class> {
        let mut guard = self.table.lock();
        let renamed_onto_taken = patch
            .name
            .as_ref()
            .is_some_and(|name| guard.0.values().any(|c| c.id != id && &c.name == name));
        if renamed_onto_taken {
            return Err(DbError::UniqueViolation("classes_name_key".to_string()));
        }

        let row = guard.0.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        if let Some(description) = &patch.description {
            row.description = description.clone();
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
            .filtered(|c| c.name == name && Some(c.id) != exclude_id)
            .is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_class(name: &str, description: &str) -> NewClass {
        NewClass {
            name: name.to_string(),
            description: description.to_string(),
            created_by_id: Some(1),
        }
    }

    #[tokio::test]
    async fn test_search_matches_description() {
        let repo = InMemoryClassRepository::new();
        repo.create(new_class("1A", "Morning group")).await.unwrap();
        repo.create(new_class("1B", "Evening group")).await.unwrap();

        let filter = NameFilter {
            query: Some("morning".into()),
        };
        let page = Page::new(None, None, 20, 100);
        let (items, total) = repo.list_and_count(&filter, page).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "1A");
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_fails() {
        let repo = InMemoryClassRepository::new();
        repo.create(new_class("1A", "")).await.unwrap();
        let b = repo.create(new_class("1B", "")).await.unwrap();

        let patch = ClassPatch {
            name: Some("1A".into()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update(b.id, &patch).await,
            Err(DbError::UniqueViolation(_))
        ));

        let patch = ClassPatch {
            name: Some("1B".into()),
            description: Some("kept name".into()),
        };
        let updated = repo.update(b.id, &patch).await.unwrap();
        assert_eq!(updated.description, "kept name");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryClassRepository::new();
        let patch = ClassPatch::default();
        assert!(matches!(repo.update(9, &patch).await, Err(DbError::NotFound)));
    }
}
