use async_trait::async_trait;
use chrono::Utc;

use edudesk_core::Page;
use edudesk_models::{NameFilter, NewSubject, Subject, SubjectPatch};

use super::{Table, matches_query, next_id, paginate};
use crate::{DbError, DbResult, SubjectRepository};

pub struct InMemorySubjectRepository {
    table: Table<Subject>,
}

impl InMemorySubjectRepository {
    pub fn new() -> Self {
        Self { table: Table::new() }
    }
}

impl Default for InMemorySubjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubjectRepository for InMemorySubjectRepository {
    async fn create(&self, subject: NewSubject) -> DbResult<Subject> {
        let mut guard = self.table.lock();
        if guard.0.values().any(|s| s.name == subject.name) {
            return Err(DbError::UniqueViolation("subjects_name_key".to_string()));
        }

        let id = next_id(&mut guard);
        let now = Utc::now();
        let row = Subject {
            id,
            name: subject.name,
            description: subject.description,
            created_by_id: subject.created_by_id,
            created_at: now,
            updated_at: now,
        };
        guard.0.insert(id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> DbResult<Subject> {
        self.table.get(id)
    }

    async fn list_and_count(
        &self,
        filter: &NameFilter,
        page: Page,
    ) -> DbResult<(Vec<Subject>, i64)> {
        let rows = self
            .table
            .filtered(|s| matches_query(&filter.query, &[&s.name, &s.description]));
        Ok(paginate(rows, page))
    }

    async fn update(&self, id: i64, patch: &SubjectPatch) -> DbResult<Subject> {
        let mut guard = self.table.lock();
        let renamed_onto_taken = patch
            .name
            .as_ref()
            .is_some_and(|name| guard.0.values().any(|s| s.id != id && &s.name == name));
        if renamed_onto_taken {
            return Err(DbError::UniqueViolation("subjects_name_key".to_string()));
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
            .filtered(|s| s.name == name && Some(s.id) != exclude_id)
            .is_empty())
    }
}
