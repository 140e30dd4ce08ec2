//! In-memory repository doubles.
//!
//! Each repository keeps its rows in a `BTreeMap` keyed by id, so listings
//! come back in id order like the `ORDER BY id ASC` queries. Unique
//! constraints are emulated and reported as [`DbError::UniqueViolation`]
//! with the same constraint names the schema declares.

mod classes;
mod learning_materials;
mod subjects;
mod users;

pub use classes::InMemoryClassRepository;
pub use learning_materials::InMemoryLearningMaterialRepository;
pub use subjects::InMemorySubjectRepository;
pub use users::InMemoryUserRepository;

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use edudesk_core::Page;

use crate::{DbError, DbResult, search_text};

pub(crate) struct Table<T> {
    rows: Mutex<(BTreeMap<i64, T>, i64)>,
}

impl<T: Clone> Table<T> {
    pub(crate) fn new() -> Self {
        Self {
            rows: Mutex::new((BTreeMap::new(), 0)),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, (BTreeMap<i64, T>, i64)> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn get(&self, id: i64) -> DbResult<T> {
        self.lock().0.get(&id).cloned().ok_or(DbError::NotFound)
    }

    pub(crate) fn remove(&self, id: i64) {
        self.lock().0.remove(&id);
    }

    pub(crate) fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.lock().0.values().filter(|row| keep(row)).cloned().collect()
    }
}

/// Next id for a table guarded by `guard`.
pub(crate) fn next_id<T>(guard: &mut (BTreeMap<i64, T>, i64)) -> i64 {
    guard.1 += 1;
    guard.1
}

/// Mirrors `ILIKE '%query%'` for a blank-tolerant search text.
pub(crate) fn matches_query(query: &Option<String>, fields: &[&str]) -> bool {
    match search_text(query) {
        None => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        }
    }
}

/// Slices an id-ordered result set the way `LIMIT`/`OFFSET` would.
pub(crate) fn paginate<T>(rows: Vec<T>, page: Page) -> (Vec<T>, i64) {
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(page.offset().max(0) as usize)
        .take(page.limit().max(0) as usize)
        .collect();
    (items, total)
}
