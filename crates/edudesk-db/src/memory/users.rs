use async_trait::async_trait;
use chrono::Utc;

use edudesk_core::Page;
use edudesk_models::{NewUser, User, UserFilter, UserPatch};

use super::{Table, matches_query, next_id, paginate};
use crate::{DbError, DbResult, UserRepository};

pub struct InMemoryUserRepository {
    table: Table<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self { table: Table::new() }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// First unique constraint `candidate` would break, ignoring row `skip`.
fn violated_constraint(rows: &[&User], candidate: &User, skip: Option<i64>) -> Option<&'static str> {
    for other in rows.iter().filter(|u| Some(u.id) != skip) {
        if other.name == candidate.name {
            return Some("users_name_key");
        }
        if other.phone == candidate.phone {
            return Some("users_phone_key");
        }
        if other.email == candidate.email {
            return Some("users_email_key");
        }
    }
    None
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> DbResult<User> {
        let mut guard = self.table.lock();
        let now = Utc::now();
        let row = User {
            id: 0,
            name: user.name,
            nickname: user.nickname,
            phone: user.phone,
            email: user.email,
            role: user.role,
            is_admin: user.is_admin,
            password: user.password,
            class_id: user.class_id,
            created_by_id: user.created_by_id,
            created_at: now,
            updated_at: now,
        };
        let existing: Vec<&User> = guard.0.values().collect();
        if let Some(constraint) = violated_constraint(&existing, &row, None) {
            return Err(DbError::UniqueViolation(constraint.to_string()));
        }

        let id = next_id(&mut guard);
        let row = User { id, ..row };
        guard.0.insert(id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> DbResult<User> {
        self.table.get(id)
    }

    async fn get_by_name(&self, name: &str) -> DbResult<User> {
        self.table
            .filtered(|u| u.name == name)
            .into_iter()
            .next()
            .ok_or(DbError::NotFound)
    }

    async fn list_and_count(&self, filter: &UserFilter, page: Page) -> DbResult<(Vec<User>, i64)> {
        let rows = self.table.filtered(|u| {
            matches_query(&filter.query, &[&u.name, &u.nickname, &u.phone, &u.email])
                && filter.role.is_none_or(|role| u.role == role)
                && filter.class_id.is_none_or(|class_id| u.class_id == Some(class_id))
        });
        Ok(paginate(rows, page))
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> DbResult<User> {
        let mut guard = self.table.lock();
        let mut row = guard.0.get(&id).cloned().ok_or(DbError::NotFound)?;

        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        if let Some(nickname) = &patch.nickname {
            row.nickname = nickname.clone();
        }
        if let Some(phone) = &patch.phone {
            row.phone = phone.clone();
        }
        if let Some(email) = &patch.email {
            row.email = email.clone();
        }
        if let Some(role) = patch.role {
            row.role = role;
        }
        if let Some(is_admin) = patch.is_admin {
            row.is_admin = is_admin;
        }
        if let Some(class_id) = patch.class_id {
            row.class_id = class_id;
        }
        if let Some(password) = &patch.password {
            row.password = password.clone();
        }
        row.updated_at = Utc::now();

        let existing: Vec<&User> = guard.0.values().collect();
        if let Some(constraint) = violated_constraint(&existing, &row, Some(id)) {
            return Err(DbError::UniqueViolation(constraint.to_string()));
        }

        guard.0.insert(id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        self.table.remove(id);
        Ok(())
    }

    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        Ok(!self
            .table
            .filtered(|u| u.name == name && Some(u.id) != exclude_id)
            .is_empty())
    }

    async fn is_phone_exist(&self, phone: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        Ok(!self
            .table
            .filtered(|u| u.phone == phone && Some(u.id) != exclude_id)
            .is_empty())
    }

    async fn is_email_exist(&self, email: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        Ok(!self
            .table
            .filtered(|u| u.email == email && Some(u.id) != exclude_id)
            .is_empty())
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.table.lock().0.len() as i64)
    }

    async fn clear_class(&self, class_id: i64) -> DbResult<u64> {
        let mut guard = self.table.lock();
        let mut touched = 0;
        for row in guard.0.values_mut() {
            if row.class_id == Some(class_id) {
                row.class_id = None;
                row.updated_at = Utc::now();
                touched += 1;
            }
        }
        Ok(touched)
    }
}
