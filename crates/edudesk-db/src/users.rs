use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use edudesk_core::Page;
use edudesk_models::{NewUser, User, UserFilter, UserPatch};

use crate::{DbError, DbResult, like_pattern, search_text};

const USER_COLUMNS: &str = "id, name, nickname, phone, email, role, is_admin, password, \
                            class_id, created_by_id, created_at, updated_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> DbResult<User>;
    async fn get(&self, id: i64) -> DbResult<User>;
    async fn get_by_name(&self, name: &str) -> DbResult<User>;
    /// Page of users ordered by id, plus the total matching count.
    async fn list_and_count(&self, filter: &UserFilter, page: Page) -> DbResult<(Vec<User>, i64)>;
    async fn update(&self, id: i64, patch: &UserPatch) -> DbResult<User>;
    /// Idempotent: deleting a missing row succeeds.
    async fn delete(&self, id: i64) -> DbResult<()>;
    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool>;
    async fn is_phone_exist(&self, phone: &str, exclude_id: Option<i64>) -> DbResult<bool>;
    async fn is_email_exist(&self, email: &str, exclude_id: Option<i64>) -> DbResult<bool>;
    async fn count(&self) -> DbResult<i64>;
    /// Removes every member from a class; returns the number of rows touched.
    async fn clear_class(&self, class_id: i64) -> DbResult<u64>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn exists(&self, column: &str, value: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM users WHERE {column} = $1 AND ($2::BIGINT IS NULL OR id <> $2))"
        );
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(value)
            .bind(exclude_id)
            .fetch_one(&self.db)
            .await?;
        Ok(exists)
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE TRUE");

    if let Some(query) = search_text(&filter.query) {
        let pattern = like_pattern(query);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR nickname ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR phone ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role);
    }
    if let Some(class_id) = filter.class_id {
        qb.push(" AND class_id = ").push_bind(class_id);
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> DbResult<User> {
        let sql = format!(
            "INSERT INTO users (name, nickname, phone, email, password, role, is_admin, class_id, created_by_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(user.name)
            .bind(user.nickname)
            .bind(user.phone)
            .bind(user.email)
            .bind(user.password)
            .bind(user.role)
            .bind(user.is_admin)
            .bind(user.class_id)
            .bind(user.created_by_id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> DbResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn get_by_name(&self, name: &str) -> DbResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE name = $1");
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn list_and_count(&self, filter: &UserFilter, page: Page) -> DbResult<(Vec<User>, i64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filter(&mut count_qb, filter);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.db).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb.build_query_as::<User>().fetch_all(&self.db).await?;

        Ok((rows, total))
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> DbResult<User> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut set = qb.separated(", ");
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(nickname) = &patch.nickname {
            set.push("nickname = ").push_bind_unseparated(nickname.clone());
        }
        if let Some(phone) = &patch.phone {
            set.push("phone = ").push_bind_unseparated(phone.clone());
        }
        if let Some(email) = &patch.email {
            set.push("email = ").push_bind_unseparated(email.clone());
        }
        if let Some(role) = patch.role {
            set.push("role = ").push_bind_unseparated(role);
        }
        if let Some(is_admin) = patch.is_admin {
            set.push("is_admin = ").push_bind_unseparated(is_admin);
        }
        if let Some(class_id) = patch.class_id {
            set.push("class_id = ").push_bind_unseparated(class_id);
        }
        if let Some(password) = &patch.password {
            set.push("password = ").push_bind_unseparated(password.clone());
        }
        set.push("updated_at = NOW()");

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {USER_COLUMNS}"));

        qb.build_query_as::<User>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn is_name_exist(&self, name: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        self.exists("name", name, exclude_id).await
    }

    async fn is_phone_exist(&self, phone: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        self.exists("phone", phone, exclude_id).await
    }

    async fn is_email_exist(&self, email: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        self.exists("email", email, exclude_id).await
    }

    async fn count(&self) -> DbResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(total)
    }

    async fn clear_class(&self, class_id: i64) -> DbResult<u64> {
        let result =
            sqlx::query("UPDATE users SET class_id = NULL, updated_at = NOW() WHERE class_id = $1")
                .bind(class_id)
                .execute(&self.db)
                .await?;
        Ok(result.rows_affected())
    }
}
