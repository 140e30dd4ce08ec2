//! User seeding.
//!
//! Seeded rows are tagged with a per-run number so repeated runs do not
//! collide on the unique name, phone and email columns.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::{PgPool, Postgres, QueryBuilder};

use edudesk_models::{NewUser, UserRole};

use super::models::SEED_EMAIL_DOMAIN;

// 9 binds per row
const BATCH_SIZE: usize = 1000;

/// Generates `count` users of `role`, spreading students across `class_ids`
/// round-robin.
pub fn generate_users(
    role: UserRole,
    count: usize,
    run_tag: u16,
    class_ids: &[i64],
    password_hash: &str,
) -> Vec<NewUser> {
    (0..count)
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let name = format!("{}_{run_tag}_{idx}", role.as_str());
            let role_digit = match role {
                UserRole::Student => 1,
                UserRole::Teacher => 2,
            };
            let class_id = match role {
                UserRole::Student if !class_ids.is_empty() => Some(class_ids[idx % class_ids.len()]),
                _ => None,
            };

            NewUser {
                email: format!("{name}@{SEED_EMAIL_DOMAIN}"),
                phone: format!("1{role_digit}{run_tag:04}{idx:06}"),
                nickname: format!("{first_name} {last_name}"),
                name,
                password: password_hash.to_string(),
                role,
                is_admin: false,
                class_id,
                created_by_id: None,
            }
        })
        .collect()
}

/// Inserts users in one transaction, in multi-row batches.
pub async fn insert_users_batch(db: &PgPool, users: &[NewUser]) -> Result<u64, sqlx::Error> {
    let start_time = Instant::now();
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in users.chunks(BATCH_SIZE) {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO users (name, nickname, phone, email, password, role, is_admin, class_id, created_by_id) ",
        );
        qb.push_values(chunk, |mut row, user| {
            row.push_bind(&user.name)
                .push_bind(&user.nickname)
                .push_bind(&user.phone)
                .push_bind(&user.email)
                .push_bind(&user.password)
                .push_bind(user.role)
                .push_bind(user.is_admin)
                .push_bind(user.class_id)
                .push_bind(user.created_by_id);
        });
        inserted += qb.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    println!("   ✓ Inserted {} users in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}

/// Deletes every seeded user. Accounts created through the API are kept.
pub async fn clear_users(db: &PgPool) -> Result<u64, sqlx::Error> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .execute(db)
        .await?
        .rows_affected();

    println!("   ✓ Deleted {} users in {:?}", deleted, start_time.elapsed());
    Ok(deleted)
}
