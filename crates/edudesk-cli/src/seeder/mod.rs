//! Database seeding.
//!
//! Seeds classes and subjects first, then teachers and students, with
//! students spread over the seeded classes. Every seeded user shares one
//! bcrypt hash of [`DEFAULT_SEED_PASSWORD`].

pub mod catalog;
pub mod models;
pub mod users;

pub use models::SeedConfig;

use std::time::Instant;

use anyhow::Context;
use fake::Fake;
use sqlx::PgPool;

use edudesk_core::hash_password_with_cost;
use edudesk_models::UserRole;

pub const DEFAULT_SEED_PASSWORD: &str = "password123";

/// Seeds everything described by `config`.
pub async fn seed_all(db: &PgPool, config: &SeedConfig, bcrypt_cost: u32) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let run_tag: u16 = (1000..10000).fake();
    println!("🌱 Seeding run {run_tag}...");

    let class_ids = catalog::insert_classes(db, &catalog::generate_class_names(config.classes, run_tag))
        .await
        .context("failed to insert classes")?;
    println!("   ✓ Inserted {} classes", class_ids.len());

    let subject_ids =
        catalog::insert_subjects(db, &catalog::generate_subject_names(config.subjects, run_tag))
            .await
            .context("failed to insert subjects")?;
    println!("   ✓ Inserted {} subjects", subject_ids.len());

    let password_hash = hash_password_with_cost(DEFAULT_SEED_PASSWORD, bcrypt_cost)
        .map_err(|e| anyhow::anyhow!(e.message))?;

    println!("👥 Seeding {} teachers and {} students...", config.teachers, config.students);
    let mut seeds = users::generate_users(UserRole::Teacher, config.teachers, run_tag, &[], &password_hash);
    seeds.extend(users::generate_users(
        UserRole::Student,
        config.students,
        run_tag,
        &class_ids,
        &password_hash,
    ));
    users::insert_users_batch(db, &seeds)
        .await
        .context("failed to insert users")?;

    println!(
        "\n✅ Seeded {} users in {:?} (password: {DEFAULT_SEED_PASSWORD})",
        config.total_users(),
        start_time.elapsed()
    );
    Ok(())
}

/// Removes all seeded rows.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let users = users::clear_users(db).await?;
    let (classes, subjects) = catalog::clear_catalog(db).await?;
    println!("\n✅ Cleared {users} users, {classes} classes and {subjects} subjects");
    Ok(())
}
