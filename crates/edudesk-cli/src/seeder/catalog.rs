//! Class and subject seeding.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::SEED_MARKER;

const SUBJECT_NAMES: &[&str] = &[
    "Mathematics",
    "English",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Music",
    "Art",
    "Computing",
];

pub fn generate_class_names(count: usize, run_tag: u16) -> Vec<String> {
    (1..=count).map(|n| format!("Class {run_tag}-{n}")).collect()
}

pub fn generate_subject_names(count: usize, run_tag: u16) -> Vec<String> {
    (0..count)
        .map(|idx| {
            let base = SUBJECT_NAMES[idx % SUBJECT_NAMES.len()];
            format!("{base} {run_tag}-{}", idx / SUBJECT_NAMES.len() + 1)
        })
        .collect()
}

/// Inserts named rows into `classes` or `subjects`; returns their ids.
async fn insert_named(db: &PgPool, table: &str, names: &[String]) -> Result<Vec<i64>, sqlx::Error> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {table} (name, description) "));
    qb.push_values(names, |mut row, name| {
        row.push_bind(name).push_bind(SEED_MARKER);
    });
    qb.push(" RETURNING id");

    qb.build_query_scalar::<i64>().fetch_all(db).await
}

pub async fn insert_classes(db: &PgPool, names: &[String]) -> Result<Vec<i64>, sqlx::Error> {
    insert_named(db, "classes", names).await
}

pub async fn insert_subjects(db: &PgPool, names: &[String]) -> Result<Vec<i64>, sqlx::Error> {
    insert_named(db, "subjects", names).await
}

/// Deletes seeded classes and any seeded subject with no materials left.
pub async fn clear_catalog(db: &PgPool) -> Result<(u64, u64), sqlx::Error> {
    let classes = sqlx::query("DELETE FROM classes WHERE description = $1")
        .bind(SEED_MARKER)
        .execute(db)
        .await?
        .rows_affected();

    let subjects = sqlx::query(
        "DELETE FROM subjects s WHERE s.description = $1 \
         AND NOT EXISTS (SELECT 1 FROM learning_materials m WHERE m.subject_id = s.id)",
    )
    .bind(SEED_MARKER)
    .execute(db)
    .await?
    .rows_affected();

    Ok((classes, subjects))
}
