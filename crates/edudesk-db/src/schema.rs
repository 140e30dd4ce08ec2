//! Table bootstrap.
//!
//! Tables are created if absent on every start. `classes` is created before
//! `users` because users reference their class; the class creator is kept
//! as a plain column to avoid a circular foreign key.

use sqlx::PgPool;
use tracing::info;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS classes (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_by_id BIGINT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT classes_name_key UNIQUE (name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        nickname TEXT NOT NULL DEFAULT '',
        phone TEXT NOT NULL,
        email TEXT NOT NULL,
        password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'student' CHECK (role IN ('student', 'teacher')),
        is_admin BOOLEAN NOT NULL DEFAULT FALSE,
        class_id BIGINT REFERENCES classes(id) ON DELETE SET NULL,
        created_by_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT users_name_key UNIQUE (name),
        CONSTRAINT users_phone_key UNIQUE (phone),
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_users_class_id ON users(class_id)",
    r#"
    CREATE TABLE IF NOT EXISTS subjects (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_by_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT subjects_name_key UNIQUE (name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS learning_materials (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        content_hash TEXT NOT NULL,
        file_path TEXT NOT NULL,
        file_name TEXT NOT NULL DEFAULT '',
        content_type TEXT NOT NULL DEFAULT 'application/octet-stream',
        size_bytes BIGINT NOT NULL DEFAULT 0,
        subject_id BIGINT NOT NULL REFERENCES subjects(id) ON DELETE RESTRICT,
        created_by_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
        updated_by_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT learning_materials_name_key UNIQUE (name)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_learning_materials_subject_id ON learning_materials(subject_id)",
];

/// Creates the four tables and their indexes if they do not exist.
pub async fn ensure_schema(db: &PgPool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(db).await?;
    }

    info!(tables = 4, "database schema ensured");
    Ok(())
}
