//! Schema management for the PostgreSQL storage backend.
//!
//! The schema is three fixed tables. Creation is idempotent
//! (`CREATE TABLE IF NOT EXISTS`) so startup can always run it.

use sqlx_postgres::PgPool;
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};

const CREATE_CATEGORIES: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id          UUID PRIMARY KEY,
    name        VARCHAR(100) NOT NULL UNIQUE,
    description TEXT,
    parent_id   UUID REFERENCES categories(id),
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    name          VARCHAR(100),
    email         VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    age           INTEGER NOT NULL,
    phone         VARCHAR(20),
    avatar        VARCHAR(255),
    created_at    TIMESTAMPTZ NOT NULL,
    updated_at    TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY,
    name        VARCHAR(255) NOT NULL,
    price       DOUBLE PRECISION NOT NULL,
    description TEXT,
    stock       INTEGER NOT NULL DEFAULT 0,
    category_id UUID NOT NULL REFERENCES categories(id),
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_products_category_id ON products (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_created_at ON products (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_categories_parent_id ON categories (parent_id)",
];

/// Creates the tables and indexes if they do not already exist.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for ddl in [CREATE_CATEGORIES, CREATE_USERS, CREATE_PRODUCTS] {
        sqlx_core::query::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| PostgresError::Migration(e.to_string()))?;
    }
    for &ddl in CREATE_INDEXES {
        sqlx_core::query::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| PostgresError::Migration(e.to_string()))?;
    }

    info!("Database schema is up to date");
    Ok(())
}
