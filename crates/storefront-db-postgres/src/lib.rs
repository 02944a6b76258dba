//! PostgreSQL storage backend for the storefront server.
//!
//! Implements the `storefront-storage` [`Storage`](storefront_storage::Storage)
//! trait on top of a sqlx connection pool. Schema creation is idempotent and
//! runs at startup when `run_migrations` is enabled.

pub mod config;
pub mod error;
pub mod pool;
pub mod schema;
pub mod store;

pub use config::PostgresConfig;
pub use sqlx_postgres::PgPool;
pub use error::{PostgresError, Result};
pub use pool::{create_pool, test_connection};
pub use schema::run_migrations;
pub use store::PgStorage;
