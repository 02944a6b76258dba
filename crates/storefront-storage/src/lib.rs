//! Storage abstraction for the storefront server.
//!
//! The [`Storage`] trait defines the persistence interface the HTTP layer
//! depends on. Backends implement it: PostgreSQL in production
//! (`storefront-db-postgres`) and [`MemoryStorage`] for tests and local
//! development without a database.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use traits::Storage;
