//! The storage trait implemented by each backend.

use async_trait::async_trait;
use uuid::Uuid;

use storefront_core::{
    Category, NewCategory, NewProduct, NewUser, Product, ProductWithCategory, User,
};

use crate::error::StorageResult;

/// Persistence operations the HTTP layer depends on.
///
/// The store is the source of truth; the cache layer above it only ever
/// holds read-only copies of what these methods return.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Verifies the backend is reachable (readiness probe).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    async fn ping(&self) -> StorageResult<()>;

    /// Persists a new user.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conflict`](crate::StorageError::Conflict) if
    /// the email is already registered, or another error if the operation
    /// fails.
    async fn create_user(&self, new: NewUser) -> StorageResult<User>;

    /// Finds a user by email, including the password hash for login
    /// verification. Returns `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Finds a user by id. Returns `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_user_by_id(&self, id: Uuid) -> StorageResult<Option<User>>;

    /// Lists all users, newest first, with password hashes omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list_users(&self) -> StorageResult<Vec<User>>;

    /// Persists a new product. The caller has already checked that the
    /// category exists; the backend's foreign key is the backstop.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create_product(&self, new: NewProduct) -> StorageResult<Product>;

    /// Lists all products, newest first, with their category joined in.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list_products_with_category(&self) -> StorageResult<Vec<ProductWithCategory>>;

    /// Returns `true` if a category with the given id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn category_exists(&self, id: Uuid) -> StorageResult<bool>;

    /// Lists all categories, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list_categories(&self) -> StorageResult<Vec<Category>>;

    /// Persists a new category (used by bootstrap seeding).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conflict`](crate::StorageError::Conflict) if
    /// the name is already taken, or another error if the operation fails.
    async fn create_category(&self, new: NewCategory) -> StorageResult<Category>;
}
