//! sqlx implementation of the storage trait.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use storefront_core::{
    Category, CategorySummary, NewCategory, NewProduct, NewUser, Product, ProductWithCategory,
    User,
};
use storefront_storage::{Storage, StorageResult};

use crate::error::map_sqlx_error;

type UserRow = (
    Uuid,
    Option<String>,
    String,
    Option<String>,
    i32,
    Option<String>,
    Option<String>,
    OffsetDateTime,
    OffsetDateTime,
);

type CategoryRow = (
    Uuid,
    String,
    Option<String>,
    Option<Uuid>,
    OffsetDateTime,
    OffsetDateTime,
);

type ProductJoinRow = (
    Uuid,
    String,
    f64,
    Option<String>,
    i32,
    OffsetDateTime,
    Option<Uuid>,
    Option<String>,
    Option<String>,
);

fn user_from_row(row: UserRow) -> User {
    User {
        id: row.0,
        name: row.1,
        email: row.2,
        password_hash: row.3,
        age: row.4,
        phone: row.5,
        avatar: row.6,
        created_at: row.7,
        updated_at: row.8,
    }
}

fn category_from_row(row: CategoryRow) -> Category {
    Category {
        id: row.0,
        name: row.1,
        description: row.2,
        parent_id: row.3,
        created_at: row.4,
        updated_at: row.5,
    }
}

/// PostgreSQL-backed `Storage` implementation.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Creates a new storage over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> StorageResult<()> {
        query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn create_user(&self, new: NewUser) -> StorageResult<User> {
        let user = User::from_new(new);
        query(
            r#"
            INSERT INTO users (id, name, email, password_hash, age, phone, avatar, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.age)
        .bind(&user.phone)
        .bind(&user.avatar)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let row: Option<UserRow> = query_as(
            r#"
            SELECT id, name, email, password_hash, age, phone, avatar, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(user_from_row))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        let row: Option<UserRow> = query_as(
            r#"
            SELECT id, name, email, password_hash, age, phone, avatar, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(user_from_row))
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        // Password hashes stay in the database; NULL keeps the row shape.
        let rows: Vec<UserRow> = query_as(
            r#"
            SELECT id, name, email, NULL::varchar, age, phone, avatar, created_at, updated_at
            FROM users
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(user_from_row).collect())
    }

    async fn create_product(&self, new: NewProduct) -> StorageResult<Product> {
        let product = Product::from_new(new);
        query(
            r#"
            INSERT INTO products (id, name, price, description, stock, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .bind(product.stock)
        .bind(product.category_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(product)
    }

    async fn list_products_with_category(&self) -> StorageResult<Vec<ProductWithCategory>> {
        let rows: Vec<ProductJoinRow> = query_as(
            r#"
            SELECT p.id, p.name, p.price, p.description, p.stock, p.created_at,
                   c.id, c.name, c.description
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            ORDER BY p.created_at DESC, p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let category = match (row.6, row.7) {
                    (Some(id), Some(name)) => Some(CategorySummary {
                        id,
                        name,
                        description: row.8,
                    }),
                    _ => None,
                };
                ProductWithCategory {
                    id: row.0,
                    name: row.1,
                    price: row.2,
                    description: row.3,
                    stock: row.4,
                    created_at: row.5,
                    category,
                }
            })
            .collect())
    }

    async fn category_exists(&self, id: Uuid) -> StorageResult<bool> {
        let row: Option<(Uuid,)> = query_as("SELECT id FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.is_some())
    }

    async fn list_categories(&self) -> StorageResult<Vec<Category>> {
        let rows: Vec<CategoryRow> = query_as(
            r#"
            SELECT id, name, description, parent_id, created_at, updated_at
            FROM categories
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(category_from_row).collect())
    }

    async fn create_category(&self, new: NewCategory) -> StorageResult<Category> {
        let category = Category::from_new(new);
        query(
            r#"
            INSERT INTO categories (id, name, description, parent_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(category)
    }
}
