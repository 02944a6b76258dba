//! In-memory storage backend.
//!
//! Backs integration tests and database-less local runs. Uses `DashMap` so
//! concurrent request tasks can touch the store without a global lock.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use storefront_core::{
    Category, NewCategory, NewProduct, NewUser, Product, ProductWithCategory, User,
};

use crate::error::{StorageError, StorageResult};
use crate::traits::Storage;

/// In-memory `Storage` implementation.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    users: DashMap<Uuid, User>,
    products: DashMap<Uuid, Product>,
    categories: DashMap<Uuid, Category>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn create_user(&self, new: NewUser) -> StorageResult<User> {
        if self.users.iter().any(|u| u.email == new.email) {
            return Err(StorageError::conflict("email already registered"));
        }
        let user = User::from_new(new);
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .map(|u| u.value().clone().redacted())
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn create_product(&self, new: NewProduct) -> StorageResult<Product> {
        if !self.categories.contains_key(&new.category_id) {
            return Err(StorageError::not_found("category does not exist"));
        }
        let product = Product::from_new(new);
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_products_with_category(&self) -> StorageResult<Vec<ProductWithCategory>> {
        let mut products: Vec<ProductWithCategory> = self
            .products
            .iter()
            .map(|p| {
                let category = self.categories.get(&p.category_id).map(|c| c.summary());
                ProductWithCategory::new(p.value().clone(), category)
            })
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn category_exists(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.categories.contains_key(&id))
    }

    async fn list_categories(&self) -> StorageResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.categories.iter().map(|c| c.value().clone()).collect();
        categories.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn create_category(&self, new: NewCategory) -> StorageResult<Category> {
        if self.categories.iter().any(|c| c.name == new.name) {
            return Err(StorageError::conflict("category name already taken"));
        }
        let category = Category::from_new(new);
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: None,
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            age: 30,
            phone: None,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let store = MemoryStorage::new();
        store.create_user(new_user("a@b.com")).await.unwrap();

        let err = store.create_user(new_user("a@b.com")).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_list_users_omits_password_hash() {
        let store = MemoryStorage::new();
        store.create_user(new_user("a@b.com")).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].password_hash.is_none());

        // Login lookup still sees the hash.
        let by_email = store.find_user_by_email("a@b.com").await.unwrap().unwrap();
        assert!(by_email.password_hash.is_some());
    }

    #[tokio::test]
    async fn test_create_product_requires_existing_category() {
        let store = MemoryStorage::new();
        let err = store
            .create_product(NewProduct {
                name: "Widget".to_string(),
                price: 1.0,
                description: None,
                stock: 1,
                category_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_product_list_joins_category() {
        let store = MemoryStorage::new();
        let category = store
            .create_category(NewCategory {
                name: "Tools".to_string(),
                description: Some("hardware".to_string()),
                parent_id: None,
            })
            .await
            .unwrap();
        store
            .create_product(NewProduct {
                name: "Widget".to_string(),
                price: 2.5,
                description: None,
                stock: 4,
                category_id: category.id,
            })
            .await
            .unwrap();

        let listed = store.list_products_with_category().await.unwrap();
        assert_eq!(listed.len(), 1);
        let joined = listed[0].category.as_ref().unwrap();
        assert_eq!(joined.id, category.id);
        assert_eq!(joined.name, "Tools");
    }
}
