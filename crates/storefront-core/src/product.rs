//! Product entity.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::category::CategorySummary;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique identifier.
    pub id: Uuid,

    /// Product name.
    pub name: String,

    /// Unit price; never negative.
    pub price: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Units in stock; never negative.
    pub stock: i32,

    /// The category this product belongs to.
    pub category_id: Uuid,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Product {
    /// Creates a product from validated input, generating a fresh id and
    /// timestamps.
    #[must_use]
    pub fn from_new(new: NewProduct) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            price: new.price,
            description: new.description,
            stock: new.stock,
            category_id: new.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub stock: i32,
    pub category_id: Uuid,
}

/// Product projection for list reads, with the category joined in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductWithCategory {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stock: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Joined category summary; `None` only if the row was removed between
    /// the product read and the join.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
}

impl ProductWithCategory {
    /// Builds the list projection from a product and its joined category.
    #[must_use]
    pub fn new(product: Product, category: Option<CategorySummary>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            description: product.description,
            stock: product.stock,
            created_at: product.created_at,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_new() {
        let new = NewProduct {
            name: "Widget".to_string(),
            price: 9.99,
            description: None,
            stock: 3,
            category_id: Uuid::new_v4(),
        };
        let product = Product::from_new(new.clone());
        assert_eq!(product.name, "Widget");
        assert_eq!(product.category_id, new.category_id);
        assert!(!product.id.is_nil());
    }

    #[test]
    fn test_list_projection_roundtrip() {
        let product = Product::from_new(NewProduct {
            name: "Widget".to_string(),
            price: 1.5,
            description: Some("round".to_string()),
            stock: 0,
            category_id: Uuid::new_v4(),
        });
        let summary = CategorySummary {
            id: product.category_id,
            name: "Tools".to_string(),
            description: None,
        };
        let listed = ProductWithCategory::new(product, Some(summary));

        let json = serde_json::to_string(&listed).unwrap();
        let back: ProductWithCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, listed);
        assert_eq!(back.category.unwrap().name, "Tools");
    }
}
