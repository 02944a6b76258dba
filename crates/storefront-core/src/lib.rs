//! Core domain types shared across the storefront crates.
//!
//! This crate holds the entity types owned by the data store (users,
//! products, categories) and the pure helpers built on top of them, such as
//! the category tree builder. It carries no I/O.

pub mod category;
pub mod product;
pub mod user;

pub use category::{Category, CategoryNode, CategorySummary, NewCategory, build_tree};
pub use product::{NewProduct, Product, ProductWithCategory};
pub use user::{NewUser, User};
