//! Startup seeding.
//!
//! Creates the configured admin user and seed categories on first startup
//! so a fresh database can serve logins and product creates. Idempotent:
//! records that already exist are skipped.

use std::collections::HashSet;

use tracing::info;

use storefront_auth::hash_password;
use storefront_core::{NewCategory, NewUser};
use storefront_storage::{Storage, StorageError, StorageResult};

use crate::config::BootstrapConfig;

/// What a bootstrap run created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapStats {
    pub users_created: usize,
    pub categories_created: usize,
}

/// Seeds the store from configuration.
///
/// # Errors
///
/// Returns an error if a storage operation or password hashing fails.
pub async fn run(storage: &dyn Storage, config: &BootstrapConfig) -> StorageResult<BootstrapStats> {
    let mut stats = BootstrapStats::default();

    if let Some(admin) = &config.admin_user {
        if storage.find_user_by_email(&admin.email).await?.is_none() {
            let password_hash = hash_password(&admin.password)
                .map_err(|e| StorageError::internal(format!("password hashing failed: {e}")))?;
            storage
                .create_user(NewUser {
                    name: Some(admin.name.clone().unwrap_or_else(|| "admin".to_string())),
                    email: admin.email.clone(),
                    password_hash,
                    age: admin.age,
                    phone: None,
                    avatar: None,
                })
                .await?;
            info!(email = %admin.email, "bootstrap admin user created");
            stats.users_created += 1;
        } else {
            info!(email = %admin.email, "bootstrap admin user already exists, skipping");
        }
    }

    if !config.seed_categories.is_empty() {
        let existing: HashSet<String> = storage
            .list_categories()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();

        for seed in &config.seed_categories {
            if existing.contains(&seed.name) {
                continue;
            }
            storage
                .create_category(NewCategory {
                    name: seed.name.clone(),
                    description: seed.description.clone(),
                    parent_id: None,
                })
                .await?;
            stats.categories_created += 1;
        }
        info!(
            created = stats.categories_created,
            "bootstrap categories seeded"
        );
    }

    Ok(stats)
}
