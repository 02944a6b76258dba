//! Product routes: create and list (cache-aside with category join).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use storefront_core::NewProduct;
use storefront_storage::StorageError;

use crate::cache::{PRODUCTS_LIST_KEY, list_read_through, product_key};
use crate::handlers::{ListParams, list_response};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::{FieldError, check_min_i64, check_non_empty, check_non_negative_f64};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub category_id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResponse {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(e) => return ApiResponse::error_with(format!("invalid request body: {e}"), 400),
    };

    let mut errors = Vec::new();
    check_non_empty("name", &req.name, &mut errors);
    check_non_negative_f64("price", req.price, &mut errors);
    check_min_i64("stock", req.stock, 0, &mut errors);
    if !errors.is_empty() {
        return ApiResponse::validation_error(&errors);
    }

    let category_missing =
        || ApiResponse::validation_error(&[FieldError::new("category_id", "category does not exist")]);

    match state.storage.category_exists(req.category_id).await {
        Ok(true) => {}
        Ok(false) => return category_missing(),
        Err(e) => {
            tracing::error!(error = %e, "category lookup failed");
            return ApiResponse::error("failed to create product");
        }
    }

    let new = NewProduct {
        name: req.name,
        price: req.price,
        description: req.description,
        stock: req.stock as i32,
        category_id: req.category_id,
    };

    match state.storage.create_product(new).await {
        Ok(product) => {
            // Invalidate the stale list, then pre-warm the single-product key.
            state.cache.delete(PRODUCTS_LIST_KEY).await;
            state
                .cache
                .set_json(
                    &product_key(product.id),
                    &product,
                    Some(state.cache_settings.product_ttl_secs),
                )
                .await;
            tracing::info!(product_id = %product.id, "product created");
            ApiResponse::success_with(&product, "product created", 200)
        }
        // The existence check above can race with a category delete; the
        // foreign key reports it as not-found.
        Err(StorageError::NotFound { .. }) => category_missing(),
        Err(e) => {
            tracing::error!(error = %e, "failed to create product");
            ApiResponse::error("failed to create product")
        }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResponse {
    let storage = state.storage.clone();
    let result = list_read_through(
        &state.cache,
        PRODUCTS_LIST_KEY,
        state.cache_settings.list_ttl_secs,
        || async move { storage.list_products_with_category().await },
    )
    .await;

    match result {
        Ok((products, source)) => list_response(products, source, params),
        Err(e) => {
            tracing::error!(error = %e, "failed to list products");
            ApiResponse::error("failed to list products")
        }
    }
}
