//! Category routes.

use axum::extract::State;
use serde_json::json;

use storefront_core::build_tree;

use crate::response::ApiResponse;
use crate::state::AppState;

/// Lists all categories, both flat and as a parent/child tree built from
/// the flat rows.
pub async fn list_categories(State(state): State<AppState>) -> ApiResponse {
    match state.storage.list_categories().await {
        Ok(categories) => {
            let count = categories.len();
            let tree = build_tree(&categories);
            ApiResponse::success_with(
                &json!({
                    "list": categories,
                    "tree": tree,
                    "count": count,
                }),
                "list retrieved",
                200,
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to list categories");
            ApiResponse::error("failed to list categories")
        }
    }
}
