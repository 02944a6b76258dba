//! Liveness and readiness handlers.

use axum::extract::State;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn root() -> ApiResponse {
    let server_time = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    ApiResponse::success_with(
        &json!({
            "service": "storefront",
            "version": env!("CARGO_PKG_VERSION"),
            "server_time": server_time,
        }),
        "welcome to the storefront API",
        200,
    )
}

pub async fn healthz() -> ApiResponse {
    ApiResponse::success(&json!({ "status": "ok" }))
}

/// Readiness: the database must answer; the cache only reports its state
/// because it is an optimization, not a dependency.
pub async fn readyz(State(state): State<AppState>) -> ApiResponse {
    if let Err(e) = state.storage.ping().await {
        tracing::error!(error = %e, "readiness check failed");
        return ApiResponse::error("database unavailable");
    }

    let cache = if !state.cache.is_enabled() {
        "disabled"
    } else if state.cache.is_available().await {
        "ok"
    } else {
        "unavailable"
    };

    ApiResponse::success(&json!({ "database": "ok", "cache": cache }))
}
