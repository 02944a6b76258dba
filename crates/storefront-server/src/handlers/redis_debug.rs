//! Raw key/value debug endpoints for inspecting the cache.

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::FieldError;

#[derive(Debug, Deserialize)]
pub struct SetParams {
    pub key: Option<String>,
    pub value: Option<String>,
    pub expire: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GetParams {
    pub key: Option<String>,
}

pub async fn set_value(
    State(state): State<AppState>,
    Query(params): Query<SetParams>,
) -> ApiResponse {
    let mut errors = Vec::new();
    if params.key.is_none() {
        errors.push(FieldError::new("key", "required parameter is missing"));
    }
    if params.value.is_none() {
        errors.push(FieldError::new("value", "required parameter is missing"));
    }
    let (Some(key), Some(value)) = (params.key, params.value) else {
        return ApiResponse::validation_error(&errors);
    };

    if !state.cache.set(&key, &value, params.expire).await {
        return ApiResponse::error("failed to set cache value");
    }

    ApiResponse::success_with(
        &json!({
            "key": key,
            "value": value,
            "expire": params.expire,
        }),
        "cache value set",
        200,
    )
}

pub async fn get_value(
    State(state): State<AppState>,
    Query(params): Query<GetParams>,
) -> ApiResponse {
    let Some(key) = params.key else {
        return ApiResponse::validation_error(&[FieldError::new(
            "key",
            "required parameter is missing",
        )]);
    };

    match state.cache.get(&key).await {
        Some(value) => ApiResponse::success_with(
            &json!({ "key": key, "value": value }),
            "cache value retrieved",
            200,
        ),
        None => ApiResponse::success_with(&Value::Null, "key not found", 200),
    }
}
