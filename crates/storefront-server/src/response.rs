//! The uniform JSON response envelope.
//!
//! Every response body is `{code, msg, data}`. The `code` field is echoed to
//! the client verbatim; the transport status is the same value clamped to
//! the valid HTTP range, falling back to the constructor's default (200 for
//! success shapes, 500 for error shapes) when out of range.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

use crate::validation::FieldError;

/// Default success message.
pub const MSG_OK: &str = "operation succeeded";

/// Default error message.
pub const MSG_FAILED: &str = "operation failed";

/// The envelope applied to every API response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub code: i64,
    pub msg: String,
    pub data: Value,
    #[serde(skip)]
    fallback_status: StatusCode,
}

/// Pagination block nested under `data` for paginated list responses.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Computes the pagination block for a page of a `total`-element list.
    #[must_use]
    pub fn new(total: u64, page: u64, page_size: u64) -> Self {
        let total_pages = total.div_ceil(page_size.max(1));
        Self {
            total,
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

fn to_value<T: Serialize>(data: &T) -> Value {
    match serde_json::to_value(data) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response data");
            Value::Null
        }
    }
}

impl ApiResponse {
    /// Success envelope with the default message and code 200.
    #[must_use]
    pub fn success<T: Serialize>(data: &T) -> Self {
        Self::success_with(data, MSG_OK, 200)
    }

    /// Success envelope with an explicit message and code.
    #[must_use]
    pub fn success_with<T: Serialize>(data: &T, msg: impl Into<String>, code: i64) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: to_value(data),
            fallback_status: StatusCode::OK,
        }
    }

    /// Error envelope with the default code 500.
    #[must_use]
    pub fn error(msg: impl Into<String>) -> Self {
        Self::error_with(msg, 500)
    }

    /// Error envelope with an explicit code.
    #[must_use]
    pub fn error_with(msg: impl Into<String>, code: i64) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: Value::Null,
            fallback_status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 400 envelope carrying the field-level validation detail array.
    #[must_use]
    pub fn validation_error(errors: &[FieldError]) -> Self {
        Self {
            code: 400,
            msg: "validation failed".to_string(),
            data: json!({ "errors": errors }),
            fallback_status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 401 envelope.
    #[must_use]
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::error_with(msg, 401)
    }

    /// 403 envelope.
    #[must_use]
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::error_with(msg, 403)
    }

    /// 404 envelope.
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::error_with(msg, 404)
    }

    /// 429 envelope.
    #[must_use]
    pub fn too_many_requests(msg: impl Into<String>) -> Self {
        Self::error_with(msg, 429)
    }

    /// 200 envelope with the paginated list shape nested under `data`.
    #[must_use]
    pub fn paginate<T: Serialize>(items: &[T], total: u64, page: u64, page_size: u64) -> Self {
        let pagination = Pagination::new(total, page, page_size);
        Self {
            code: 200,
            msg: "list retrieved".to_string(),
            data: json!({
                "items": to_value(&items),
                "pagination": pagination,
            }),
            fallback_status: StatusCode::OK,
        }
    }

    /// The transport status: `code` when it is a valid HTTP status, the
    /// constructor's default otherwise.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if (100..600).contains(&self.code) {
            StatusCode::from_u16(self.code as u16).unwrap_or(self.fallback_status)
        } else {
            self.fallback_status
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_defaults() {
        let resp = ApiResponse::success(&json!({"id": 1}));
        assert_eq!(resp.code, 200);
        assert_eq!(resp.msg, MSG_OK);
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_out_of_range_code_clamps_to_default() {
        let resp = ApiResponse::success_with(&Value::Null, "weird", 9000);
        assert_eq!(resp.code, 9000); // body keeps the raw code
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = ApiResponse::error_with("weird", 42);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_codes_map_to_status() {
        assert_eq!(
            ApiResponse::unauthorized("no token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiResponse::not_found("missing").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiResponse::too_many_requests("slow down").status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiResponse::forbidden("nope").status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(25, 2, 10);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(25, 3, 10);
        assert!(!p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(0, 1, 10);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_paginate_shape_is_camel_case() {
        let resp = ApiResponse::paginate(&["a", "b"], 4, 1, 2);
        let pagination = &resp.data["pagination"];
        assert_eq!(pagination["pageSize"], 2);
        assert_eq!(pagination["totalPages"], 2);
        assert_eq!(pagination["hasNext"], true);
        assert_eq!(pagination["hasPrev"], false);
        assert_eq!(resp.data["items"][0], "a");
    }

    #[test]
    fn test_validation_error_carries_detail_array() {
        let errors = vec![FieldError::new("email", "invalid email format")];
        let resp = ApiResponse::validation_error(&errors);
        assert_eq!(resp.code, 400);
        assert_eq!(resp.data["errors"][0]["field"], "email");
    }
}
