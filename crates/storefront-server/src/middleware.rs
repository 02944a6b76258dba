use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Request, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use storefront_auth::AuthError;

use crate::response::ApiResponse;
use crate::state::AppState;

// =============================================================================
// Authentication Middleware
// =============================================================================

/// Authentication middleware that validates Bearer tokens and injects the
/// verified claims.
///
/// This middleware:
/// 1. Checks if the path is on the public allow-list (no token needed)
/// 2. Extracts and verifies the Bearer access token
/// 3. Stores the `Claims` in request extensions for downstream handlers
///
/// Any failure on a non-public path produces a 401 envelope before the
/// request reaches business logic. Refresh tokens are rejected here; only
/// `/refresh-token` (a public path) accepts them, in its handler.
pub async fn authentication_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let auth_header = match req.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        Some(header) => header,
        None => {
            tracing::debug!(path = %req.uri().path(), "No Authorization header");
            return unauthorized_response("authentication required");
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) if !t.is_empty() => t,
        _ => {
            return unauthorized_response("invalid Authorization header format");
        }
    };

    match state.tokens.verify_access(token) {
        Ok(claims) => {
            tracing::debug!(user_id = %claims.sub, "Token verified");
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            match e {
                AuthError::TokenExpired => unauthorized_response("token expired"),
                _ => unauthorized_response("invalid token"),
            }
        }
    }
}

/// Check if a request path is on the public allow-list.
///
/// Everything else requires a valid access token.
fn is_public_path(path: &str) -> bool {
    let public_paths = [
        "/",
        "/healthz",
        "/readyz",
        "/user",
        "/login",
        "/refresh-token",
        "/product/create",
        "/products",
        "/categories",
        "/favicon.ico",
    ];

    if public_paths.contains(&path) {
        return true;
    }

    let public_prefixes = ["/redis/"];

    public_prefixes.iter().any(|prefix| path.starts_with(prefix))
}

fn unauthorized_response(message: &str) -> Response {
    ApiResponse::unauthorized(message).into_response()
}

// =============================================================================
// Other Middleware
// =============================================================================

// Middleware that ensures each request has an X-Request-Id and mirrors it on the response
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already has a request-id, preserve it; otherwise generate one
    let req_id_value = req
        .headers()
        .get(&header_name)
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        });

    // Add to request extensions for downstream usage (e.g., logging)
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;

    // Add/propagate the request id header to response
    res.headers_mut().insert(header_name, req_id_value);

    res
}
