//! User routes: create, list (cache-aside), login, token refresh, profile.

use axum::Extension;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Query, State};
use serde::Deserialize;
use serde_json::json;

use storefront_auth::{AuthError, Claims, hash_password, verify_password};
use storefront_core::NewUser;

use crate::cache::{USERS_LIST_KEY, list_read_through};
use crate::handlers::{ListParams, list_response};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::{FieldError, check_email, check_min_i64, check_min_length, check_non_empty};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub age: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

fn bad_body(rejection: &JsonRejection) -> ApiResponse {
    ApiResponse::error_with(format!("invalid request body: {rejection}"), 400)
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResponse {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(e) => return bad_body(&e),
    };

    let mut errors = Vec::new();
    check_email("email", &req.email, &mut errors);
    check_min_length("password", &req.password, 6, &mut errors);
    check_min_i64("age", req.age, 18, &mut errors);
    if !errors.is_empty() {
        return ApiResponse::validation_error(&errors);
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return ApiResponse::error("failed to create user");
        }
    };

    let new = NewUser {
        name: Some(req.name.unwrap_or_else(|| "unknown".to_string())),
        email: req.email,
        password_hash,
        age: req.age as i32,
        phone: req.phone,
        avatar: req.avatar,
    };

    match state.storage.create_user(new).await {
        Ok(user) => {
            // Invalidate so the next list read repopulates from the store.
            state.cache.delete(USERS_LIST_KEY).await;
            tracing::info!(user_id = %user.id, "user created");
            ApiResponse::success_with(&user, "user created", 200)
        }
        Err(e) if e.is_conflict() => {
            ApiResponse::validation_error(&[FieldError::new("email", "email already registered")])
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create user");
            ApiResponse::error("failed to create user")
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResponse {
    let storage = state.storage.clone();
    let result = list_read_through(
        &state.cache,
        USERS_LIST_KEY,
        state.cache_settings.list_ttl_secs,
        || async move { storage.list_users().await },
    )
    .await;

    match result {
        Ok((users, source)) => list_response(users, source, params),
        Err(e) => {
            tracing::error!(error = %e, "failed to list users");
            ApiResponse::error("failed to list users")
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResponse {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(e) => return bad_body(&e),
    };

    let mut errors = Vec::new();
    check_email("email", &req.email, &mut errors);
    check_non_empty("password", &req.password, &mut errors);
    if !errors.is_empty() {
        return ApiResponse::validation_error(&errors);
    }

    let user = match state.storage.find_user_by_email(&req.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(email = %req.email, "login failed: unknown email");
            return ApiResponse::unauthorized("invalid email or password");
        }
        Err(e) => {
            tracing::error!(error = %e, "login lookup failed");
            return ApiResponse::error("login failed");
        }
    };

    let verified = match user.password_hash.as_deref() {
        Some(hash) => match verify_password(&req.password, hash) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "stored password hash is malformed");
                return ApiResponse::error("login failed");
            }
        },
        None => false,
    };
    if !verified {
        tracing::warn!(email = %req.email, "login failed: wrong password");
        return ApiResponse::unauthorized("invalid email or password");
    }

    let token = match state.tokens.issue_access(user.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to issue access token");
            return ApiResponse::error("login failed");
        }
    };
    let refresh_token = match state.tokens.issue_refresh(user.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to issue refresh token");
            return ApiResponse::error("login failed");
        }
    };

    tracing::info!(user_id = %user.id, "user logged in");
    ApiResponse::success_with(
        &json!({
            "user": user,
            "token": token,
            "refresh_token": refresh_token,
        }),
        "login succeeded",
        200,
    )
}

pub async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResponse {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(e) => return bad_body(&e),
    };

    if req.refresh_token.is_empty() {
        return ApiResponse::validation_error(&[FieldError::new(
            "refresh_token",
            "must not be empty",
        )]);
    }

    let claims = match state.tokens.verify_refresh(&req.refresh_token) {
        Ok(claims) => claims,
        Err(AuthError::TokenExpired) => {
            return ApiResponse::unauthorized("refresh token expired");
        }
        Err(e) => {
            tracing::debug!(error = %e, "refresh token rejected");
            return ApiResponse::unauthorized("invalid refresh token");
        }
    };

    match state.tokens.issue_access(claims.sub, &claims.email) {
        Ok(token) => {
            tracing::info!(user_id = %claims.sub, "access token refreshed");
            ApiResponse::success_with(&json!({ "token": token }), "token refreshed", 200)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to issue access token");
            ApiResponse::error("token refresh failed")
        }
    }
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResponse {
    match state.storage.find_user_by_id(claims.sub).await {
        Ok(Some(user)) => ApiResponse::success_with(&user, "profile retrieved", 200),
        Ok(None) => {
            tracing::warn!(user_id = %claims.sub, "profile lookup: user no longer exists");
            ApiResponse::not_found("user not found")
        }
        Err(e) => {
            tracing::error!(error = %e, "profile lookup failed");
            ApiResponse::error("failed to fetch profile")
        }
    }
}
