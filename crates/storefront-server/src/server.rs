use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use storefront_auth::TokenService;
use storefront_db_postgres::{PgPool, PgStorage, create_pool, run_migrations};
use storefront_storage::Storage;

use crate::cache::CacheClient;
use crate::config::AppConfig;
use crate::rate_limit::{FixedWindowLimiter, rate_limit_middleware};
use crate::state::AppState;
use crate::{bootstrap, handlers, middleware as app_middleware};

pub struct StorefrontServer {
    addr: SocketAddr,
    app: Router,
    cache: CacheClient,
    db_pool: Option<PgPool>,
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let limiter = Arc::new(FixedWindowLimiter::new(&cfg.rate_limit));

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::home::root))
        .route("/healthz", get(handlers::home::healthz))
        .route("/readyz", get(handlers::home::readyz))
        // Users and auth
        .route("/user", post(handlers::users::create_user))
        .route("/users", get(handlers::users::list_users))
        .route("/login", post(handlers::users::login))
        .route("/refresh-token", post(handlers::users::refresh_token))
        .route("/profile", get(handlers::users::profile))
        // Products and categories
        .route("/product/create", post(handlers::products::create_product))
        .route("/products", get(handlers::products::list_products))
        .route("/categories", get(handlers::categories::list_categories))
        // Raw cache debug endpoints
        .route("/redis/set", get(handlers::redis_debug::set_value))
        .route("/redis/get", get(handlers::redis_debug::get_value))
        // Unrouted paths still get the envelope
        .fallback(handlers::not_found)
        // Middleware stack. Layers added later run earlier, so the request
        // passes trace -> cors -> request id -> rate limit -> auth -> handler.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::authentication_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri()
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .with_state(state)
}

pub struct ServerBuilder {
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Connects the pool and the cache, runs migrations and bootstrap, and
    /// assembles the router.
    pub async fn build(self) -> anyhow::Result<StorefrontServer> {
        let cfg = self.config;

        let pool = create_pool(&cfg.storage.postgres).await?;
        if cfg.storage.postgres.run_migrations {
            run_migrations(&pool).await?;
        }
        let storage: Arc<dyn Storage> = Arc::new(PgStorage::new(pool.clone()));

        let cache = crate::create_cache_client(&cfg.redis).await;

        let tokens = Arc::new(TokenService::new(
            &cfg.auth.secret,
            cfg.auth.access_ttl_secs,
            cfg.auth.refresh_ttl_secs,
        ));

        match bootstrap::run(storage.as_ref(), &cfg.bootstrap).await {
            Ok(stats) => {
                if stats.users_created > 0 || stats.categories_created > 0 {
                    tracing::info!(
                        users = stats.users_created,
                        categories = stats.categories_created,
                        "bootstrap complete"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "bootstrap failed, continuing without seed data");
            }
        }

        let state = AppState::new(storage, cache.clone(), tokens, cfg.cache);
        let app = build_app(state, &cfg);

        Ok(StorefrontServer {
            addr: cfg.addr(),
            app,
            cache,
            db_pool: Some(pool),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StorefrontServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(
            listener,
            self.app
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        // Teardown order: cache before store, so no invalidation path can
        // outlive its target.
        self.cache.close();
        if let Some(pool) = self.db_pool {
            pool.close().await;
        }
        tracing::info!("shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
