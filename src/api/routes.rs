//! API Routes
//!
//! Configures the Axum router with all product service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::admin;
use super::handlers::{
    cache_stats, create_product, delete_product, get_product, health_handler, list_products,
    update_product,
};
use super::state::AppState;

/// Creates the main router with all endpoints configured.
///
/// Static segments such as `/api/products/clear-cache` take precedence over
/// the `:id` capture.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/clear-cache", post(admin::clear_cache))
        .route(
            "/api/products/debug/table-structure",
            get(admin::table_structure),
        )
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/migrations/migrate-up", post(admin::migrate_up))
        .route("/api/migrations/migrate-down", post(admin::migrate_down))
        .route("/api/migrations/migrate-to/:version", post(admin::migrate_to))
        .route("/api/migrations/rollback/:version", post(admin::rollback))
        .route(
            "/api/migrations/force-remove-description",
            post(admin::force_remove_description),
        )
        .route("/api/migrations/status", get(admin::migration_status))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
