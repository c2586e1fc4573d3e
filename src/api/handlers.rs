//! API Handlers
//!
//! HTTP request handlers for the product endpoints, cache statistics and
//! health.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::state::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    CreateProductRequest, HealthResponse, Product, StatsResponse, UpdateProductRequest,
};

/// Parses a product id from the path. Malformed ids are a 400, not a 404.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidRequest(format!("Invalid product id: {raw}")))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Product with ID {id} not found"))
}

/// Handler for GET /api/products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.products.list().await?))
}

/// Handler for GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let product = state.products.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// Handler for POST /api/products
///
/// Responds 201 with a Location header pointing at the new product.
pub async fn create_product(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let product = state.products.create(req.into_new_product()).await?;
    let location = format!("/api/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

/// Handler for PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let product = state
        .products
        .update(id, req.into_update())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// Handler for DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    if state.products.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlPolicy;
    use crate::models::Price;
    use crate::store::Database;

    async fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(
            Database::new(dir.path().join("products.db")),
            TtlPolicy::default(),
        );
        state.migrations.migrate_up().await.unwrap();
        (dir, state)
    }

    fn create_body(
        name: &str,
        cents: i64,
    ) -> std::result::Result<Json<CreateProductRequest>, JsonRejection> {
        Ok(Json(CreateProductRequest {
            name: name.to_string(),
            price: Price::from_cents(cents),
            description: None,
        }))
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("0b6c3c43-5c55-4f7e-9d7e-2d1f1b4f8a10").is_ok());
        assert!(matches!(parse_id("abc"), Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_create_and_get_handler() {
        let (_dir, state) = test_state().await;

        let response = create_product(State(state.clone()), create_body("Widget", 999))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        let id = location.trim_start_matches("/api/products/").to_string();

        let product = get_product(State(state), Path(id)).await.unwrap();
        assert_eq!(product.name, "Widget");
    }

    #[tokio::test]
    async fn test_create_invalid_request() {
        let (_dir, state) = test_state().await;

        let result = create_product(State(state.clone()), create_body("  ", 999)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        let result = create_product(State(state.clone()), create_body("Widget", 0)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        assert!(list_products(State(state)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_product() {
        let (_dir, state) = test_state().await;

        let result = get_product(State(state), Path(Uuid::new_v4().to_string())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_product() {
        let (_dir, state) = test_state().await;

        let result = delete_product(State(state), Path(Uuid::new_v4().to_string())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (_dir, state) = test_state().await;

        let response = cache_stats(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
