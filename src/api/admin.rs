//! Admin Handlers
//!
//! Migration control, cache clearing and schema inspection. Every handler
//! that changes the schema clears the collection cache before it runs.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use super::state::AppState;
use crate::error::Result;
use crate::migrations::{self, ColumnInfo};
use crate::models::{
    ClearCacheResponse, MessageResponse, MigrationResponse, MigrationStatusResponse,
    RollbackResponse, TableStructureResponse,
};

const PRODUCTS_TABLE: &str = "Products";

async fn migration_response(
    state: &AppState,
    message: String,
    versions: Vec<i64>,
) -> Result<Json<MigrationResponse>> {
    Ok(Json(MigrationResponse {
        message,
        versions,
        current_version: state.migrations.current_version().await?,
    }))
}

/// Handler for POST /api/products/clear-cache
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let removed = state.products.clear_cache();
    Json(ClearCacheResponse {
        message: "Cache cleared successfully".to_string(),
        removed,
    })
}

/// Handler for GET /api/products/debug/table-structure
pub async fn table_structure(State(state): State<AppState>) -> Result<Json<TableStructureResponse>> {
    let columns: Vec<ColumnInfo> = state.migrations.table_info(PRODUCTS_TABLE).await?;
    Ok(Json(TableStructureResponse {
        message: format!("{PRODUCTS_TABLE} table has {} columns", columns.len()),
        columns,
    }))
}

/// Handler for POST /api/migrations/migrate-up
pub async fn migrate_up(State(state): State<AppState>) -> Result<Json<MigrationResponse>> {
    state.products.clear_cache();
    let applied = state.migrations.migrate_up().await?;
    info!(?applied, "Migrations applied on request");

    let message = format!("Applied {} migration(s)", applied.len());
    migration_response(&state, message, applied).await
}

/// Handler for POST /api/migrations/migrate-down
///
/// Reverts every applied migration.
pub async fn migrate_down(State(state): State<AppState>) -> Result<Json<MigrationResponse>> {
    state.products.clear_cache();
    let reverted = state.migrations.migrate_down_to(0).await?;
    info!(?reverted, "Migrations reverted on request");

    let message = format!("Reverted {} migration(s)", reverted.len());
    migration_response(&state, message, reverted).await
}

/// Handler for POST /api/migrations/migrate-to/:version
pub async fn migrate_to(
    State(state): State<AppState>,
    Path(version): Path<i64>,
) -> Result<Json<MigrationResponse>> {
    state.products.clear_cache();
    let applied = state.migrations.migrate_up_to(version).await?;

    let message = format!("Migrated up to version {version}");
    migration_response(&state, message, applied).await
}

/// Handler for POST /api/migrations/rollback/:version
///
/// Reverts migrations newer than `version` and reports the remaining columns.
pub async fn rollback(
    State(state): State<AppState>,
    Path(version): Path<i64>,
) -> Result<Json<RollbackResponse>> {
    state.products.clear_cache();
    let reverted = state.migrations.migrate_down_to(version).await?;
    let columns = state.migrations.table_info(PRODUCTS_TABLE).await?;
    info!(version, ?reverted, "Rolled back migrations");

    Ok(Json(RollbackResponse {
        message: format!("Rolled back to version {version}"),
        reverted,
        current_columns: columns.into_iter().map(|c| c.name).collect(),
    }))
}

/// Handler for POST /api/migrations/force-remove-description
pub async fn force_remove_description(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    state.products.clear_cache();
    let removed = state.migrations.force_remove_description().await?;
    // Drops listings filled during the rebuild. Per-product entries are
    // not enumerable and expire through their TTL.
    state.products.clear_cache();

    let message = if removed {
        "Description column removed"
    } else {
        "Description column not present"
    };
    Ok(Json(MessageResponse::new(message)))
}

/// Handler for GET /api/migrations/status
pub async fn migration_status(
    State(state): State<AppState>,
) -> Result<Json<MigrationStatusResponse>> {
    let applied_versions = state.migrations.applied_versions().await?;

    Ok(Json(MigrationStatusResponse {
        current_version: applied_versions.last().copied(),
        applied_versions,
        available_versions: migrations::available_versions(),
    }))
}
