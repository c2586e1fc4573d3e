//! API Module
//!
//! HTTP handlers and routing for the product service.
//!
//! # Endpoints
//! - `GET /api/products` - List products
//! - `GET|PUT|DELETE /api/products/:id` - Read, update or delete one product
//! - `POST /api/products` - Create a product
//! - `POST /api/products/clear-cache` - Drop collection-level cache entries
//! - `GET /api/products/debug/table-structure` - Products column listing
//! - `GET /api/cache/stats` - Cache statistics
//! - `/api/migrations/*` - Migration control and status
//! - `GET /health` - Health check endpoint

pub mod admin;
pub mod handlers;
pub mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
