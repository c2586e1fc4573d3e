//! Product Cache - a product catalogue service with cache-aside reads
//!
//! Products live in SQLite; reads go through a process-wide TTL cache and
//! every mutation invalidates the keys it affects before responding.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod migrations;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use service::ProductService;
pub use tasks::spawn_cleanup_task;
