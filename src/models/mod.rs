//! Domain types and request/response models for the product API
//!
//! This module defines the product entity and the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod product;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use product::{NewProduct, Price, Product, ProductUpdate};
pub use requests::{CreateProductRequest, UpdateProductRequest};
pub use responses::{
    ClearCacheResponse, ErrorResponse, HealthResponse, MessageResponse, MigrationResponse,
    MigrationStatusResponse, RollbackResponse, StatsResponse, TableStructureResponse,
};
