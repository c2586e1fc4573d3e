//! Request DTOs for the product API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use super::product::{NewProduct, Price, ProductUpdate};

/// Maximum product name length in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Request body for POST /api/products
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateProductRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name)
            .or_else(|| validate_price(self.price))
            .or_else(|| self.description.as_deref().and_then(validate_description))
    }

    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name.trim().to_string(),
            price: self.price,
            description: self.description,
        }
    }
}

/// Request body for PUT /api/products/:id
///
/// Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateProductRequest {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(validate_name)
            .or_else(|| self.price.and_then(validate_price))
            .or_else(|| self.description.as_deref().and_then(validate_description))
    }

    pub fn into_update(self) -> ProductUpdate {
        ProductUpdate {
            name: self.name.map(|name| name.trim().to_string()),
            price: self.price,
            description: self.description,
        }
    }
}

fn validate_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("Product name cannot be empty".to_string());
    }
    if name.trim().chars().count() > MAX_NAME_LENGTH {
        return Some(format!(
            "Product name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        ));
    }
    None
}

fn validate_price(price: Price) -> Option<String> {
    if !price.is_positive() {
        return Some("Price must be greater than 0".to_string());
    }
    None
}

fn validate_description(description: &str) -> Option<String> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Some(format!(
            "Description exceeds maximum length of {} characters",
            MAX_DESCRIPTION_LENGTH
        ));
    }
    None
}
