// src/api/mod.rs
//! Catalog API interaction: the ability to read products, categories and
//! brands from the external catalog.
//!
//! I/O (`client`), wire shapes (`responses`), parsing (`parser`) and
//! reliability (`rate_limiter`, `reliable`) are kept apart; the engine only
//! sees the [`CatalogSource`] trait.

pub mod client;
pub mod parser;
pub mod rate_limiter;
pub mod reliable;
pub mod responses;
mod types;

use crate::error::AppError;
use crate::model::{Brand, Category, Product};
use crate::types::{BrandId, CategoryId};

/// The ability to read the catalog.
///
/// This is the fundamental algebra for catalog access. The engine depends on
/// this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// `GET /products`, optionally bounded to the most recent records.
    async fn list_products(&self, query: &ListingQuery) -> Result<Vec<Product>, AppError>;
    /// `GET /products/category/{id}`: direct members of one category.
    async fn products_in_category(&self, id: &CategoryId) -> Result<Vec<Product>, AppError>;
    /// `GET /products/brand/{id}`
    async fn products_of_brand(&self, id: &BrandId) -> Result<Vec<Product>, AppError>;
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn list_brands(&self) -> Result<Vec<Brand>, AppError>;
}

/// Shared sources are sources too.
#[async_trait::async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<S> {
    async fn list_products(&self, query: &ListingQuery) -> Result<Vec<Product>, AppError> {
        (**self).list_products(query).await
    }
    async fn products_in_category(&self, id: &CategoryId) -> Result<Vec<Product>, AppError> {
        (**self).products_in_category(id).await
    }
    async fn products_of_brand(&self, id: &BrandId) -> Result<Vec<Product>, AppError> {
        (**self).products_of_brand(id).await
    }
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        (**self).list_categories().await
    }
    async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        (**self).list_brands().await
    }
}

// Re-export the public interface
pub use client::CatalogHttpClient;
pub use rate_limiter::{RateLimitPolicy, SlidingWindowLimiter};
pub use reliable::ReliableCatalogSource;
pub use types::{CatalogOperation, ListingQuery};
