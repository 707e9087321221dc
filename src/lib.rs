// src/lib.rs
//! catalog-query library: filter, sort and paginate a product catalog served
//! by an external API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `HttpFailure`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `EngineConfig`
//! - **Domain model**: `Product`, `Category`, `Brand`, `FilterCriteria`, `FilterResult`
//! - **Domain types**: `CategoryId`, `BrandId`, `ProductId`, `CatalogUrl`, `ApiToken`
//! - **API client**: `CatalogSource`, `CatalogHttpClient`, `ReliableCatalogSource`
//! - **Engine**: `CatalogQueryEngine`, `CategoryTree`, `FilterPipeline`, `paginate`

pub mod api;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod error_recovery;
pub mod model;
pub mod output;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, HttpFailure};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, EngineConfig, OutputFormat};

// --- Domain Model ---
pub use crate::model::{Brand, Category, CategoryKind, FilterCriteria, FilterResult, Product, SortKey};

// --- Domain Types ---
pub use crate::types::{ApiToken, BrandId, CatalogUrl, CategoryId, Id, ProductId};

// --- API Client ---
pub use crate::api::{
    client::ApiResponse, CatalogHttpClient, CatalogOperation, CatalogSource, ListingQuery,
    RateLimitPolicy, ReliableCatalogSource, SlidingWindowLimiter,
};

// --- Reliability ---
pub use crate::error_recovery::{retry_with_backoff, RetryPolicy};

// --- Engine ---
pub use crate::engine::{
    normalize, paginate, CatalogQueryEngine, CatalogSnapshot, CategoryTree, Execution,
    FilterPipeline, QueryOutcome, QueryPlan, RawCriteria,
};
