// tests/support/mod.rs
//! In-memory catalog shared by the integration tests.
//!
//! Behaves like the real API: the category endpoint returns direct members
//! only, the bounded listing returns the most recent products, and results
//! come back in storage order (deliberately not the engine's order).

#![allow(dead_code)]

use catalog_query::{
    AppError, Brand, BrandId, CatalogOperation, CatalogSource, Category, CategoryId,
    ListingQuery, Product, RateLimitPolicy, ReliableCatalogSource, RetryPolicy,
};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Status(u16),
    Transport,
    /// Never answers; the attempt deadline has to cut it off.
    Hang,
}

#[derive(Default)]
pub struct MemoryCatalog {
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub products: Vec<Product>,
    failures: Mutex<HashMap<CatalogOperation, Failure>>,
    calls: Mutex<HashMap<CatalogOperation, u32>>,
    listing_queries: Mutex<Vec<ListingQuery>>,
    ignores_listing_query: bool,
}

impl MemoryCatalog {
    pub fn new(categories: Vec<Category>, brands: Vec<Brand>, products: Vec<Product>) -> Self {
        Self {
            categories,
            brands,
            products,
            ..Self::default()
        }
    }

    /// Every later call of `operation` fails with `failure`.
    pub fn fail(self, operation: CatalogOperation, failure: Failure) -> Self {
        self.failures.lock().insert(operation, failure);
        self
    }

    /// Serves the full listing whatever the query asks for, like a server
    /// that drops unknown query parameters.
    pub fn ignoring_listing_query(mut self) -> Self {
        self.ignores_listing_query = true;
        self
    }

    pub fn calls(&self, operation: CatalogOperation) -> u32 {
        self.calls.lock().get(&operation).copied().unwrap_or(0)
    }

    pub fn listing_queries(&self) -> Vec<ListingQuery> {
        self.listing_queries.lock().clone()
    }

    async fn enter(&self, operation: CatalogOperation) -> Result<(), AppError> {
        *self.calls.lock().entry(operation).or_insert(0) += 1;
        let failure = self.failures.lock().get(&operation).copied();
        match failure {
            None => Ok(()),
            Some(Failure::Status(status)) => {
                Err(AppError::http(status, operation.key(), "injected"))
            }
            Some(Failure::Transport) => Err(AppError::Transport {
                message: format!("connection reset during {}", operation),
            }),
            Some(Failure::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for MemoryCatalog {
    async fn list_products(&self, query: &ListingQuery) -> Result<Vec<Product>, AppError> {
        self.enter(CatalogOperation::ListProducts).await?;
        self.listing_queries.lock().push(*query);

        if self.ignores_listing_query {
            return Ok(self.products.clone());
        }
        match query.most_recent {
            None => Ok(self.products.clone()),
            Some(cap) => {
                let mut recent = self.products.clone();
                recent.sort_by(|a, b| a.cmp_newest_first(b));
                recent.truncate(cap);
                // storage order, not recency order
                recent.reverse();
                Ok(recent)
            }
        }
    }

    async fn products_in_category(&self, id: &CategoryId) -> Result<Vec<Product>, AppError> {
        self.enter(CatalogOperation::ProductsInCategory).await?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.category_id.as_ref() == Some(id))
            .cloned()
            .collect())
    }

    async fn products_of_brand(&self, id: &BrandId) -> Result<Vec<Product>, AppError> {
        self.enter(CatalogOperation::ProductsOfBrand).await?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.brand_id.as_ref() == Some(id))
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.enter(CatalogOperation::ListCategories).await?;
        Ok(self.categories.clone())
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        self.enter(CatalogOperation::ListBrands).await?;
        Ok(self.brands.clone())
    }
}

/// Wraps `catalog` in the reliability layer with short delays.
pub fn reliable(
    catalog: Arc<MemoryCatalog>,
    max_calls: usize,
) -> ReliableCatalogSource<Arc<MemoryCatalog>> {
    ReliableCatalogSource::new(
        catalog,
        RateLimitPolicy {
            max_calls,
            interval: Duration::from_millis(1000),
        },
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(100),
            attempt_timeout: Duration::from_secs(1),
        },
    )
}

// --- Data builders ---

pub fn product(id: &str, price: f64, category: &str, brand: &str, age_days: i64) -> Product {
    let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Product {
        id: id.into(),
        name: format!("Product {}", id),
        price: Some(price),
        category_id: Some(category.into()),
        brand_id: Some(brand.into()),
        rating: None,
        created_at: Some(epoch - ChronoDuration::days(age_days)),
    }
}

pub fn brand(id: &str, name: &str) -> Brand {
    Brand {
        id: id.into(),
        name: name.into(),
    }
}

/// Two main categories. `electronics` has `phones` (with `android` below it)
/// and `laptops`; `garden` has no children.
pub fn sample_categories() -> Vec<Category> {
    vec![
        Category::main("electronics", "Electronics"),
        Category::sub("phones", "Phones", "electronics"),
        Category::sub("android", "Android", "phones"),
        Category::sub("laptops", "Laptops", "electronics"),
        Category::main("garden", "Garden"),
    ]
}

/// Thirty products spread over every category and three brands, with
/// distinct timestamps and several equal prices.
pub fn sample_products() -> Vec<Product> {
    let categories = ["phones", "android", "laptops", "garden", "electronics"];
    let brands = ["acme", "globex", "initech"];
    (0..30)
        .map(|i| {
            let mut p = product(
                &format!("p{:02}", i),
                ((10 + (i * 7) % 20) * 10) as f64,
                categories[i % categories.len()],
                brands[i % brands.len()],
                ((i * 7) % 30) as i64,
            );
            p.rating = (i % 4 != 0).then(|| ((i * 3) % 50) as f64 / 10.0);
            p
        })
        .collect()
}

pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::new(
        sample_categories(),
        vec![
            brand("acme", "Acme"),
            brand("globex", "Globex"),
            brand("initech", "Initech"),
        ],
        sample_products(),
    )
}
