// src/api/reliable.rs
//! A [`CatalogSource`] decorator that applies rate limiting and retries to
//! every call of the wrapped source.

use super::rate_limiter::{RateLimitPolicy, SlidingWindowLimiter};
use super::types::{CatalogOperation, ListingQuery};
use super::CatalogSource;
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{Brand, Category, Product};
use crate::types::{BrandId, CategoryId};

/// Every logical call first takes a rate-limit slot for its operation key,
/// then runs through [`retry_with_backoff`]. Retries of one call do not take
/// further slots, and a rejected call is never attempted.
pub struct ReliableCatalogSource<S> {
    inner: S,
    limiter: SlidingWindowLimiter,
    retry: RetryPolicy,
}

impl<S: CatalogSource> ReliableCatalogSource<S> {
    pub fn new(inner: S, rate_limit: RateLimitPolicy, retry: RetryPolicy) -> Self {
        Self {
            inner,
            limiter: SlidingWindowLimiter::new(rate_limit),
            retry,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn limiter(&self) -> &SlidingWindowLimiter {
        &self.limiter
    }

    fn admit(&self, operation: CatalogOperation) -> Result<(), AppError> {
        self.limiter.try_acquire(operation.key())
    }
}

#[async_trait::async_trait]
impl<S: CatalogSource> CatalogSource for ReliableCatalogSource<S> {
    async fn list_products(&self, query: &ListingQuery) -> Result<Vec<Product>, AppError> {
        let operation = CatalogOperation::ListProducts;
        self.admit(operation)?;
        let inner = &self.inner;
        retry_with_backoff(&self.retry, operation.key(), move || inner.list_products(query)).await
    }

    async fn products_in_category(&self, id: &CategoryId) -> Result<Vec<Product>, AppError> {
        let operation = CatalogOperation::ProductsInCategory;
        self.admit(operation)?;
        let inner = &self.inner;
        retry_with_backoff(&self.retry, operation.key(), move || {
            inner.products_in_category(id)
        })
        .await
    }

    async fn products_of_brand(&self, id: &BrandId) -> Result<Vec<Product>, AppError> {
        let operation = CatalogOperation::ProductsOfBrand;
        self.admit(operation)?;
        let inner = &self.inner;
        retry_with_backoff(&self.retry, operation.key(), move || inner.products_of_brand(id)).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let operation = CatalogOperation::ListCategories;
        self.admit(operation)?;
        let inner = &self.inner;
        retry_with_backoff(&self.retry, operation.key(), move || inner.list_categories()).await
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        let operation = CatalogOperation::ListBrands;
        self.admit(operation)?;
        let inner = &self.inner;
        retry_with_backoff(&self.retry, operation.key(), move || inner.list_brands()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Fails the brand listing with the given statuses, then succeeds.
    struct FlakySource {
        failures: Vec<u16>,
        calls: AtomicU32,
    }

    impl FlakySource {
        fn new(failures: &[u16]) -> Self {
            Self {
                failures: failures.to_vec(),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CatalogSource for FlakySource {
        async fn list_products(&self, _: &ListingQuery) -> Result<Vec<Product>, AppError> {
            Ok(Vec::new())
        }
        async fn products_in_category(&self, _: &CategoryId) -> Result<Vec<Product>, AppError> {
            Ok(Vec::new())
        }
        async fn products_of_brand(&self, _: &BrandId) -> Result<Vec<Product>, AppError> {
            Ok(Vec::new())
        }
        async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
            Ok(Vec::new())
        }
        async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            match self.failures.get(call) {
                Some(status) => Err(AppError::http(*status, "brands", "")),
                None => Ok(vec![Brand {
                    id: BrandId::from("b1"),
                    name: "Acme".into(),
                }]),
            }
        }
    }

    fn reliable(failures: &[u16], max_calls: usize) -> ReliableCatalogSource<FlakySource> {
        ReliableCatalogSource::new(
            FlakySource::new(failures),
            RateLimitPolicy {
                max_calls,
                interval: Duration::from_millis(1000),
            },
            RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(100),
                max_delay: Duration::from_secs(1),
                attempt_timeout: Duration::from_secs(5),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_take_a_single_slot() {
        let source = reliable(&[500, 502], 1);
        let brands = source.list_brands().await.unwrap();
        assert_eq!(brands.len(), 1);
        assert_eq!(source.inner().calls(), 3);
        assert_eq!(source.limiter().recent_calls("brands.list"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_call_never_reaches_source() {
        let source = reliable(&[], 1);
        source.list_brands().await.unwrap();

        let err = source.list_brands().await.unwrap_err();
        assert!(matches!(err, AppError::RateLimitExceeded { .. }));
        assert_eq!(source.inner().calls(), 1);

        // other operations have their own bucket
        assert!(source.list_categories().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_is_not_retried() {
        let source = reliable(&[401, 500], 10);
        let err = source.list_brands().await.unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(source.inner().calls(), 1);
    }
}
