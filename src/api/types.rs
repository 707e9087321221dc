// src/api/types.rs
//! Type definitions for the catalog API module.

use std::fmt;

// --- Operation keys ---

/// Logical catalog operations. The key of each operation names its
/// rate-limit bucket and appears in retry and timeout diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogOperation {
    ListProducts,
    ProductsInCategory,
    ProductsOfBrand,
    ListCategories,
    ListBrands,
}

impl CatalogOperation {
    pub const ALL: [CatalogOperation; 5] = [
        Self::ListProducts,
        Self::ProductsInCategory,
        Self::ProductsOfBrand,
        Self::ListCategories,
        Self::ListBrands,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::ListProducts => "products.list",
            Self::ProductsInCategory => "products.category",
            Self::ProductsOfBrand => "products.brand",
            Self::ListCategories => "categories.list",
            Self::ListBrands => "brands.list",
        }
    }
}

impl fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// --- Listing parameters ---

/// Parameters of the generic product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingQuery {
    /// Keep only the `n` most recently created products.
    pub most_recent: Option<usize>,
}

impl ListingQuery {
    /// The complete, unbounded listing.
    pub fn all() -> Self {
        Self::default()
    }

    /// The `cap` most recently created products.
    pub fn most_recent(cap: usize) -> Self {
        Self {
            most_recent: Some(cap),
        }
    }

    /// Query-string pairs sent to `GET /products`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self.most_recent {
            Some(cap) => vec![("sort", "-createdAt".to_string()), ("limit", cap.to_string())],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_operation_keys_are_distinct() {
        let keys: HashSet<&str> = CatalogOperation::ALL.iter().map(|op| op.key()).collect();
        assert_eq!(keys.len(), CatalogOperation::ALL.len());
        assert_eq!(CatalogOperation::ProductsInCategory.to_string(), "products.category");
    }

    #[test]
    fn test_listing_query_pairs() {
        assert!(ListingQuery::all().query_pairs().is_empty());
        assert_eq!(
            ListingQuery::most_recent(100).query_pairs(),
            vec![("sort", "-createdAt".to_string()), ("limit", "100".to_string())]
        );
    }
}
