use super::Product;
use crate::constants::DEFAULT_PAGE_LIMIT;
use crate::types::{BrandId, CategoryId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested ordering of the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl SortKey {
    /// Parses a sort key leniently. Returns `None` for unknown keys; the
    /// normalizer maps that to [`SortKey::Newest`].
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "newest" => Some(Self::Newest),
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "rating_desc" => Some(Self::RatingDesc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::RatingDesc => "rating_desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical filter request. Produced by the normalizer or the builder
/// methods; `page` and `limit` are always at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_key: SortKey,
    pub page: usize,
    pub limit: usize,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category_id: None,
            brand_id: None,
            min_price: None,
            max_price: None,
            sort_key: SortKey::Newest,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl FilterCriteria {
    pub fn with_category(mut self, id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(id.into());
        self
    }

    pub fn with_brand(mut self, id: impl Into<BrandId>) -> Self {
        self.brand_id = Some(id.into());
        self
    }

    /// Sets either price bound; the builder does not check ordering, the
    /// normalizer does.
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_sort(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Sets the page window, clamping both values to at least one.
    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.page = page.max(1);
        self.limit = limit.max(1);
        self
    }

    pub fn has_price_bound(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }
}

/// One page of the filtered, ordered product list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    #[serde(rename = "products")]
    pub items: Vec<Product>,
    #[serde(rename = "totalProducts")]
    pub total_count: usize,
    #[serde(rename = "currentPage")]
    pub page: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    #[serde(rename = "hasNextPage")]
    pub has_next: bool,
    #[serde(rename = "hasPrevPage")]
    pub has_prev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(SortKey::parse("price_asc"), Some(SortKey::PriceAsc));
        assert_eq!(SortKey::parse("Price-Desc"), Some(SortKey::PriceDesc));
        assert_eq!(SortKey::parse(" rating_desc "), Some(SortKey::RatingDesc));
        assert_eq!(SortKey::parse("popularity"), None);
    }

    #[test]
    fn test_builder_clamps_page_window() {
        let criteria = FilterCriteria::default().with_page(0, 0);
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.limit, 1);
    }
}
