// src/engine/filter.rs
//! Local filtering and ordering of a fetched product list.
//!
//! Stages run in a fixed order: category (with rollup), brand, price, then
//! sort. A stage whose dimension the server already scoped is skipped.

use super::planner::ScopedDimension;
use super::tree::CategoryTree;
use crate::model::{FilterCriteria, Product, SortKey};
use std::cmp::Ordering;

pub struct FilterPipeline<'a> {
    tree: &'a CategoryTree,
    criteria: &'a FilterCriteria,
    server_scope: Option<ScopedDimension>,
}

impl<'a> FilterPipeline<'a> {
    pub fn new(tree: &'a CategoryTree, criteria: &'a FilterCriteria) -> Self {
        Self {
            tree,
            criteria,
            server_scope: None,
        }
    }

    /// Marks a dimension as already applied by the source.
    pub fn with_server_scope(mut self, scope: Option<ScopedDimension>) -> Self {
        self.server_scope = scope;
        self
    }

    /// Filters and orders `products`. The output order is total, so equal
    /// inputs in any order produce the same list.
    pub fn run(&self, products: Vec<Product>) -> Vec<Product> {
        let fetched = products.len();
        let mut kept: Vec<Product> = products
            .into_iter()
            .filter(|p| self.keep_category(p))
            .filter(|p| self.keep_brand(p))
            .filter(|p| self.keep_price(p))
            .collect();

        log::debug!(
            "Filter pipeline kept {} of {} products (server scope: {:?})",
            kept.len(),
            fetched,
            self.server_scope
        );

        sort_products(&mut kept, self.criteria.sort_key);
        kept
    }

    fn keep_category(&self, product: &Product) -> bool {
        if self.server_scope == Some(ScopedDimension::Category) {
            return true;
        }
        match &self.criteria.category_id {
            None => true,
            Some(target) => product
                .category_id
                .as_ref()
                .is_some_and(|category| self.tree.matches(category, target)),
        }
    }

    fn keep_brand(&self, product: &Product) -> bool {
        if self.server_scope == Some(ScopedDimension::Brand) {
            return true;
        }
        match &self.criteria.brand_id {
            None => true,
            Some(target) => product.brand_id.as_ref() == Some(target),
        }
    }

    /// Inclusive bounds; a product without a usable price never satisfies an
    /// active bound.
    fn keep_price(&self, product: &Product) -> bool {
        if !self.criteria.has_price_bound() {
            return true;
        }
        let Some(price) = product.price else {
            return false;
        };
        self.criteria.min_price.map_or(true, |min| price >= min)
            && self.criteria.max_price.map_or(true, |max| price <= max)
    }
}

/// Orders products in place by `key`, breaking ties newest first and then by
/// descending id.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    products.sort_by(|a, b| compare(a, b, key));
}

fn compare(a: &Product, b: &Product, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Newest => Ordering::Equal,
        SortKey::PriceAsc => a.sort_price().total_cmp(&b.sort_price()),
        SortKey::PriceDesc => b.sort_price().total_cmp(&a.sort_price()),
        SortKey::RatingDesc => b.sort_rating().total_cmp(&a.sort_rating()),
    };
    primary.then_with(|| a.cmp_newest_first(b))
}
