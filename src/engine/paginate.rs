// src/engine/paginate.rs
use crate::model::{FilterResult, Product};

/// Slices an ordered list into one page.
///
/// `page` and `limit` are treated as at least one. A page past the end is
/// empty but still reports the real totals.
pub fn paginate(items: Vec<Product>, page: usize, limit: usize) -> FilterResult {
    let page = page.max(1);
    let limit = limit.max(1);
    let total_count = items.len();
    let total_pages = total_count.div_ceil(limit);

    let start = (page - 1).saturating_mul(limit);
    let page_items = items.into_iter().skip(start).take(limit).collect();

    FilterResult {
        items: page_items,
        total_count,
        page,
        total_pages,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}
