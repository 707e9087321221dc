// src/engine/planner.rs
use super::tree::CategoryTree;
use crate::model::FilterCriteria;
use crate::types::{BrandId, CategoryId};
use std::fmt;

/// How a request is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Full listing, every dimension filtered locally.
    GenericListing,
    /// Full listing with the main category's rollup applied locally.
    GenericListingWithRollup(CategoryId),
    /// Server-scoped fetch for a sub or unknown category.
    CategorySpecific(CategoryId),
    /// Server-scoped fetch for a brand.
    BrandSpecific(BrandId),
}

/// The filter dimension a server-scoped fetch already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopedDimension {
    Category,
    Brand,
}

impl QueryPlan {
    /// Whether the plan hits a specialized endpoint, and can therefore
    /// degrade to the generic listing.
    pub fn is_specialized(&self) -> bool {
        matches!(self, Self::CategorySpecific(_) | Self::BrandSpecific(_))
    }

    pub fn server_scope(&self) -> Option<ScopedDimension> {
        match self {
            Self::CategorySpecific(_) => Some(ScopedDimension::Category),
            Self::BrandSpecific(_) => Some(ScopedDimension::Brand),
            Self::GenericListing | Self::GenericListingWithRollup(_) => None,
        }
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenericListing => write!(f, "generic listing"),
            Self::GenericListingWithRollup(id) => {
                write!(f, "generic listing + rollup of main category {}", id)
            }
            Self::CategorySpecific(id) => write!(f, "category-specific fetch ({})", id),
            Self::BrandSpecific(id) => write!(f, "brand-specific fetch ({})", id),
        }
    }
}

/// Chooses the data source for `criteria`. Category takes precedence over
/// brand; a main category is never sent to the category endpoint because the
/// server only matches direct membership.
pub fn plan(criteria: &FilterCriteria, tree: &CategoryTree) -> QueryPlan {
    if let Some(category_id) = &criteria.category_id {
        if tree.is_main(category_id) {
            return QueryPlan::GenericListingWithRollup(category_id.clone());
        }
        return QueryPlan::CategorySpecific(category_id.clone());
    }

    if let Some(brand_id) = &criteria.brand_id {
        return QueryPlan::BrandSpecific(brand_id.clone());
    }

    QueryPlan::GenericListing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn tree() -> CategoryTree {
        CategoryTree::build(vec![
            Category::main("m", "Main"),
            Category::sub("s", "Sub", "m"),
        ])
    }

    #[test]
    fn test_main_category_uses_rollup() {
        let criteria = FilterCriteria::default().with_category("m").with_brand("b");
        let plan = plan(&criteria, &tree());
        assert_eq!(plan, QueryPlan::GenericListingWithRollup(CategoryId::from("m")));
        assert!(!plan.is_specialized());
        assert_eq!(plan.server_scope(), None);
    }

    #[test]
    fn test_sub_and_unknown_categories_use_category_endpoint() {
        let tree = tree();
        for id in ["s", "not-in-tree"] {
            let plan = plan(&FilterCriteria::default().with_category(id), &tree);
            assert_eq!(plan, QueryPlan::CategorySpecific(CategoryId::from(id)));
            assert_eq!(plan.server_scope(), Some(ScopedDimension::Category));
        }
    }

    #[test]
    fn test_brand_only() {
        let plan = plan(&FilterCriteria::default().with_brand("b"), &tree());
        assert_eq!(plan, QueryPlan::BrandSpecific(BrandId::from("b")));
        assert!(plan.is_specialized());
        assert_eq!(plan.server_scope(), Some(ScopedDimension::Brand));
    }

    #[test]
    fn test_no_scoping_criteria() {
        let criteria = FilterCriteria::default().with_price_range(Some(1.0), None);
        assert_eq!(plan(&criteria, &tree()), QueryPlan::GenericListing);
        // an empty tree still plans
        assert_eq!(
            plan(&FilterCriteria::default(), &CategoryTree::default()),
            QueryPlan::GenericListing
        );
    }
}
