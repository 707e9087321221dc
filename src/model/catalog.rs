use crate::types::{BrandId, CategoryId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Whether a category sits at the top of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Main,
    Sub,
}

impl CategoryKind {
    /// Parses the upstream `kind`/`type` tag. Unknown tags yield `None`, which
    /// callers treat as the legacy untyped shape.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "main" | "parent" | "root" => Some(Self::Main),
            "sub" | "subcategory" | "child" => Some(Self::Sub),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Sub => write!(f, "sub"),
        }
    }
}

/// A node of the category hierarchy as delivered by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    /// `None` for legacy records without a kind tag.
    pub kind: Option<CategoryKind>,
}

impl Category {
    pub fn main(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            kind: Some(CategoryKind::Main),
        }
    }

    pub fn sub(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        parent: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: Some(parent.into()),
            kind: Some(CategoryKind::Sub),
        }
    }

    /// Main-ness from the record alone: the kind tag when present, otherwise
    /// the absence of a parent.
    pub fn is_main(&self) -> bool {
        match self.kind {
            Some(kind) => kind == CategoryKind::Main,
            None => self.parent_id.is_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

/// A product in canonical form.
///
/// `price` and `rating` are `None` when the upstream value was missing or not
/// a valid non-negative number. `created_at` is the recency signal for the
/// `newest` ordering; when absent, the id stands in for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Option<f64>,
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub rating: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price used for ordering; missing prices sort as zero.
    pub fn sort_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Rating used for ordering; missing ratings sort as zero.
    pub fn sort_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Newest-first comparison: later `created_at` first, records without a
    /// timestamp last, then descending id.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}
