// src/api/responses.rs
//! Wire records for the catalog API.
//!
//! The catalog serves records in several historical shapes: ids as `id` or
//! `_id`, references as bare ids, numbers or populated objects, numbers as
//! JSON numbers or strings. These records accept all of them and convert
//! into the canonical domain structs through [`ToDomain`]; nothing past this
//! module sees the raw shapes.

use crate::error::AppError;
use crate::model::{Brand, Category, CategoryKind, Product};
use crate::types::Id;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Trait for converting wire records to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, AppError>;
}

// --- References ---

/// A reference to another record as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    /// Absent or `null`.
    #[default]
    Missing,
    Id(String),
    Number(serde_json::Number),
    /// An embedded copy of the referenced record.
    Populated(Map<String, Value>),
    /// Any other shape. Treated as no reference.
    Unrecognized(Value),
}

impl Reference {
    /// The referenced id, if the reference carries a usable one.
    pub fn id(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Id(id) => non_blank(id),
            Self::Number(number) => Some(number.to_string()),
            Self::Populated(fields) => {
                let id = ["id", "_id"]
                    .iter()
                    .filter_map(|key| fields.get(*key))
                    .find_map(scalar_id);
                if id.is_none() {
                    log::warn!("Populated reference without an id: {:?}", fields);
                }
                id
            }
            Self::Unrecognized(value) => {
                log::warn!("Ignoring reference of unrecognized shape: {}", value);
                None
            }
        }
    }

    fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

const MISSING_REFERENCE: &Reference = &Reference::Missing;

/// The first of several alias fields that is present.
fn first_reference<'a>(candidates: &[&'a Reference]) -> &'a Reference {
    candidates
        .iter()
        .copied()
        .find(|r| !r.is_missing())
        .unwrap_or(MISSING_REFERENCE)
}

// --- Scalars ---

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_scalar_id(candidates: &[&Option<Value>]) -> Option<String> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_ref)
        .find_map(scalar_id)
}

/// A finite, non-negative number from a JSON number or numeric string.
pub fn non_negative_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (number.is_finite() && number >= 0.0).then_some(number)
}

/// An RFC 3339 string or epoch milliseconds.
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

// --- Records ---

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    rating: Value,
    #[serde(default)]
    category: Reference,
    #[serde(default, rename = "categoryId")]
    category_id: Reference,
    #[serde(default)]
    brand: Reference,
    #[serde(default, rename = "brandId")]
    brand_id: Reference,
    #[serde(default, rename = "createdAt")]
    created_at: Option<Value>,
    #[serde(default, rename = "created_at")]
    created_at_snake: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parent: Reference,
    #[serde(default, rename = "parentId")]
    parent_id: Reference,
    #[serde(default, rename = "parentCategory")]
    parent_category: Reference,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default, rename = "type")]
    type_tag: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
}

fn required_id<T>(record: &str, candidates: &[&Option<Value>]) -> Result<Id<T>, AppError> {
    first_scalar_id(candidates)
        .map(Id::from_normalized)
        .ok_or_else(|| AppError::malformed("<record>", format!("{} record without an id", record)))
}

impl ToDomain<Product> for ProductRecord {
    fn to_domain(self) -> Result<Product, AppError> {
        let id = required_id("product", &[&self.id, &self.mongo_id])?;
        let created_at = self
            .created_at
            .as_ref()
            .or(self.created_at_snake.as_ref())
            .and_then(timestamp);

        Ok(Product {
            id,
            name: self.name.unwrap_or_default(),
            price: non_negative_number(&self.price),
            category_id: first_reference(&[&self.category, &self.category_id])
                .id()
                .map(Id::from_normalized),
            brand_id: first_reference(&[&self.brand, &self.brand_id])
                .id()
                .map(Id::from_normalized),
            rating: non_negative_number(&self.rating),
            created_at,
        })
    }
}

impl ToDomain<Category> for CategoryRecord {
    fn to_domain(self) -> Result<Category, AppError> {
        let id = required_id("category", &[&self.id, &self.mongo_id])?;
        let parent_id = first_reference(&[&self.parent, &self.parent_id, &self.parent_category])
            .id()
            .map(Id::from_normalized);
        let kind = self
            .kind
            .as_deref()
            .or(self.type_tag.as_deref())
            .and_then(CategoryKind::from_tag);

        Ok(Category {
            id,
            name: self.name.unwrap_or_default(),
            parent_id,
            kind,
        })
    }
}

impl ToDomain<Brand> for BrandRecord {
    fn to_domain(self) -> Result<Brand, AppError> {
        Ok(Brand {
            id: required_id("brand", &[&self.id, &self.mongo_id])?,
            name: self.name.unwrap_or_default(),
        })
    }
}
