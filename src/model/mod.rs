//! Catalog domain model: the records the engine reads and the query types it
//! accepts and returns.

mod catalog;
mod query;

pub use catalog::{Brand, Category, CategoryKind, Product};
pub use query::{FilterCriteria, FilterResult, SortKey};
