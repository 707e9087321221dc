use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    #[error("Invalid {field}: {value:?} is not a non-negative number")]
    InvalidPrice { field: &'static str, value: String },

    #[error("Inverted price range: minimum {min} is greater than maximum {max}")]
    InvertedPriceRange { min: f64, max: f64 },

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: u64, min: u64, max: u64 },

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid API token format: {reason}")]
    InvalidToken { reason: String },
}
