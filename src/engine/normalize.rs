// src/engine/normalize.rs
//! Canonicalizes loosely-typed filter parameters into [`FilterCriteria`].
//!
//! Pure validation: no network access, no category lookups.

use crate::constants::DEFAULT_PAGE_LIMIT;
use crate::model::{FilterCriteria, SortKey};
use crate::types::{BrandId, CategoryId, ValidationError};
use serde::Deserialize;

/// Filter parameters as they arrive from a query string or the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCriteria {
    #[serde(alias = "category")]
    pub category_id: Option<String>,
    #[serde(alias = "brand")]
    pub brand_id: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    #[serde(alias = "sortKey", alias = "sortBy")]
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Produces canonical criteria.
///
/// Blank, `null` and `undefined` values mean "not specified". Page and limit
/// fall back to 1 and the default limit when missing, non-numeric or below
/// one; unknown sort keys fall back to `newest`. A present but invalid price
/// bound, or a minimum above the maximum, is rejected.
pub fn normalize(raw: &RawCriteria) -> Result<FilterCriteria, ValidationError> {
    let min_price = parse_price("minPrice", raw.min_price.as_deref())?;
    let max_price = parse_price("maxPrice", raw.max_price.as_deref())?;

    if let (Some(min), Some(max)) = (min_price, max_price) {
        if min > max {
            return Err(ValidationError::InvertedPriceRange { min, max });
        }
    }

    let sort_key = match specified(raw.sort.as_deref()) {
        Some(key) => SortKey::parse(key).unwrap_or_else(|| {
            log::debug!("Unknown sort key {:?}; using newest", key);
            SortKey::Newest
        }),
        None => SortKey::Newest,
    };

    Ok(FilterCriteria {
        category_id: specified(raw.category_id.as_deref()).map(CategoryId::from),
        brand_id: specified(raw.brand_id.as_deref()).map(BrandId::from),
        min_price,
        max_price,
        sort_key,
        page: parse_positive(raw.page.as_deref()).unwrap_or(1),
        limit: parse_positive(raw.limit.as_deref()).unwrap_or(DEFAULT_PAGE_LIMIT),
    })
}

/// Trimmed value, or `None` when the parameter is effectively absent.
fn specified(value: Option<&str>) -> Option<&str> {
    let trimmed = value?.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("undefined")
    {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_price(field: &'static str, value: Option<&str>) -> Result<Option<f64>, ValidationError> {
    let Some(text) = specified(value) else {
        return Ok(None);
    };
    match text.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(Some(price)),
        _ => Err(ValidationError::InvalidPrice {
            field,
            value: text.to_string(),
        }),
    }
}

/// Positive integer, accepting forms like `"2"` and `"2.0"`.
fn parse_positive(value: Option<&str>) -> Option<usize> {
    let text = specified(value)?;
    let number = text
        .parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))?;
    usize::try_from(number).ok().filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw() -> RawCriteria {
        RawCriteria::default()
    }

    #[test]
    fn test_empty_request_yields_defaults() {
        assert_eq!(normalize(&raw()).unwrap(), FilterCriteria::default());
    }

    #[test]
    fn test_blank_and_placeholder_values_are_unspecified() {
        let criteria = normalize(&RawCriteria {
            category_id: Some("".into()),
            brand_id: Some("undefined".into()),
            min_price: Some("null".into()),
            max_price: Some("   ".into()),
            ..raw()
        })
        .unwrap();

        assert_eq!(criteria.category_id, None);
        assert_eq!(criteria.brand_id, None);
        assert_eq!(criteria.min_price, None);
        assert_eq!(criteria.max_price, None);
    }

    #[test]
    fn test_page_and_limit_are_clamped() {
        let criteria = normalize(&RawCriteria {
            page: Some("-3".into()),
            limit: Some("abc".into()),
            ..raw()
        })
        .unwrap();
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.limit, DEFAULT_PAGE_LIMIT);

        let criteria = normalize(&RawCriteria {
            page: Some("0".into()),
            limit: Some("0".into()),
            ..raw()
        })
        .unwrap();
        assert_eq!((criteria.page, criteria.limit), (1, DEFAULT_PAGE_LIMIT));

        let criteria = normalize(&RawCriteria {
            page: Some(" 3 ".into()),
            limit: Some("12".into()),
            ..raw()
        })
        .unwrap();
        assert_eq!((criteria.page, criteria.limit), (3, 12));
    }

    #[test]
    fn test_unknown_sort_falls_back_to_newest() {
        let criteria = normalize(&RawCriteria {
            sort: Some("most_popular".into()),
            ..raw()
        })
        .unwrap();
        assert_eq!(criteria.sort_key, SortKey::Newest);

        let criteria = normalize(&RawCriteria {
            sort: Some("price_desc".into()),
            ..raw()
        })
        .unwrap();
        assert_eq!(criteria.sort_key, SortKey::PriceDesc);
    }

    #[test]
    fn test_ids_are_trimmed() {
        let criteria = normalize(&RawCriteria {
            category_id: Some(" 64f0aa ".into()),
            brand_id: Some("b-7".into()),
            ..raw()
        })
        .unwrap();
        assert_eq!(criteria.category_id, Some(CategoryId::from("64f0aa")));
        assert_eq!(criteria.brand_id, Some(BrandId::from("b-7")));
    }

    #[test]
    fn test_price_bounds() {
        let criteria = normalize(&RawCriteria {
            min_price: Some("100".into()),
            max_price: Some("200.5".into()),
            ..raw()
        })
        .unwrap();
        assert_eq!(criteria.min_price, Some(100.0));
        assert_eq!(criteria.max_price, Some(200.5));

        // equal bounds are a valid single-price range
        assert!(normalize(&RawCriteria {
            min_price: Some("150".into()),
            max_price: Some("150".into()),
            ..raw()
        })
        .is_ok());
    }

    #[test]
    fn test_inverted_range_is_a_caller_error() {
        let err = normalize(&RawCriteria {
            min_price: Some("300".into()),
            max_price: Some("200".into()),
            ..raw()
        })
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvertedPriceRange {
                min: 300.0,
                max: 200.0
            }
        );
    }

    #[test]
    fn test_garbage_price_is_rejected() {
        for bad in ["cheap", "-5", "NaN", "inf"] {
            let err = normalize(&RawCriteria {
                min_price: Some(bad.into()),
                ..raw()
            })
            .unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidPrice { field: "minPrice", .. }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_deserializes_from_query_map() {
        let raw: RawCriteria = serde_json::from_value(serde_json::json!({
            "category": "c1",
            "minPrice": "10",
            "sortBy": "rating_desc",
            "page": "2"
        }))
        .unwrap();
        let criteria = normalize(&raw).unwrap();
        assert_eq!(criteria.category_id, Some(CategoryId::from("c1")));
        assert_eq!(criteria.min_price, Some(10.0));
        assert_eq!(criteria.sort_key, SortKey::RatingDesc);
        assert_eq!(criteria.page, 2);
    }
}
