// src/api/parser.rs
//! Turns raw catalog responses into domain records.
//!
//! Every list endpoint may wrap its records in an extra array level. The
//! parser detects that shape (first element is an array), flattens one level
//! and drops `null` entries before converting each record.

use super::client::ApiResponse;
use super::responses::{BrandRecord, CategoryRecord, ProductRecord, ToDomain};
use crate::error::AppError;
use crate::model::{Brand, Category, Product};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Checks the status and decodes the body as JSON.
pub fn parse_api_response(result: ApiResponse<String>) -> Result<Value, AppError> {
    if !result.status.is_success() {
        log::debug!("HTTP {} from {}", result.status, result.url);
        return Err(AppError::http(
            result.status.as_u16(),
            result.url,
            &result.data,
        ));
    }

    serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", result.url, e);
        AppError::malformed(&result.url, format!("invalid JSON: {}", e))
    })
}

/// The record array of a list response, flattened and without nulls.
pub fn flatten_records(body: Value, endpoint: &str) -> Result<Vec<Value>, AppError> {
    let Value::Array(items) = body else {
        return Err(AppError::malformed(
            endpoint,
            format!("expected an array, got {}", json_kind(&body)),
        ));
    };

    let nested = matches!(items.first(), Some(Value::Array(_)));
    let records: Vec<Value> = if nested {
        log::debug!("Flattening nested record array from {}", endpoint);
        items
            .into_iter()
            .flat_map(|item| match item {
                Value::Array(inner) => inner,
                other => vec![other],
            })
            .collect()
    } else {
        items
    };

    Ok(records.into_iter().filter(|v| !v.is_null()).collect())
}

/// Decodes each element as `R` and converts it to `T`.
pub fn parse_record_list<R, T>(result: ApiResponse<String>) -> Result<Vec<T>, AppError>
where
    R: DeserializeOwned + ToDomain<T>,
{
    let endpoint = result.url.clone();
    let body = parse_api_response(result)?;
    let records = flatten_records(body, &endpoint)?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            if !value.is_object() {
                return Err(AppError::malformed(
                    &endpoint,
                    format!("record {} is {}, not an object", index, json_kind(&value)),
                ));
            }
            let record: R = serde_json::from_value(value).map_err(|e| {
                AppError::malformed(&endpoint, format!("record {}: {}", index, e))
            })?;
            record.to_domain().map_err(|e| at_endpoint(e, &endpoint, index))
        })
        .collect()
}

pub fn parse_products(result: ApiResponse<String>) -> Result<Vec<Product>, AppError> {
    parse_record_list::<ProductRecord, Product>(result)
}

pub fn parse_categories(result: ApiResponse<String>) -> Result<Vec<Category>, AppError> {
    parse_record_list::<CategoryRecord, Category>(result)
}

pub fn parse_brands(result: ApiResponse<String>) -> Result<Vec<Brand>, AppError> {
    parse_record_list::<BrandRecord, Brand>(result)
}

fn at_endpoint(error: AppError, endpoint: &str, index: usize) -> AppError {
    match error {
        AppError::MalformedResponse { reason, .. } => {
            AppError::malformed(endpoint, format!("record {}: {}", index, reason))
        }
        other => other,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
