// src/api/client.rs
//! Pure HTTP client wrapper for the catalog API.
//!
//! This module provides a thin wrapper around reqwest. It handles the base
//! URL, authentication and timeouts; status handling and record parsing live
//! in the parser.

use super::parser;
use super::types::ListingQuery;
use crate::error::AppError;
use crate::model::{Brand, Category, Product};
use crate::types::{ApiToken, BrandId, CatalogUrl, CategoryId};
use reqwest::{header, Client, Response};
use std::time::Duration;

/// A thin wrapper around reqwest Client for catalog API requests.
#[derive(Clone)]
pub struct CatalogHttpClient {
    client: Client,
    base_url: CatalogUrl,
}

impl CatalogHttpClient {
    /// Creates a new HTTP client for the catalog at `base_url`.
    ///
    /// `request_timeout` bounds a whole request; the reliability layer puts
    /// its own deadline on top of it.
    pub fn new(
        base_url: CatalogUrl,
        token: Option<&ApiToken>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(token)?)
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Creates the default headers for catalog requests.
    fn create_headers(token: Option<&ApiToken>) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        if let Some(token) = token {
            let auth_header = format!("Bearer {}", token.as_str());
            let mut value = header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    pub fn base_url(&self) -> &CatalogUrl {
        &self.base_url
    }

    /// Makes a GET request to the endpoint below the base URL.
    ///
    /// # Arguments
    ///
    /// * `segments` - Path segments, each percent-encoded on its own
    /// * `query` - Query-string pairs
    pub async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Response, AppError> {
        let mut url = self.base_url.endpoint(segments)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        log::debug!("{} {}", response.status(), response.url());

        Ok(response)
    }
}

#[async_trait::async_trait]
impl super::CatalogSource for CatalogHttpClient {
    async fn list_products(&self, query: &ListingQuery) -> Result<Vec<Product>, AppError> {
        let response = self.get(&["products"], &query.query_pairs()).await?;
        let result = extract_response_text(response).await?;
        parser::parse_products(result)
    }

    async fn products_in_category(&self, id: &CategoryId) -> Result<Vec<Product>, AppError> {
        let response = self
            .get(&["products", "category", id.as_str()], &[])
            .await?;
        let result = extract_response_text(response).await?;
        parser::parse_products(result)
    }

    async fn products_of_brand(&self, id: &BrandId) -> Result<Vec<Product>, AppError> {
        let response = self.get(&["products", "brand", id.as_str()], &[]).await?;
        let result = extract_response_text(response).await?;
        parser::parse_products(result)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let response = self.get(&["categories"], &[]).await?;
        let result = extract_response_text(response).await?;
        parser::parse_categories(result)
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        let response = self.get(&["brands"], &[]).await?;
        let result = extract_response_text(response).await?;
        parser::parse_brands(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
///
/// # Arguments
///
/// * `response` - The HTTP response to extract text from
///
/// # Returns
///
/// An `ApiResponse<String>` containing the response text along with status and URL metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
