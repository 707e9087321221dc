// src/config.rs
use crate::api::RateLimitPolicy;
use crate::constants::{
    CONNECT_TIMEOUT, FALLBACK_LISTING_CAP, RATE_LIMIT_INTERVAL, RATE_LIMIT_MAX_CALLS,
    REQUEST_TIMEOUT, RETRY_ATTEMPTS, RETRY_BASE_DELAY, RETRY_MAX_DELAY,
};
use crate::engine::RawCriteria;
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::types::{ApiToken, CatalogUrl, ValidationError};
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Environment variable holding the catalog base URL.
pub const BASE_URL_ENV: &str = "CATALOG_API_URL";
/// Environment variable holding the optional bearer token.
pub const TOKEN_ENV: &str = "CATALOG_API_TOKEN";

const LOCAL_CATALOG_URL: &str = "http://localhost:5000/api/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON page
    Json,
    /// One line per product with resolved category and brand names
    Table,
}

/// Parsed command-line input.
///
/// Filter flags are taken as plain strings and normalized by the engine, the
/// same way query-string parameters are.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Category id; main categories include their subcategories
    #[arg(short, long)]
    pub category: Option<String>,

    /// Brand id
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Inclusive lower price bound
    #[arg(long)]
    pub min_price: Option<String>,

    /// Inclusive upper price bound
    #[arg(long)]
    pub max_price: Option<String>,

    /// newest, price_asc, price_desc or rating_desc
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Page number, starting at 1
    #[arg(short, long)]
    pub page: Option<String>,

    /// Products per page
    #[arg(short, long)]
    pub limit: Option<String>,

    /// Catalog API base URL (falls back to CATALOG_API_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Calls allowed per operation within one rate-limit window
    #[arg(long, default_value_t = RATE_LIMIT_MAX_CALLS)]
    pub rate_limit: usize,

    /// Rate-limit window in milliseconds
    #[arg(long, default_value_t = RATE_LIMIT_INTERVAL.as_millis() as u64)]
    pub rate_interval_ms: u64,

    /// Attempts per call, including the first
    #[arg(long, default_value_t = RETRY_ATTEMPTS)]
    pub retries: u32,

    /// Initial retry backoff in milliseconds
    #[arg(long, default_value_t = RETRY_BASE_DELAY.as_millis() as u64)]
    pub retry_base_ms: u64,

    /// Maximum retry backoff in milliseconds
    #[arg(long, default_value_t = RETRY_MAX_DELAY.as_millis() as u64)]
    pub retry_cap_ms: u64,

    /// Per-attempt deadline in milliseconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Recent products listed when a specialized endpoint is down
    #[arg(long, default_value_t = FALLBACK_LISTING_CAP)]
    pub fallback_cap: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CommandLineInput {
    /// The filter flags as raw criteria.
    pub fn raw_criteria(&self) -> RawCriteria {
        RawCriteria {
            category_id: self.category.clone(),
            brand_id: self.brand.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            sort: self.sort.clone(),
            page: self.page.clone(),
            limit: self.limit.clone(),
        }
    }
}

/// Resolved engine configuration: validated and ready to build a source.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: CatalogUrl,
    pub token: Option<ApiToken>,
    pub rate_limit: RateLimitPolicy,
    pub retry: RetryPolicy,
    pub connect_timeout: Duration,
    pub fallback_listing_cap: usize,
}

impl EngineConfig {
    /// Resolves the configuration from CLI input and the process environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves the configuration, reading environment values through `env`.
    pub fn resolve_with<F>(cli: &CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = cli
            .base_url
            .clone()
            .or_else(|| env(BASE_URL_ENV))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "no catalog URL: pass --base-url or set {}",
                    BASE_URL_ENV
                ))
            })?;
        let base_url = CatalogUrl::parse(&raw_url)?;

        let token = env(TOKEN_ENV)
            .filter(|t| !t.trim().is_empty())
            .map(ApiToken::new)
            .transpose()?;

        let rate_limit = RateLimitPolicy {
            max_calls: bounded(cli.rate_limit as u64, 1, 10_000)? as usize,
            interval: Duration::from_millis(bounded(cli.rate_interval_ms, 1, 3_600_000)?),
        };

        let base_delay = Duration::from_millis(cli.retry_base_ms);
        let max_delay = Duration::from_millis(cli.retry_cap_ms);
        let retry = RetryPolicy {
            max_attempts: bounded(u64::from(cli.retries), 1, 10)? as u32,
            base_delay,
            max_delay: max_delay.max(base_delay),
            attempt_timeout: Duration::from_millis(bounded(cli.timeout_ms, 1, 600_000)?),
        };

        Ok(EngineConfig {
            base_url,
            token,
            rate_limit,
            retry,
            connect_timeout: CONNECT_TIMEOUT,
            fallback_listing_cap: bounded(cli.fallback_cap as u64, 1, 10_000)? as usize,
        })
    }
}

fn bounded(value: u64, min: u64, max: u64) -> Result<u64, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfBounds { value, min, max })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: CatalogUrl::parse(LOCAL_CATALOG_URL)
                .expect("Local catalog URL should be valid"),
            token: None,
            rate_limit: RateLimitPolicy::default(),
            retry: RetryPolicy::default(),
            connect_timeout: CONNECT_TIMEOUT,
            fallback_listing_cap: FALLBACK_LISTING_CAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["catalog-query"];
        argv.extend_from_slice(args);
        CommandLineInput::parse_from(argv)
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_match_constants() {
        let config =
            EngineConfig::resolve_with(&cli(&["--base-url", "http://shop.test/api"]), no_env)
                .unwrap();
        assert_eq!(config.rate_limit, RateLimitPolicy::default());
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.fallback_listing_cap, FALLBACK_LISTING_CAP);
        assert_eq!(config.base_url.as_str(), "http://shop.test/api/");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_url_and_token_from_environment() {
        let env = |name: &str| match name {
            BASE_URL_ENV => Some("https://catalog.example.com".to_string()),
            TOKEN_ENV => Some("tok_123".to_string()),
            _ => None,
        };
        let config = EngineConfig::resolve_with(&cli(&[]), env).unwrap();
        assert_eq!(config.base_url.as_str(), "https://catalog.example.com/");
        assert_eq!(config.token.unwrap().as_str(), "tok_123");
    }

    #[test]
    fn test_missing_url_is_reported() {
        let err = EngineConfig::resolve_with(&cli(&[]), no_env).unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let err = EngineConfig::resolve_with(
            &cli(&["--base-url", "http://shop.test", "--rate-limit", "0"]),
            no_env,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidCriteria(ValidationError::OutOfBounds { value: 0, .. })
        ));
    }

    #[test]
    fn test_filter_flags_become_raw_criteria() {
        let input = cli(&[
            "--category",
            "c1",
            "--min-price",
            "10",
            "--sort",
            "price_asc",
            "--page",
            "2",
        ]);
        let raw = input.raw_criteria();
        assert_eq!(raw.category_id.as_deref(), Some("c1"));
        assert_eq!(raw.min_price.as_deref(), Some("10"));
        assert_eq!(raw.sort.as_deref(), Some("price_asc"));
        assert_eq!(raw.page.as_deref(), Some("2"));
        assert_eq!(raw.brand_id, None);
    }
}
