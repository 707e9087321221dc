// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. All of them are defaults; `EngineConfig` can override
//! every value except the error preview length.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Query defaults
// ---------------------------------------------------------------------------

/// Products per page when the request gives no usable limit.
///
/// Matches a three-by-three product grid.
pub const DEFAULT_PAGE_LIMIT: usize = 9;

/// How many recent products the degraded path lists when a specialized
/// endpoint is unavailable.
pub const FALLBACK_LISTING_CAP: usize = 100;

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

/// Calls granted per operation key within one window.
pub const RATE_LIMIT_MAX_CALLS: usize = 10;

/// Length of the trailing rate-limit window.
pub const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(1000);

// ---------------------------------------------------------------------------
// Retries
// ---------------------------------------------------------------------------

/// Attempts per logical call, including the first one.
pub const RETRY_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles on each further retry.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on any single backoff delay.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(5);

/// Deadline for a single attempt, after which it counts as a timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for establishing a TCP/TLS connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
