//! `Retry-After` hint normalization.
//!
//! Servers hand back retry hints as bare seconds, numeric strings, or
//! HTTP-dates. Callers want one shape: whole seconds to wait, or `None`
//! when the hint is unusable. Absence is a value here, never an error —
//! a caller with `None` falls back to its local backoff policy.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::{Duration, SystemTime};

/// Normalize a numeric retry hint to whole seconds.
///
/// Finite values are rounded up after clamping to zero; NaN and the
/// infinities are unparseable.
pub fn from_number(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    Some(value.max(0.0).ceil() as u64)
}

/// Normalize a textual retry hint to whole seconds.
///
/// Tries a plain number first, then an HTTP-date. A date at or before the
/// current instant yields `0`; anything unparseable yields `None`.
pub fn from_str(raw: &str) -> Option<u64> {
    from_str_at(raw, SystemTime::now())
}

/// Read and normalize the `Retry-After` header from a response header map.
pub fn from_headers(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(RETRY_AFTER)?;
    from_str(value.to_str().ok()?)
}

/// Date-branch evaluation against an injected `now`, for tests.
fn from_str_at(raw: &str, now: SystemTime) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        return from_number(value);
    }
    let instant = httpdate::parse_http_date(trimmed).ok()?;
    match instant.duration_since(now) {
        Ok(until) => Some(ceil_seconds(until)),
        // The date is now or in the past: retry immediately.
        Err(_) => Some(0),
    }
}

/// Ceiling of a duration in seconds, from its millisecond count.
fn ceil_seconds(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    ((millis + 999) / 1000) as u64
}
