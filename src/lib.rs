//! Backstop — client-side HTTP resilience and eligibility utilities.
//!
//! The small pieces an API-calling layer needs around its requests:
//! standard outbound headers with a correlation id, `Retry-After`
//! normalization, a bounded exponential-backoff retry policy with
//! status-code gating, a persisted per-action cooldown tracker, and
//! capacity math for join eligibility. Transport, rendering, and
//! navigation stay with the host application; this crate only shapes
//! header values and retry decisions for it.
//!
//! # Quick start
//!
//! ```no_run
//! use backstop::backoff::RetryPolicy;
//! use backstop::headers::build_request_headers;
//! use backstop::retry_after;
//!
//! # async fn example(client: reqwest::Client) -> Result<(), reqwest::Error> {
//! let policy = RetryPolicy::default();
//! let mut failures = 0;
//! loop {
//!     let response = client
//!         .get("https://api.example.com/games")
//!         .headers(build_request_headers(None))
//!         .send()
//!         .await?;
//!     if response.status().is_success() {
//!         break;
//!     }
//!     let status = response.status().as_u16();
//!     let hint = retry_after::from_headers(response.headers());
//!     if !policy.should_retry_status(status, failures) {
//!         break;
//!     }
//!     tokio::time::sleep(policy.retry_delay(failures, hint)).await;
//!     failures += 1;
//! }
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod capacity;
mod clock;
pub mod cooldown;
pub mod error;
pub mod headers;
pub mod retry_after;
#[cfg(test)]
pub mod testsupport;
