//! Retry and backoff policy for archive fetches.
//!
//! The fetcher itself is stateless and retry-free; retry is caller policy.
//! This module holds the shared pieces: error classification (timeouts,
//! throttling, connection failures) and exponential backoff decisions, plus
//! a generic retry loop the CLI wraps around the fetch source.

mod classify;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
