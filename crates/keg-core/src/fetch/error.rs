//! Fetch-stage error types.

use thiserror::Error;

/// Failure to obtain a usable archive from a recipe's source URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },
    /// The archive fetched (and digest-verified) but could not be unpacked.
    #[error("archive: {0}")]
    Archive(#[from] super::ArchiveError),
}

/// The fetched archive does not hash to the recipe's pinned digest.
/// Always fatal: a mismatched artifact must never be trusted or retried.
#[derive(Debug, Error)]
#[error("digest mismatch: expected sha256 {expected}, got {actual}")]
pub struct IntegrityError {
    pub expected: String,
    pub actual: String,
}
