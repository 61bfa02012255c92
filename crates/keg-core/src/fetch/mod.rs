//! Fetcher/Verifier: obtain a recipe's release archive and prove it matches
//! the pinned digest before anything touches the install target.
//!
//! [`ArtifactSource`] is the seam for dependency injection: production uses
//! the blocking-curl [`HttpSource`]; tests substitute an in-memory source.
//! The source itself is stateless and retry-free; [`RetryingSource`] layers
//! the retry policy on top for callers that want it.

mod archive;
mod error;
mod http;

pub use archive::{unpack, ArchiveContents, ArchiveError, ArchiveFile};
pub use error::{FetchError, IntegrityError};
pub use http::HttpSource;

use crate::checksum;
use crate::retry::{self, classify_curl_error, classify_http_status, ErrorKind, RetryPolicy};

/// Retrieves a release archive into a caller-owned buffer.
pub trait ArtifactSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Compare the archive's SHA-256 against the recipe's pinned digest.
/// Must pass before extraction or any install action runs.
pub fn verify_digest(data: &[u8], expected: &str) -> Result<(), IntegrityError> {
    let actual = checksum::sha256_bytes(data);
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(IntegrityError {
            expected: expected.to_ascii_lowercase(),
            actual,
        })
    }
}

/// Map a fetch error onto the retry classification. Anything that is not a
/// transient network condition is `Other` and fails immediately.
pub fn classify_fetch(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http { status, .. } => classify_http_status(*status),
        FetchError::Archive(_) => ErrorKind::Other,
    }
}

/// Decorator applying a retry policy to an inner source. The inner source
/// stays retry-free; only transient fetch failures are retried, and digest
/// mismatches never reach this path at all (they are raised after fetching).
pub struct RetryingSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> RetryingSource<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<S: ArtifactSource> ArtifactSource for RetryingSource<S> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        retry::run_with_retry(&self.policy, classify_fetch, || self.inner.fetch(url))
    }
}
