//! Error types shared by the HTTP and filesystem collaborators.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`LookupError`] failures.
pub type LookupResult<T> = Result<T, LookupError>;

/// Failures that can occur while talking to an external collaborator.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build HTTP client")]
    ClientBuilder {
        /// Underlying builder failure.
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent or timed out in transit.
    #[error("failed to send request to `{url}`")]
    RequestSend {
        /// Target URL.
        url: String,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The collaborator returned an unexpected status code.
    #[error("unexpected response status {status} for `{url}`")]
    RequestStatus {
        /// Target URL.
        url: String,
        /// Status the collaborator answered with.
        status: StatusCode,
    },
    /// Response payload could not be read or parsed.
    #[error("failed to decode response for `{url}`")]
    DecodeResponse {
        /// Target URL.
        url: String,
        /// Body or JSON decode failure.
        #[source]
        source: reqwest::Error,
    },
    /// The response body exceeds the configured size cap.
    #[error("response for `{url}` exceeds {limit} bytes")]
    TooLarge {
        /// Source that was being fetched.
        url: String,
        /// Configured cap in bytes.
        limit: usize,
    },
    /// The response body is empty.
    #[error("empty response for `{url}`")]
    Empty {
        /// Source that answered with nothing.
        url: String,
    },
    /// An icon identifier is not of the `prefix:name` form.
    #[error("invalid icon identifier `{id}`")]
    InvalidIconId {
        /// Identifier as received.
        id: String,
    },
    /// A local source is disabled, outside the allowed root, or not a regular file.
    #[error("local logo source `{path}` is not allowed")]
    LocalSourceRejected {
        /// Path as supplied by the caller.
        path: String,
    },
    /// The fetch did not finish within its time budget.
    #[error("fetching `{url}` timed out")]
    Timeout {
        /// Source that was being fetched.
        url: String,
    },
    /// A local file could not be read.
    #[error("failed to read `{path}`")]
    Io {
        /// Path as supplied by the caller.
        path: String,
        /// Filesystem failure.
        #[source]
        source: std::io::Error,
    },
}
