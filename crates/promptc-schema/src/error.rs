//! Registry error types.

use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while fetching or decoding the schema registry.
///
/// Every variant means the registry could not be obtained; none of them is
/// retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The registry endpoint could not be reached.
    #[cfg(feature = "reqwest")]
    #[error("registry request to {url} failed: {source}")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: ::reqwest::Error,
    },

    /// The registry endpoint answered with a non-success status.
    #[error("registry at {url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The registry payload is not valid JSON.
    #[error("failed to decode registry payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The registry payload is JSON but not a class map.
    #[error("malformed registry payload: {0}")]
    Malformed(String),

    /// A saved registry payload could not be read.
    #[error("failed to read registry snapshot {path}: {source}")]
    Io {
        /// Snapshot path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The base URL could not be turned into a registry endpoint.
    #[error("invalid registry url {url}: {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        message: String,
    },
}

impl Error {
    /// Creates a new malformed payload error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Returns the HTTP status code, if the registry answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
