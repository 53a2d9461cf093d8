use std::io;

use relkit_core::ErrorCode;

/// Failure of a single fetch.
///
/// Batch loading returns the first of these unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the server answered with an error status.
    #[error("E2001: request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The response body could not be read.
    #[error("E2001: failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: io::Error,
    },

    /// The response body was not valid JSON.
    #[error("E2001: failed to decode JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: io::Error,
    },

    /// No worker thread could be started for the request.
    #[error("E2001: failed to start fetch for {url}: {source}")]
    Spawn {
        url: String,
        #[source]
        source: io::Error,
    },

    /// The worker went away without reporting a result.
    #[error("E2001: fetch for {url} was canceled")]
    Canceled { url: String },
}

impl TransportError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::TransportFailed
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    /// The resource this error belongs to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. }
            | Self::Body { url, .. }
            | Self::Decode { url, .. }
            | Self::Spawn { url, .. }
            | Self::Canceled { url } => url,
        }
    }
}
