use std::fmt;

use thiserror::Error;

/// Coarse failure class of one adapter attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Timeout, refused connection, TLS failure.
    Transport,
    /// Non-200 status or an error shell served in place of content.
    Rejection,
    /// Body that is not the JSON or markup it claims to be.
    Decode,
    /// Decoded payload missing required fields or failing identity checks.
    Validation,
}

impl FailureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Rejection => "rejection",
            Self::Decode => "decode",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single source adapter. Never escapes the strategy chain.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("error page served by {url}: {reason}")]
    ErrorPage { url: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("validation failed for product {id}: {reason}")]
    Validation { id: String, reason: String },

    #[error("no storage candidate returned a card for product {id} ({attempted} tried)")]
    CandidatesExhausted { id: String, attempted: usize },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http(_) => FailureKind::Transport,
            Self::UnexpectedStatus { .. } | Self::ErrorPage { .. } => FailureKind::Rejection,
            Self::Deserialize { .. } => FailureKind::Decode,
            Self::Validation { .. }
            | Self::CandidatesExhausted { .. }
            | Self::InvalidUrl { .. } => FailureKind::Validation,
        }
    }
}

/// Input rejected at the batch boundary before any identifier is resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("batch contains no identifiers")]
    Empty,

    #[error("batch of {len} identifiers exceeds the maximum of {max}")]
    TooLarge { len: usize, max: usize },

    #[error("identifier at position {index} is not numeric: \"{value}\"")]
    InvalidId { index: usize, value: String },
}
