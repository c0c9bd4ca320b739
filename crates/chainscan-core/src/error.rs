//! Error types for the dispatch path.

use thiserror::Error;

/// Failure categories an API envelope can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upstream throttled the request.
    RateLimited,
    /// The upstream rejected the API key.
    InvalidKey,
    /// Any other API-level failure.
    Api,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate-limited"),
            Self::InvalidKey => write!(f, "invalid-key"),
            Self::Api => write!(f, "api"),
        }
    }
}

/// Errors an [`HttpTransport`](crate::HttpTransport) implementation can return.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS or protocol failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The transport gave up waiting for the response.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },
}

/// Errors returned to callers of the client.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The upstream reported throttling.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The upstream rejected the API key.
    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    /// Any other API-level failure, including transport errors and
    /// unparsable responses.
    #[error("API error: {0}")]
    Api(String),

    /// The operation was cancelled through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// The HTTP call exceeded the configured request timeout.
    #[error("Request timed out after {ms}ms")]
    TimedOut { ms: u64 },

    /// Arguments rejected before any request was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The client could not be constructed from its configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    /// Build the error matching an envelope failure kind.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::RateLimited => Self::RateLimited(message),
            ErrorKind::InvalidKey => Self::InvalidKey(message),
            ErrorKind::Api => Self::Api(message),
        }
    }

    /// The API-level kind, or `None` for aborted and caller-side errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::RateLimited(_) => Some(ErrorKind::RateLimited),
            Self::InvalidKey(_) => Some(ErrorKind::InvalidKey),
            Self::Api(_) => Some(ErrorKind::Api),
            _ => None,
        }
    }

    /// Returns `true` if the operation was aborted (cancelled or timed out)
    /// rather than answered by the API.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::TimedOut { .. })
    }

    /// Upstream message text carried by API-level errors.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::RateLimited(m) | Self::InvalidKey(m) | Self::Api(m) => Some(m),
            _ => None,
        }
    }
}

impl From<TransportError> for ScanError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { ms } => Self::TimedOut { ms },
            TransportError::Http(msg) => Self::Api(format!("HTTP request failed: {msg}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
