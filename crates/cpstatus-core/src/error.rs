//! Error types for cpstatus-core

use thiserror::Error;

/// Result type alias for cpstatus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cpstatus operations
#[derive(Debug, Error)]
pub enum Error {
    /// A required trigger event field was missing or empty
    #[error("missing event param {field}")]
    Validation {
        /// Wire name of the field (`execution-id`, `github-token`, `pipeline`)
        field: &'static str,
    },

    /// Pipeline execution lookup failed or returned unusable data
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Source revision URL could not be turned into `owner/repo`
    #[error("failed to extract repo name from artifact url {locator}: {reason}")]
    Resolution {
        /// Locator as received from the pipeline
        locator: String,
        /// Why resolution failed
        reason: ResolveError,
    },

    /// Status report was not accepted by GitHub
    #[error(transparent)]
    Notification(#[from] NotifyError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(String),

    /// Runtime error (Tokio, threading, etc.)
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Failures of the pipeline execution lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The CodePipeline API call itself failed; the SDK error, verbatim
    #[error("{0}")]
    Lookup(String),

    /// The API answered without a pipeline execution body
    #[error("empty pipeline execution response")]
    EmptyResponse,

    /// No artifact revision named `SourceArtifact`
    #[error("missing SourceArtifact")]
    MissingSourceArtifact,
}

/// Reasons a revision locator cannot be resolved to a repository
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Locator is not a parseable absolute URL
    #[error("malformed URL: {0}")]
    MalformedLocator(String),

    /// Source host URL without both owner and repo path segments
    #[error("too few path components")]
    TooFewPathComponents,

    /// Console URL whose path is not the connection redirect page
    #[error("unexpected URL path: {0}")]
    UnexpectedPath(String),

    /// Connection redirect URL without a usable `FullRepositoryId`
    #[error("missing FullRepositoryId URL param")]
    MissingRepositoryParam,

    /// Extracted identifier is not of the form `owner/repo`
    #[error("invalid repository id {0:?}")]
    InvalidRepositoryId(String),

    /// Host is neither the source host nor the console host
    #[error("unknown hostname {0}")]
    UnknownHost(String),
}

/// Failures of the GitHub status POST
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// GitHub answered with something other than 201 Created
    #[error("unexpected response from GitHub: {status} body: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// Request never got a response
    #[error("GitHub request failed: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Transport(err.without_url().to_string())
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Missing trigger field
    Validation,
    /// Execution lookup failure
    Upstream,
    /// Locator resolution failure
    Resolution,
    /// Status POST failure
    Notification,
    /// Configuration error
    Config,
    /// I/O operation error
    Io,
    /// JSON error
    Json,
    /// Runtime error
    Runtime,
}

impl Error {
    /// Get the error kind, a `Copy` enum.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Upstream(_) => ErrorKind::Upstream,
            Error::Resolution { .. } => ErrorKind::Resolution,
            Error::Notification(_) => ErrorKind::Notification,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
            Error::Json(_) => ErrorKind::Json,
            Error::Runtime(_) => ErrorKind::Runtime,
        }
    }

    /// HTTP status GitHub answered with, if this is a rejected status report.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Notification(NotifyError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
