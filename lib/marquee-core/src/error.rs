//! Error types for marquee.
//!
//! Transport failures (`Connection`, `Tls`, `Timeout`) are what a transport
//! reports; once they have gone through the error phase of the middleware
//! pipeline they usually come back wrapped in [`Error::FetchFailed`], which
//! keeps the original as its cause.

use derive_more::{Display, Error, From};

/// Main error type for marquee operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A transport failure normalized by the error phase of the pipeline.
    #[display("fetch failed: {cause}")]
    #[from(skip)]
    FetchFailed {
        /// The original error.
        #[error(source)]
        cause: Box<Error>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// A `{name}` placeholder of the path template had no value.
    #[display("missing path parameter `{_0}`")]
    #[from(skip)]
    MissingPathParam(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "seasons[0].episodes").
        path: String,
        /// Error message.
        message: String,
    },

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error as a failed fetch.
    #[must_use]
    pub fn fetch_failed(cause: Self) -> Self {
        Self::FetchFailed {
            cause: Box::new(cause),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The wrapped error, if this is a [`Error::FetchFailed`].
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        match self {
            Self::FetchFailed { cause } => Some(cause.as_ref()),
            _ => None,
        }
    }

    /// The innermost error, following [`Error::FetchFailed`] wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }

    /// Returns `true` if this error (or its root cause) comes from the transport.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Connection(_) | Self::Tls(_) | Self::Timeout
        )
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
