//! Request/response logging middleware.
//!
//! This middleware logs every request and its outcome using the `tracing`
//! crate, and normalizes transport failures into [`Error::FetchFailed`].

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use tracing::{debug, info, warn};

use super::{Middleware, MiddlewareContext};
use crate::{Error, Request, Response};

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Also log request headers.
    Debug,
    /// Log method, URL and status only.
    #[default]
    Info,
}

/// Logs request start, success and failure.
///
/// - request: one event with method and URL;
/// - response: `info` when the status is 2xx, `warn` otherwise;
/// - transport error: `warn`, then the error is wrapped so callers always get
///   [`Error::FetchFailed`] with the original as its cause.
///
/// # Example
///
/// ```ignore
/// use marquee::{ApiClient, middleware::LoggingMiddleware};
///
/// let client = ApiClient::builder(base_url)
///     .with(LoggingMiddleware::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware {
    level: LogLevel,
}

impl LoggingMiddleware {
    /// Create a logging middleware with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging middleware that also logs request headers.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Middleware for LoggingMiddleware {
    fn name(&self) -> &str {
        "logging"
    }

    fn on_request<'a>(
        &'a self,
        ctx: &'a MiddlewareContext,
        request: Request,
    ) -> BoxFuture<'a, Request> {
        let method = request.method();
        let url = request.url();
        match self.level {
            LogLevel::Debug => {
                debug!(
                    id = ctx.id(),
                    %method,
                    %url,
                    headers = ?request.headers(),
                    "requesting"
                );
            }
            LogLevel::Info => {
                info!(id = ctx.id(), %method, %url, "requesting");
            }
        }
        future::ready(request).boxed()
    }

    fn on_response<'a>(
        &'a self,
        ctx: &'a MiddlewareContext,
        request: &'a Request,
        response: Response,
    ) -> BoxFuture<'a, Response> {
        let url = request.url();
        let status = response.status();
        if response.is_ok() {
            info!(id = ctx.id(), %url, status, "request succeeded");
        } else {
            warn!(id = ctx.id(), %url, status, "request failed");
        }
        future::ready(response).boxed()
    }

    fn on_error<'a>(
        &'a self,
        ctx: &'a MiddlewareContext,
        request: &'a Request,
        error: Error,
    ) -> BoxFuture<'a, Error> {
        warn!(id = ctx.id(), url = %request.url(), error = %error, "fetch failed");
        future::ready(Error::fetch_failed(error)).boxed()
    }
}
