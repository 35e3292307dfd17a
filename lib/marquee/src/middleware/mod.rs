//! Middleware (interceptors) for the API client.
//!
//! A [`Middleware`] is a named participant with up to three hooks. Every hook
//! has a passthrough default, so an interceptor only overrides the phases it
//! cares about.
//!
//! Unlike tower layers, interceptors are not nested: the pipeline runs them in
//! registration order in every phase.
//!
//! | Phase | Runs when | Hook |
//! |-------|-----------|------|
//! | request | before dispatch | [`Middleware::on_request`] |
//! | response | the transport returned a response (any status) | [`Middleware::on_response`] |
//! | error | the transport failed | [`Middleware::on_error`] |
//!
//! # Available Middleware
//!
//! - [`LoggingMiddleware`] - Logs requests and outcomes with `tracing`, and
//!   normalizes transport errors into [`Error::FetchFailed`]
//! - [`SessionGuard`] - Tears the session down on 401 and reports 403
//!
//! # Example
//!
//! ```ignore
//! use marquee::ApiClient;
//!
//! let client = ApiClient::builder(base_url)
//!     .with_logging()
//!     .with_session_guard(navigator)
//!     .build();
//! ```

mod logging;
mod session_guard;

pub use logging::{LogLevel, LoggingMiddleware};
pub use session_guard::{CookieLogout, LOGOUT_SUFFIX, SessionGuard, SessionTerminator};

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};

use crate::{Error, Method, PathTemplate, Request, Response};

/// Per-call information shared by every hook of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiddlewareContext {
    id: u64,
    method: Method,
    template: PathTemplate,
}

impl MiddlewareContext {
    /// Create a context for a request.
    #[must_use]
    pub const fn new(id: u64, method: Method, template: PathTemplate) -> Self {
        Self {
            id,
            method,
            template,
        }
    }

    /// Identifier of the call, unique per client.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Method the caller asked for.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Path template before parameter substitution.
    #[must_use]
    pub const fn template(&self) -> PathTemplate {
        self.template
    }
}

/// An interceptor in the request pipeline.
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Observe or transform the outgoing request.
    ///
    /// The returned request is what the next interceptor (or the transport)
    /// receives.
    fn on_request<'a>(
        &'a self,
        _ctx: &'a MiddlewareContext,
        request: Request,
    ) -> BoxFuture<'a, Request> {
        future::ready(request).boxed()
    }

    /// Observe or substitute the response.
    ///
    /// `request` is the request that was actually sent.
    fn on_response<'a>(
        &'a self,
        _ctx: &'a MiddlewareContext,
        _request: &'a Request,
        response: Response,
    ) -> BoxFuture<'a, Response> {
        future::ready(response).boxed()
    }

    /// Observe or replace a transport error.
    ///
    /// The error returned by the last interceptor is the one the caller gets.
    fn on_error<'a>(
        &'a self,
        _ctx: &'a MiddlewareContext,
        _request: &'a Request,
        error: Error,
    ) -> BoxFuture<'a, Error> {
        future::ready(error).boxed()
    }
}
