//! Ordered interceptor chain.

use std::sync::Arc;

use tracing::trace;

use crate::middleware::{Middleware, MiddlewareContext};
use crate::{Error, Request, Response};

/// Interceptors in registration order.
///
/// The list is fixed when the client is built. Each phase walks it front to
/// back and feeds every interceptor the previous one's output.
#[derive(Clone, Default)]
pub struct Pipeline {
    middlewares: Arc<[Arc<dyn Middleware>]>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Pipeline {
    /// Freeze a list of interceptors.
    #[must_use]
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            middlewares: middlewares.into(),
        }
    }

    /// Interceptor names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.middlewares.iter().map(|middleware| middleware.name())
    }

    /// Number of interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns `true` if no interceptor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run every `on_request` hook.
    pub async fn on_request(&self, ctx: &MiddlewareContext, mut request: Request) -> Request {
        for middleware in self.middlewares.iter() {
            trace!(id = ctx.id(), middleware = middleware.name(), "request phase");
            request = middleware.on_request(ctx, request).await;
        }
        request
    }

    /// Run every `on_response` hook.
    pub async fn on_response(
        &self,
        ctx: &MiddlewareContext,
        request: &Request,
        mut response: Response,
    ) -> Response {
        for middleware in self.middlewares.iter() {
            trace!(id = ctx.id(), middleware = middleware.name(), "response phase");
            response = middleware.on_response(ctx, request, response).await;
        }
        response
    }

    /// Run every `on_error` hook and return the terminal error.
    pub async fn on_error(
        &self,
        ctx: &MiddlewareContext,
        request: &Request,
        mut error: Error,
    ) -> Error {
        for middleware in self.middlewares.iter() {
            trace!(id = ctx.id(), middleware = middleware.name(), "error phase");
            error = middleware.on_error(ctx, request, error).await;
        }
        error
    }
}
