//! Transport trait.
//!
//! [`HttpClient`] is the lowest layer: it moves one [`Request`] over the wire
//! and returns the [`Response`], without any middleware. The `marquee` crate
//! provides a hyper-based implementation and wraps transports in the
//! middleware pipeline.

use std::future::Future;

use crate::{Request, Response, Result};

/// Core HTTP transport trait.
///
/// Implement this to plug a different transport (or a test double) under the
/// API client.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Any status code is a successful execution; only failures to get a
    /// response at all are errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}
