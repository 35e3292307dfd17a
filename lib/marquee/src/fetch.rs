//! Type-erased transport handle.
//!
//! [`Fetch`] is what the pipeline actually calls to move a request over the
//! wire. The client holds a default one; a caller running in a different
//! context (e.g. a server-side loader with its own cookie-bound transport) can
//! pass another one for a single call.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tower::ServiceExt;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::{Error, HttpClient, Request, Response, Result};

/// Boxed transport service.
pub type BoxFetchService = BoxCloneService<Request, Response, Error>;

/// Future returned by [`Fetch::call`].
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

/// Cloneable, thread-safe transport handle.
///
/// `BoxCloneService` is not `Sync`, so it sits behind a mutex that is only
/// held long enough to clone the service.
#[derive(Clone)]
pub struct Fetch {
    inner: Arc<Mutex<BoxFetchService>>,
}

impl std::fmt::Debug for Fetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetch").finish_non_exhaustive()
    }
}

impl Fetch {
    /// Wrap a tower service.
    pub fn new<S>(service: S) -> Self
    where
        S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
        S::Future: Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(BoxCloneService::new(service))),
        }
    }

    /// Wrap any [`HttpClient`].
    pub fn from_client<C>(client: C) -> Self
    where
        C: HttpClient + Clone + 'static,
    {
        Self::from_fn(move |request| {
            let client = client.clone();
            async move { client.execute(request).await }
        })
    }

    /// Wrap an async function, handy for context-bound transports and tests.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let offline = Fetch::from_fn(|_request| async {
    ///     Err(marquee::Error::connection("connection refused"))
    /// });
    /// ```
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Result<Response>> + Send + 'static,
    {
        Self::new(tower::service_fn(f))
    }

    /// Send one request.
    pub fn call(&self, request: Request) -> FetchFuture {
        let service = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        Box::pin(service.oneshot(request))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};
    use bytes::Bytes;

    use super::*;
    use crate::Method;

    fn request() -> Request {
        let_assert!(Ok(url) = url::Url::parse("http://localhost:8000/api/v1/tv/shows"));
        Request::builder(Method::Get, url).build()
    }

    #[tokio::test]
    async fn from_fn_answers() {
        let fetch = Fetch::from_fn(|request: Request| async move {
            Ok(Response::new(
                request.url().clone(),
                200,
                HashMap::new(),
                Bytes::from_static(b"[]"),
            ))
        });

        let_assert!(Ok(response) = fetch.call(request()).await);
        check!(response.status() == 200);
        check!(response.url().path() == "/api/v1/tv/shows");
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let fetch = Fetch::from_fn(|_request: Request| async {
            Err(Error::connection("connection refused"))
        });

        let_assert!(Err(err) = fetch.call(request()).await);
        check!(err.is_connection());
    }
}
