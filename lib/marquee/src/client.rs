//! The API client and its builder.
//!
//! [`ApiClient`] pairs a base URL with a transport and a frozen middleware
//! [`Pipeline`]. It is built once, shared as `Arc<ApiClient>`, and every page
//! loader goes through it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use serde::de::DeserializeOwned;
use tracing::{Instrument, Level, span};
use url::Url;

use crate::api::MediaApi;
use crate::config::base_url_from_env;
use crate::middleware::{
    CookieLogout, LoggingMiddleware, Middleware, MiddlewareContext, SessionGuard,
    SessionTerminator,
};
use crate::navigation::Navigator;
use crate::pipeline::Pipeline;
use crate::{
    ClientConfig, CookieJar, Fetch, FetchResponse, HttpClient, HyperClient, Method, Params,
    PathTemplate, Request, Result,
};

type MiddlewareFactory = Box<dyn FnOnce(&Weak<ApiClient>) -> Arc<dyn Middleware> + Send>;

/// Typed client for the media-manager API.
///
/// # Example
///
/// ```ignore
/// use marquee::{ApiClient, api::paths};
///
/// let client = ApiClient::builder_from_env()?
///     .with_logging()
///     .with_session_guard(navigator)
///     .build();
///
/// let me = client.get::<User>(paths::USERS_ME, Params::new()).await?;
/// ```
pub struct ApiClient {
    base_url: Url,
    pipeline: Pipeline,
    transport: Fetch,
    cookies: CookieJar,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Start building a client for `base_url`.
    #[must_use]
    pub fn builder(base_url: Url) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// Start building a client for the URL in `PUBLIC_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or not a valid URL.
    pub fn builder_from_env() -> Result<ApiClientBuilder> {
        base_url_from_env().map(ApiClientBuilder::new)
    }

    /// The configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The interceptors, in registration order.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The default transport.
    #[must_use]
    pub const fn transport(&self) -> &Fetch {
        &self.transport
    }

    /// The cookie jar holding the session.
    #[must_use]
    pub const fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Typed media-manager endpoints.
    #[must_use]
    pub fn api(&self) -> MediaApi<'_> {
        MediaApi::new(self)
    }

    /// Typed endpoints sent through `fetch` instead of the client transport.
    #[must_use]
    pub fn api_with(&self, fetch: Fetch) -> MediaApi<'_> {
        MediaApi::with_fetch(self, fetch)
    }

    /// Absolute URL for an already-resolved path.
    fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Send a request through the pipeline and decode the result triple.
    ///
    /// Path, query and body problems are reported before any interceptor
    /// runs. A transport failure goes through the error phase and the
    /// terminal error is returned; any HTTP status yields a triple.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built, the transport fails,
    /// or a body cannot be decoded.
    pub async fn send<T, E>(
        &self,
        method: Method,
        template: PathTemplate,
        params: Params,
    ) -> Result<FetchResponse<T, E>>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let ctx = MiddlewareContext::new(id, method, template);
        let span = span!(Level::DEBUG, "api_call", id, %method, template = template.as_str());

        async move {
            let (request, fetch) = self.prepare(method, template, params)?;
            let request = self.pipeline.on_request(&ctx, request).await;

            let transport = fetch.as_ref().unwrap_or(&self.transport);
            match transport.call(request.clone()).await {
                Ok(response) => {
                    let response = self.pipeline.on_response(&ctx, &request, response).await;
                    FetchResponse::decode(method, response)
                }
                Err(err) => Err(self.pipeline.on_error(&ctx, &request, err).await),
            }
        }
        .instrument(span)
        .await
    }

    fn prepare(
        &self,
        method: Method,
        template: PathTemplate,
        params: Params,
    ) -> Result<(Request, Option<Fetch>)> {
        let query = params.query_string();
        let Params {
            path,
            headers,
            body,
            fetch,
            ..
        } = params;

        let url = self.url_for(&template.resolve(&path)?)?;
        let mut builder = Request::builder(method, url)
            .header("Accept", "application/json")
            .headers(headers);
        if let Some(query) = query {
            builder = builder.query_string(&query);
        }
        if let Some(body) = body {
            builder = builder.header("Content-Type", "application/json").body(body);
        }

        Ok((builder.build(), fetch))
    }

    /// `GET` shorthand for [`ApiClient::send`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        template: PathTemplate,
        params: Params,
    ) -> Result<FetchResponse<T>> {
        self.send(Method::Get, template, params).await
    }

    /// `POST` shorthand for [`ApiClient::send`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post<T: DeserializeOwned>(
        &self,
        template: PathTemplate,
        params: Params,
    ) -> Result<FetchResponse<T>> {
        self.send(Method::Post, template, params).await
    }

    /// `PUT` shorthand for [`ApiClient::send`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn put<T: DeserializeOwned>(
        &self,
        template: PathTemplate,
        params: Params,
    ) -> Result<FetchResponse<T>> {
        self.send(Method::Put, template, params).await
    }

    /// `PATCH` shorthand for [`ApiClient::send`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn patch<T: DeserializeOwned>(
        &self,
        template: PathTemplate,
        params: Params,
    ) -> Result<FetchResponse<T>> {
        self.send(Method::Patch, template, params).await
    }

    /// `DELETE` shorthand for [`ApiClient::send`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        template: PathTemplate,
        params: Params,
    ) -> Result<FetchResponse<T>> {
        self.send(Method::Delete, template, params).await
    }
}

/// Builder for [`ApiClient`].
///
/// Interceptors run in the order they are added here; the list is frozen by
/// [`ApiClientBuilder::build`].
pub struct ApiClientBuilder {
    base_url: Url,
    config: ClientConfig,
    cookies: CookieJar,
    transport: Option<Fetch>,
    middlewares: Vec<MiddlewareFactory>,
}

impl std::fmt::Debug for ApiClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl ApiClientBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            config: ClientConfig::default(),
            cookies: CookieJar::new(),
            transport: None,
            middlewares: Vec::new(),
        }
    }

    /// Transport settings for the default [`HyperClient`].
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing cookie jar with the default transport.
    #[must_use]
    pub fn cookies(mut self, cookies: CookieJar) -> Self {
        self.cookies = cookies;
        self
    }

    /// Replace the default transport.
    ///
    /// The builder's cookie jar is still what [`CookieLogout`] clears.
    #[must_use]
    pub fn transport(mut self, fetch: Fetch) -> Self {
        self.transport = Some(fetch);
        self
    }

    /// Replace the default transport with any [`HttpClient`].
    #[must_use]
    pub fn http_client<C>(self, client: C) -> Self
    where
        C: HttpClient + Clone + 'static,
    {
        self.transport(Fetch::from_client(client))
    }

    /// Append an interceptor.
    #[must_use]
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        let middleware: Arc<dyn Middleware> = Arc::new(middleware);
        self.middlewares
            .push(Box::new(move |_: &Weak<ApiClient>| middleware));
        self
    }

    /// Append the [`LoggingMiddleware`].
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.with(LoggingMiddleware::new())
    }

    /// Append the [`LoggingMiddleware`], also logging request headers.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.with(LoggingMiddleware::debug())
    }

    /// Append a [`SessionGuard`] that logs out through this client and
    /// navigates to the login page.
    #[must_use]
    pub fn with_session_guard(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.middlewares.push(Box::new(
            move |client: &Weak<ApiClient>| -> Arc<dyn Middleware> {
                let logout = CookieLogout::new(client.clone(), navigator);
                Arc::new(SessionGuard::new(logout))
            },
        ));
        self
    }

    /// Append a [`SessionGuard`] with a custom terminator.
    #[must_use]
    pub fn with_session_terminator(self, terminator: impl SessionTerminator) -> Self {
        self.with(SessionGuard::new(terminator))
    }

    /// Freeze the pipeline and build the client.
    #[must_use]
    pub fn build(self) -> Arc<ApiClient> {
        let Self {
            base_url,
            config,
            cookies,
            transport,
            middlewares,
        } = self;

        let transport = transport.unwrap_or_else(|| {
            Fetch::from_client(HyperClient::with_config(config, cookies.clone()))
        });

        Arc::new_cyclic(|client| ApiClient {
            base_url,
            pipeline: Pipeline::new(middlewares.into_iter().map(|make| make(client)).collect()),
            transport,
            cookies,
            next_id: AtomicU64::new(1),
        })
    }
}
