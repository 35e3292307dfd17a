//! Data-access layer of the media-manager frontend.
//!
//! Every page loader talks to the backend through one shared [`ApiClient`]:
//! a typed HTTP client wrapped in an ordered middleware pipeline. The stock
//! interceptors log every call and keep the client consistent with the
//! server-side session (a 401 logs out and navigates to the login page).
//!
//! # Example
//!
//! ```ignore
//! use marquee::prelude::*;
//!
//! let client = ApiClient::builder_from_env()?
//!     .with_logging()
//!     .with_session_guard(navigator)
//!     .build();
//!
//! let me = client.api().me().await?;
//! if let Some(user) = me.data {
//!     println!("signed in as {}", user.email);
//! }
//! ```

pub mod api;
mod client;
pub mod config;
mod fetch;
mod jar;
pub mod loaders;
pub mod middleware;
pub mod navigation;
mod params;
mod pipeline;
pub mod prelude;
mod transport;

pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use fetch::{BoxFetchService, Fetch, FetchFuture};
pub use jar::CookieJar;
pub use params::Params;
pub use pipeline::Pipeline;
pub use transport::HyperClient;

// Re-export core types
pub use marquee_core::{
    Credentials, Error, FetchResponse, HttpClient, Method, PathTemplate, Request, RequestBuilder,
    Response, Result, from_json, to_json, to_query_string,
};

// Re-export tower for custom transports
pub use tower;
pub use url;
