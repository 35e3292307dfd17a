//! Prelude module for convenient imports.
//!
//! ```ignore
//! use marquee::prelude::*;
//! ```

pub use crate::api::{MediaApi, User, paths};
pub use crate::loaders::{DashboardLoader, LoadContext, LoadError, Loader, LoginLoader};
pub use crate::middleware::{LoggingMiddleware, Middleware, MiddlewareContext, SessionGuard};
pub use crate::navigation::{LOGIN_PATH, Navigator, Redirect, RedirectSignal};
pub use crate::{
    ApiClient, ClientConfig, CookieJar, Error, Fetch, FetchResponse, HyperClient, Method, Params,
    PathTemplate, Request, Response, Result,
};
pub use serde::{Deserialize, Serialize};
