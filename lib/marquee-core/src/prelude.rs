//! Prelude module for convenient imports.
//!
//! ```ignore
//! use marquee_core::prelude::*;
//! ```

pub use crate::{
    Credentials, Error, FetchResponse, HttpClient, Method, PathTemplate, Request, RequestBuilder,
    Response, Result, from_json, to_json, to_query_string,
};
