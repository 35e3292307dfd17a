//! Core types for the marquee media-manager API client.
//!
//! This crate provides the transport-independent building blocks:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - immutable HTTP requests
//! - [`Response`] - HTTP response with the originating URL
//! - [`FetchResponse`] - the `{data, error, response}` result triple
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - Transport trait
//! - [`PathTemplate`] - `{name}` path templates with percent-encoded substitution

mod body;
mod client;
mod error;
mod method;
mod path_template;
pub mod prelude;
mod request;
mod response;
mod result;

pub use body::{from_json, to_json, to_query_string};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use method::Method;
pub use path_template::PathTemplate;
pub use request::{Credentials, Request, RequestBuilder};
pub use response::Response;
pub use result::FetchResponse;
