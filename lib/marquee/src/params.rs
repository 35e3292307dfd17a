//! Per-call request parameters.

use bytes::Bytes;

use crate::{Fetch, Result, to_json, to_query_string};

/// Path, query, body and transport for one [`ApiClient::send`] call.
///
/// [`ApiClient::send`]: crate::ApiClient::send
///
/// # Example
///
/// ```ignore
/// let params = Params::new()
///     .path("show_id", show_id)
///     .query(&[("scopes", "openid"), ("scopes", "email")])?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub(crate) path: Vec<(String, String)>,
    pub(crate) query: Vec<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<Bytes>,
    pub(crate) fetch: Option<Fetch>,
}

impl Params {
    /// No parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for the `{name}` placeholder of the path template.
    #[must_use]
    pub fn path(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path.push((name.into(), value.to_string()));
        self
    }

    /// Append query parameters. Sequences are exploded into repeated keys.
    ///
    /// # Errors
    ///
    /// Returns an error if `query` is not a flat map or struct.
    pub fn query<T: serde::Serialize + ?Sized>(mut self, query: &T) -> Result<Self> {
        let encoded = to_query_string(query)?;
        if !encoded.is_empty() {
            self.query.push(encoded);
        }
        Ok(self)
    }

    /// Add a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Send `body` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(to_json(body)?);
        Ok(self)
    }

    /// Use `fetch` instead of the client transport for this call.
    #[must_use]
    pub fn fetch(mut self, fetch: Fetch) -> Self {
        self.fetch = Some(fetch);
        self
    }

    /// The encoded query string, if any.
    #[must_use]
    pub fn query_string(&self) -> Option<String> {
        (!self.query.is_empty()).then(|| self.query.join("&"))
    }
}
