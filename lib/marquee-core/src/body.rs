//! Body and query serialization utilities.

use bytes::Bytes;

use crate::Result;

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use marquee_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct CreateSeasonRequest { season_id: String }
///
/// let request = CreateSeasonRequest { season_id: "s1".to_string() };
/// let bytes = to_json(&request).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"season_id":"s1"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to a query string.
///
/// Uses `serde_html_form`, so a `Vec<T>` field becomes repeated keys
/// (e.g., `scopes=openid&scopes=email`).
///
/// # Errors
///
/// Returns an error if query serialization fails.
///
/// # Example
///
/// ```
/// use marquee_core::to_query_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Authorize { scopes: Vec<&'static str> }
///
/// let query = to_query_string(&Authorize { scopes: vec!["openid", "email"] }).expect("serialize");
/// assert_eq!(query, "scopes=openid&scopes=email");
/// ```
pub fn to_query_string<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the field that failed
/// (e.g., `seasons[0].number`).
///
/// # Errors
///
/// Returns an error if JSON deserialization fails.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
