//! The `{data, error, response}` triple returned for every completed call.

use serde::de::DeserializeOwned;

use crate::{Method, Response, Result};

/// Outcome of a call that reached the backend.
///
/// At most one of `data` / `error` is set:
/// - 2xx with a body: `data` holds the decoded payload;
/// - any other status with a body: `error` holds the decoded error payload;
/// - 204, `HEAD`, or an empty body: neither is set.
///
/// The raw [`Response`] is always kept so callers can look at the status.
#[derive(Debug, Clone)]
pub struct FetchResponse<T, E = serde_json::Value> {
    /// Decoded success payload.
    pub data: Option<T>,
    /// Decoded error payload reported by the backend.
    pub error: Option<E>,
    /// The response as it came out of the middleware pipeline.
    pub response: Response,
}

impl<T, E> FetchResponse<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    /// Decode a response to a request sent with `method`.
    ///
    /// An error body that is not JSON is offered to `E` as a JSON string, so
    /// `serde_json::Value` or `String` error types still receive the raw text.
    /// An error body that fits `E` neither way leaves `error` unset; the
    /// status and raw body stay available through `response`.
    ///
    /// # Errors
    ///
    /// Returns an error if a 2xx body does not decode into `T`.
    pub fn decode(method: Method, response: Response) -> Result<Self> {
        if method.has_empty_response() || response.has_empty_body() || response.body().is_empty()
        {
            return Ok(Self {
                data: None,
                error: None,
                response,
            });
        }

        if response.is_ok() {
            let data = response.json()?;
            return Ok(Self {
                data: Some(data),
                error: None,
                response,
            });
        }

        let error = response.json::<E>().ok().or_else(|| {
            serde_json::from_value(serde_json::Value::String(response.text())).ok()
        });
        Ok(Self {
            data: None,
            error,
            response,
        })
    }
}

impl<T, E> FetchResponse<T, E> {
    /// HTTP status code of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.response.status()
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.response.is_ok()
    }

    /// Split into `Ok(data)` or `Err(error)`, dropping the raw response.
    ///
    /// A 2xx without a body yields `Ok(None)`; a failure without a decodable
    /// body yields `Err(None)`.
    pub fn into_result(self) -> std::result::Result<Option<T>, Option<E>> {
        if self.response.is_ok() {
            Ok(self.data)
        } else {
            Err(self.error)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};
    use bytes::Bytes;

    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct User {
        email: String,
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Detail {
        detail: String,
    }

    fn response(status: u16, body: &'static str) -> Response {
        let_assert!(Ok(url) = url::Url::parse("https://media.example.com/api/v1/users/me"));
        Response::new(url, status, HashMap::new(), Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn success_body_is_data() {
        let_assert!(
            Ok(result) = FetchResponse::<User, Detail>::decode(
                Method::Get,
                response(200, r#"{"email":"ada@example.com"}"#)
            )
        );

        check!(result.is_ok());
        check!(
            result.data
                == Some(User {
                    email: "ada@example.com".to_string()
                })
        );
        check!(result.error.is_none());
    }

    #[test]
    fn error_body_is_error() {
        let_assert!(
            Ok(result) = FetchResponse::<User, Detail>::decode(
                Method::Get,
                response(401, r#"{"detail":"Unauthorized"}"#)
            )
        );

        check!(result.status() == 401);
        check!(result.data.is_none());
        check!(
            result.error
                == Some(Detail {
                    detail: "Unauthorized".to_string()
                })
        );
    }

    #[test]
    fn text_error_body_becomes_json_string() {
        let_assert!(
            Ok(result) = FetchResponse::<User>::decode(Method::Get, response(502, "Bad Gateway"))
        );

        check!(result.error == Some(serde_json::Value::String("Bad Gateway".to_string())));
    }

    #[test]
    fn unexpected_error_shape_keeps_the_response() {
        let_assert!(
            Ok(result) = FetchResponse::<User, Detail>::decode(
                Method::Get,
                response(422, r#"{"errors":[{"loc":["body"],"msg":"field required"}]}"#)
            )
        );

        check!(result.status() == 422);
        check!(result.data.is_none());
        check!(result.error.is_none());
        check!(result.response.text().contains("field required"));
    }

    #[test]
    fn empty_bodies_carry_neither() {
        let_assert!(Ok(result) = FetchResponse::<User>::decode(Method::Post, response(204, "")));
        check!(result.data.is_none());
        check!(result.error.is_none());

        let_assert!(
            Ok(result) = FetchResponse::<User>::decode(Method::Head, response(200, "ignored"))
        );
        check!(result.data.is_none());
    }

    #[test]
    fn malformed_success_body_is_an_error() {
        let result = FetchResponse::<User>::decode(Method::Get, response(200, r#"{"id":1}"#));

        let_assert!(Err(crate::Error::JsonDeserialization { .. }) = result);
    }

    #[test]
    fn into_result_splits_on_status() {
        let_assert!(
            Ok(result) = FetchResponse::<User, Detail>::decode(
                Method::Get,
                response(403, r#"{"detail":"Forbidden"}"#)
            )
        );

        let_assert!(Err(Some(detail)) = result.into_result());
        check!(detail.detail == "Forbidden");
    }
}
