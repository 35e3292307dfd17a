//! Integration tests for the client pipeline against a mock backend.

mod common;

use std::sync::{Arc, Mutex};

use assert2::{check, let_assert};
use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use marquee::middleware::{Middleware, MiddlewareContext};
use marquee::{ApiClient, Error, Method, Params, PathTemplate, Request, Response};
use serde::Deserialize;
use tracing::Level;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{CaptureLayer, unreachable_url, url};

#[derive(Debug, Deserialize, PartialEq)]
struct ApiError {
    detail: String,
}

/// Appends its tag to `X-Trail` and records the order it ran in.
struct Trail {
    tag: &'static str,
    order: Arc<Mutex<Vec<String>>>,
}

impl Middleware for Trail {
    fn name(&self) -> &str {
        self.tag
    }

    fn on_request<'a>(
        &'a self,
        _ctx: &'a MiddlewareContext,
        request: Request,
    ) -> BoxFuture<'a, Request> {
        let trail = request
            .header("X-Trail")
            .map_or_else(|| self.tag.to_string(), |trail| format!("{trail},{}", self.tag));
        future::ready(request.into_builder().header("X-Trail", trail).build()).boxed()
    }

    fn on_response<'a>(
        &'a self,
        _ctx: &'a MiddlewareContext,
        _request: &'a Request,
        response: Response,
    ) -> BoxFuture<'a, Response> {
        if let Ok(mut order) = self.order.lock() {
            order.push(self.tag.to_string());
        }
        future::ready(response).boxed()
    }
}

#[tokio::test]
async fn interceptors_run_in_registration_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/shows"))
        .and(header("x-trail", "first,second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let order = Arc::new(Mutex::new(Vec::new()));
    let client = ApiClient::builder(url(&server.uri()))
        .with(Trail {
            tag: "first",
            order: Arc::clone(&order),
        })
        .with(Trail {
            tag: "second",
            order: Arc::clone(&order),
        })
        .build();

    let_assert!(Ok(response) = client.api().shows().await);

    check!(response.is_ok());
    check!(response.data == Some(vec![]));
    let order = order.lock().map(|o| o.clone()).unwrap_or_default();
    check!(order == ["first", "second"]);
}

#[tokio::test]
async fn result_triple_decoding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/seasons/ok"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"detail": "fine"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/seasons/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/seasons/broken"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/tv/seasons/gone"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = ApiClient::builder(url(&server.uri())).build();
    let season = PathTemplate::new("/api/v1/tv/seasons/{season_id}");

    let_assert!(
        Ok(ok) = client
            .send::<ApiError, ApiError>(Method::Get, season, Params::new().path("season_id", "ok"))
            .await
    );
    check!(ok.data == Some(ApiError { detail: "fine".to_string() }));
    check!(ok.error.is_none());

    let_assert!(
        Ok(missing) = client
            .send::<ApiError, ApiError>(
                Method::Get,
                season,
                Params::new().path("season_id", "missing"),
            )
            .await
    );
    check!(missing.data.is_none());
    check!(missing.error == Some(ApiError { detail: "Not found".to_string() }));
    check!(missing.status() == 404);

    let_assert!(
        Ok(broken) = client
            .get::<serde_json::Value>(season, Params::new().path("season_id", "broken"))
            .await
    );
    check!(broken.error == Some(serde_json::Value::String("Bad Gateway".to_string())));

    let_assert!(
        Ok(gone) = client
            .delete::<serde_json::Value>(season, Params::new().path("season_id", "gone"))
            .await
    );
    check!(gone.status() == 204);
    check!(gone.data.is_none());
    check!(gone.error.is_none());
}

#[tokio::test]
async fn query_and_json_body_reach_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/oauth/authorize"))
        .and(query_param("scopes", "openid"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "authorization_url": "https://idp.example.com/authorize"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tv/seasons/requests"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "season_id": "se1",
            "min_quality": 4,
            "wanted_quality": 2
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::builder(url(&server.uri())).build();

    let_assert!(Ok(authorize) = client.api().oauth_authorize(&marquee::api::OAUTH_SCOPES).await);
    let_assert!(Some(authorization) = authorize.data);
    check!(authorization.authorization_url == "https://idp.example.com/authorize");

    let_assert!(
        Ok(params) = Params::new().json(&serde_json::json!({
            "season_id": "se1",
            "min_quality": 4,
            "wanted_quality": 2,
        }))
    );
    let_assert!(
        Ok(created) = client
            .post::<serde_json::Value>(marquee::api::paths::SEASON_REQUESTS, params)
            .await
    );
    check!(created.status() == 204);

    let_assert!(Some(requests) = server.received_requests().await);
    let_assert!(Some(query) = requests[0].url.query());
    check!(query == "scopes=openid&scopes=email&scopes=profile");
}

#[tokio::test]
async fn caller_header_replaces_default_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/shows"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::builder(url(&server.uri())).build();

    let_assert!(
        Ok(_) = client
            .get::<serde_json::Value>(
                marquee::api::paths::SHOWS,
                Params::new().header("accept", "text/plain"),
            )
            .await
    );

    let_assert!(Some(requests) = server.received_requests().await);
    let accept: Vec<_> = requests[0]
        .headers
        .get_all("accept")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    check!(accept == ["text/plain"]);
}

#[tokio::test]
async fn transport_failure_is_wrapped_by_logging() {
    let client = ApiClient::builder(unreachable_url()).with_logging().build();

    let result = client.api().shows().await;

    let_assert!(Err(err) = result);
    let_assert!(Error::FetchFailed { cause } = &err);
    check!(cause.is_connection());
    let_assert!(Some(source) = std::error::Error::source(&err));
    check!(source.to_string() == cause.to_string());
}

#[tokio::test]
async fn transport_failure_without_logging_is_raw() {
    let client = ApiClient::builder(unreachable_url()).build();

    let_assert!(Err(err) = client.api().shows().await);
    check!(err.is_connection());
}

#[tokio::test]
async fn logging_classifies_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/shows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/shows/unknown"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Not found"})),
        )
        .mount(&server)
        .await;

    let capture = CaptureLayer::default();
    let _guard = capture.install();
    let client = ApiClient::builder(url(&server.uri())).with_logging().build();

    let_assert!(Ok(_) = client.api().shows().await);
    let_assert!(Ok(missing) = client.api().show("unknown").await);
    check!(missing.status() == 404);

    let events = capture.events();
    let succeeded = events.iter().filter(|e| e.message == "request succeeded").count();
    let failed: Vec<_> = events.iter().filter(|e| e.message == "request failed").collect();
    check!(succeeded == 1);
    check!(failed.len() == 1);
    check!(failed[0].level == Level::WARN);
}

#[tokio::test]
async fn malformed_success_body_reports_json_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/seasons/se1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "se1",
            "number": "one",
            "name": "Season 1",
            "overview": "",
            "external_id": 1
        })))
        .mount(&server)
        .await;

    let client = ApiClient::builder(url(&server.uri())).build();

    let_assert!(Err(Error::JsonDeserialization { path, .. }) = client.api().season("se1").await);
    check!(path == "number");
}
