//! Integration tests for page loaders.

mod common;

use assert2::{check, let_assert};
use marquee::loaders::{
    DashboardLoader, LoadContext, LoadError, Loader, LoginLoader, SeasonLoader, ShowLoader,
};
use marquee::{ApiClient, Fetch, HyperClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{RecordingNavigator, url};

fn user() -> serde_json::Value {
    serde_json::json!({
        "id": "u1",
        "email": "me@example.com",
        "is_active": true,
        "is_superuser": false,
        "is_verified": true
    })
}

async fn mount_me(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn dashboard_loads_the_signed_in_user() {
    let server = MockServer::start().await;
    mount_me(&server, ResponseTemplate::new(200).set_body_json(user())).await;

    let navigator = RecordingNavigator::new();
    let client = ApiClient::builder(url(&server.uri()))
        .with_logging()
        .with_session_guard(navigator.clone())
        .build();

    let_assert!(
        Ok(data) = DashboardLoader
            .load(&client, &LoadContext::browser(navigator.clone()))
            .await
    );

    let_assert!(Some(user) = data.user);
    check!(user.id == "u1");
    check!(user.is_verified);
    check!(navigator.visited().is_empty());
}

#[tokio::test]
async fn dashboard_in_browser_navigates_to_login() {
    let server = MockServer::start().await;
    mount_me(&server, ResponseTemplate::new(401)).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/cookie/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let navigator = RecordingNavigator::new();
    let client = ApiClient::builder(url(&server.uri()))
        .with_logging()
        .with_session_guard(navigator.clone())
        .build();

    let_assert!(
        Ok(data) = DashboardLoader
            .load(&client, &LoadContext::browser(navigator.clone()))
            .await
    );

    check!(data.user.is_none());
    // Once from the loader, once from the session guard.
    check!(navigator.wait_for(2).await == ["/login", "/login"]);
}

#[tokio::test]
async fn dashboard_on_server_raises_see_other() {
    let server = MockServer::start().await;
    mount_me(&server, ResponseTemplate::new(401)).await;

    let client = ApiClient::builder(url(&server.uri())).with_logging().build();

    let result = DashboardLoader.load(&client, &LoadContext::server()).await;

    let_assert!(Err(LoadError::Redirect(signal)) = result);
    check!(signal.status == 303);
    check!(signal.location == "/login");
}

#[tokio::test]
async fn server_context_uses_its_own_fetch() {
    let server = MockServer::start().await;
    mount_me(&server, ResponseTemplate::new(200).set_body_json(user())).await;

    // The client default points nowhere; only the context transport can answer.
    let client = ApiClient::builder(common::unreachable_url()).build();
    let backend = url(&server.uri());
    let transport = HyperClient::new();
    let fetch = Fetch::from_fn(move |request: marquee::Request| {
        let transport = transport.clone();
        let backend = backend.clone();
        async move {
            let mut target = request.url().clone();
            target
                .set_port(backend.port())
                .map_err(|()| marquee::Error::invalid_request("cannot set port"))?;
            let (method, _, headers, body) = request.into_parts();
            let mut builder = marquee::Request::builder(method, target).headers(headers);
            if let Some(body) = body {
                builder = builder.body(body);
            }
            marquee::HttpClient::execute(&transport, builder.build()).await
        }
    });

    let ctx = LoadContext::server().with_fetch(fetch);
    let_assert!(Ok(data) = DashboardLoader.load(&client, &ctx).await);
    check!(data.user.is_some());
}

#[tokio::test]
async fn login_screen_lists_providers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/metadata"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"oauth_providers": ["Authentik"]})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::builder(url(&server.uri())).build();

    let_assert!(Ok(data) = LoginLoader.load(&client, &LoadContext::server()).await);
    let_assert!(Some(metadata) = data.oauth_providers);
    check!(metadata.oauth_providers == ["Authentik"]);
}

#[tokio::test]
async fn show_and_season_pages_combine_two_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/shows/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "s1",
            "name": "Show",
            "overview": "",
            "year": 2020,
            "external_id": 1,
            "metadata_provider": "tmdb",
            "seasons": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/shows/s1/torrents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "show_id": "s1",
            "name": "Show",
            "year": 2020,
            "metadata_provider": "tmdb",
            "torrents": [{
                "torrent_id": "t1",
                "torrent_title": "Show S01",
                "status": 1,
                "quality": 2,
                "imported": true,
                "usenet": false,
                "file_path_suffix": "",
                "seasons": [1]
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/seasons/se1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tv/seasons/se1/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = ApiClient::builder(url(&server.uri())).build();
    let ctx = LoadContext::server();

    let_assert!(
        Ok(show) = ShowLoader {
            show_id: "s1".to_string(),
        }
        .load(&client, &ctx)
        .await
    );
    let_assert!(Some(details) = show.show);
    check!(details.year == Some(2020));
    let_assert!(Some(torrents) = show.torrents);
    check!(torrents.torrents[0].seasons == [1]);

    let_assert!(
        Ok(season) = SeasonLoader {
            season_id: "se1".to_string(),
        }
        .load(&client, &ctx)
        .await
    );
    check!(season.season.is_none());
    check!(season.files == Some(vec![]));
}
