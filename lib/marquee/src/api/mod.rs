//! Typed media-manager endpoints.
//!
//! [`MediaApi`] is a thin view over an [`ApiClient`]: each method names an
//! endpoint and its payload type, everything else (pipeline, cookies, result
//! triple) is the client's.

mod models;

pub use models::{
    AuthMetadata, Episode, MediaTorrent, Movie, OAuthAuthorization, Quality, Season, SeasonFile,
    SeasonTorrent, Show, ShowTorrents, TorrentStatus, UnknownCode, User,
};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ApiClient, Fetch, FetchResponse, Method, Params, PathTemplate, Result};

/// Endpoint path templates.
pub mod paths {
    use crate::PathTemplate;

    /// Current user, used as the session check.
    pub const USERS_ME: PathTemplate = PathTemplate::new("/api/v1/users/me");
    /// All users (administrators only).
    pub const USERS_ALL: PathTemplate = PathTemplate::new("/api/v1/users/all");
    /// Cookie-session logout.
    pub const LOGOUT: PathTemplate = PathTemplate::new("/api/v1/auth/cookie/logout");
    /// Start of the OAuth flow.
    pub const OAUTH_AUTHORIZE: PathTemplate = PathTemplate::new("/api/v1/auth/oauth/authorize");
    /// Login options.
    pub const AUTH_METADATA: PathTemplate = PathTemplate::new("/api/v1/auth/metadata");
    /// One movie.
    pub const MOVIE: PathTemplate = PathTemplate::new("/api/v1/movies/{movie_id}");
    /// Movie requests.
    pub const MOVIE_REQUESTS: PathTemplate = PathTemplate::new("/api/v1/movies/requests");
    /// All shows.
    pub const SHOWS: PathTemplate = PathTemplate::new("/api/v1/tv/shows");
    /// One show.
    pub const SHOW: PathTemplate = PathTemplate::new("/api/v1/tv/shows/{show_id}");
    /// Torrents of one show.
    pub const SHOW_TORRENTS: PathTemplate =
        PathTemplate::new("/api/v1/tv/shows/{show_id}/torrents");
    /// Every show that has torrents.
    pub const SHOWS_TORRENTS: PathTemplate = PathTemplate::new("/api/v1/tv/shows/torrents");
    /// One season.
    pub const SEASON: PathTemplate = PathTemplate::new("/api/v1/tv/seasons/{season_id}");
    /// Imported files of one season.
    pub const SEASON_FILES: PathTemplate =
        PathTemplate::new("/api/v1/tv/seasons/{season_id}/files");
    /// Season requests.
    pub const SEASON_REQUESTS: PathTemplate = PathTemplate::new("/api/v1/tv/seasons/requests");
}

/// OAuth scopes requested at login.
pub const OAUTH_SCOPES: [&str; 3] = ["openid", "email", "profile"];

#[derive(Serialize)]
struct Scopes<'a> {
    scopes: &'a [&'a str],
}

/// Typed endpoints over a client.
#[derive(Debug, Clone)]
pub struct MediaApi<'a> {
    client: &'a ApiClient,
    fetch: Option<Fetch>,
}

impl<'a> MediaApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            fetch: None,
        }
    }

    pub(crate) fn with_fetch(client: &'a ApiClient, fetch: Fetch) -> Self {
        Self {
            client,
            fetch: Some(fetch),
        }
    }

    fn params(&self) -> Params {
        match &self.fetch {
            Some(fetch) => Params::new().fetch(fetch.clone()),
            None => Params::new(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        template: PathTemplate,
        params: Params,
    ) -> Result<FetchResponse<T>> {
        self.client.send(Method::Get, template, params).await
    }

    /// `GET /api/v1/users/me`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn me(&self) -> Result<FetchResponse<User>> {
        self.get(paths::USERS_ME, self.params()).await
    }

    /// `GET /api/v1/users/all`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn users(&self) -> Result<FetchResponse<Vec<User>>> {
        self.get(paths::USERS_ALL, self.params()).await
    }

    /// `POST /api/v1/auth/cookie/logout`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn logout(&self) -> Result<FetchResponse<Value>> {
        self.client
            .send(Method::Post, paths::LOGOUT, self.params())
            .await
    }

    /// `GET /api/v1/auth/oauth/authorize`, with `scopes` as repeated keys.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn oauth_authorize(
        &self,
        scopes: &[&str],
    ) -> Result<FetchResponse<OAuthAuthorization>> {
        let params = self.params().query(&Scopes { scopes })?;
        self.get(paths::OAUTH_AUTHORIZE, params).await
    }

    /// `GET /api/v1/auth/metadata`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn auth_metadata(&self) -> Result<FetchResponse<AuthMetadata>> {
        self.get(paths::AUTH_METADATA, self.params()).await
    }

    /// `GET /api/v1/movies/{movie_id}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn movie(&self, movie_id: &str) -> Result<FetchResponse<Movie>> {
        self.get(paths::MOVIE, self.params().path("movie_id", movie_id))
            .await
    }

    /// `GET /api/v1/movies/requests`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn movie_requests(&self) -> Result<FetchResponse<Vec<Value>>> {
        self.get(paths::MOVIE_REQUESTS, self.params()).await
    }

    /// `GET /api/v1/tv/shows`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn shows(&self) -> Result<FetchResponse<Vec<Show>>> {
        self.get(paths::SHOWS, self.params()).await
    }

    /// `GET /api/v1/tv/shows/{show_id}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn show(&self, show_id: &str) -> Result<FetchResponse<Show>> {
        self.get(paths::SHOW, self.params().path("show_id", show_id))
            .await
    }

    /// `GET /api/v1/tv/shows/{show_id}/torrents`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn show_torrents(&self, show_id: &str) -> Result<FetchResponse<ShowTorrents>> {
        self.get(paths::SHOW_TORRENTS, self.params().path("show_id", show_id))
            .await
    }

    /// `GET /api/v1/tv/shows/torrents`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn shows_torrents(&self) -> Result<FetchResponse<Vec<ShowTorrents>>> {
        self.get(paths::SHOWS_TORRENTS, self.params()).await
    }

    /// `GET /api/v1/tv/seasons/{season_id}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn season(&self, season_id: &str) -> Result<FetchResponse<Season>> {
        self.get(paths::SEASON, self.params().path("season_id", season_id))
            .await
    }

    /// `GET /api/v1/tv/seasons/{season_id}/files`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn season_files(&self, season_id: &str) -> Result<FetchResponse<Vec<SeasonFile>>> {
        self.get(paths::SEASON_FILES, self.params().path("season_id", season_id))
            .await
    }

    /// `GET /api/v1/tv/seasons/requests`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn season_requests(&self) -> Result<FetchResponse<Vec<Value>>> {
        self.get(paths::SEASON_REQUESTS, self.params()).await
    }
}
