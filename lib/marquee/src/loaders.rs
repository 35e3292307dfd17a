//! Page data loaders.
//!
//! Each loader fetches what one page needs through the shared [`ApiClient`].
//! Only [`DashboardLoader`] guards anything: it checks the session before the
//! authenticated section renders and leaves through the caller's [`Redirect`]
//! when there is none. The other loaders stay on the happy path and report a
//! failed call as missing data; the session guard already handles 401s.

use std::future::Future;
use std::sync::Arc;

use derive_more::{Display, Error, From};
use futures_util::future::try_join;
use serde_json::Value;
use tracing::info;

use crate::api::{AuthMetadata, MediaApi, Movie, Season, SeasonFile, Show, ShowTorrents, User};
use crate::navigation::{LOGIN_PATH, Navigator, Redirect, RedirectSignal};
use crate::{ApiClient, Error, Fetch};

/// Why a load did not produce page data.
#[derive(Debug, Display, Error, From)]
pub enum LoadError {
    /// Answer with an HTTP redirect instead of rendering.
    #[display("{_0}")]
    Redirect(RedirectSignal),
    /// The request could not be made.
    #[display("{_0}")]
    Api(Error),
}

/// Where a load runs.
#[derive(Debug, Clone)]
pub struct LoadContext {
    redirect: Redirect,
    fetch: Option<Fetch>,
}

impl LoadContext {
    /// Client-side navigation: redirects go through `navigator`.
    #[must_use]
    pub fn browser(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            redirect: Redirect::Imperative(navigator),
            fetch: None,
        }
    }

    /// Server render: redirects come back as [`LoadError::Redirect`].
    #[must_use]
    pub const fn server() -> Self {
        Self {
            redirect: Redirect::Signal,
            fetch: None,
        }
    }

    /// Send this load's requests through `fetch`.
    #[must_use]
    pub fn with_fetch(mut self, fetch: Fetch) -> Self {
        self.fetch = Some(fetch);
        self
    }

    /// How this context leaves a page.
    #[must_use]
    pub const fn redirect(&self) -> &Redirect {
        &self.redirect
    }

    fn api<'a>(&self, client: &'a ApiClient) -> MediaApi<'a> {
        match &self.fetch {
            Some(fetch) => client.api_with(fetch.clone()),
            None => client.api(),
        }
    }
}

/// Loads one page's data.
pub trait Loader {
    /// What the page receives.
    type Data;

    /// Run the load.
    fn load(
        &self,
        client: &ApiClient,
        ctx: &LoadContext,
    ) -> impl Future<Output = Result<Self::Data, LoadError>> + Send;
}

/// Data of the authenticated section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    /// The signed-in user, `None` after an imperative redirect.
    pub user: Option<User>,
}

/// Top-level loader of the authenticated section.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardLoader;

impl Loader for DashboardLoader {
    type Data = DashboardData;

    async fn load(
        &self,
        client: &ApiClient,
        ctx: &LoadContext,
    ) -> Result<DashboardData, LoadError> {
        let response = ctx.api(client).me().await?;
        if !response.is_ok() {
            info!(status = response.status(), "unauthorized, redirecting to login");
            ctx.redirect.to(LOGIN_PATH).await?;
        }
        Ok(DashboardData {
            user: response.data,
        })
    }
}

/// Login screen data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginData {
    /// Available OAuth providers.
    pub oauth_providers: Option<AuthMetadata>,
}

/// Loader of the login screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginLoader;

impl Loader for LoginLoader {
    type Data = LoginData;

    async fn load(&self, client: &ApiClient, ctx: &LoadContext) -> Result<LoginData, LoadError> {
        let response = ctx.api(client).auth_metadata().await?;
        Ok(LoginData {
            oauth_providers: response.data,
        })
    }
}

/// Show page data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowData {
    /// The show.
    pub show: Option<Show>,
    /// Its torrents.
    pub torrents: Option<ShowTorrents>,
}

/// Loader of a show page.
#[derive(Debug, Clone)]
pub struct ShowLoader {
    /// Show id from the route.
    pub show_id: String,
}

impl Loader for ShowLoader {
    type Data = ShowData;

    async fn load(&self, client: &ApiClient, ctx: &LoadContext) -> Result<ShowData, LoadError> {
        let api = ctx.api(client);
        let (show, torrents) =
            try_join(api.show(&self.show_id), api.show_torrents(&self.show_id)).await?;
        Ok(ShowData {
            show: show.data,
            torrents: torrents.data,
        })
    }
}

/// Season page data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonData {
    /// The season.
    pub season: Option<Season>,
    /// Its imported files.
    pub files: Option<Vec<SeasonFile>>,
}

/// Loader of a season page.
#[derive(Debug, Clone)]
pub struct SeasonLoader {
    /// Season id from the route.
    pub season_id: String,
}

impl Loader for SeasonLoader {
    type Data = SeasonData;

    async fn load(&self, client: &ApiClient, ctx: &LoadContext) -> Result<SeasonData, LoadError> {
        let api = ctx.api(client);
        let (season, files) =
            try_join(api.season(&self.season_id), api.season_files(&self.season_id)).await?;
        Ok(SeasonData {
            season: season.data,
            files: files.data,
        })
    }
}

/// Loader of a movie page.
#[derive(Debug, Clone)]
pub struct MovieLoader {
    /// Movie id from the route.
    pub movie_id: String,
}

impl Loader for MovieLoader {
    type Data = Option<Movie>;

    async fn load(
        &self,
        client: &ApiClient,
        ctx: &LoadContext,
    ) -> Result<Option<Movie>, LoadError> {
        Ok(ctx.api(client).movie(&self.movie_id).await?.data)
    }
}

/// List pages that map to a single endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPage {
    /// All shows.
    Shows,
    /// Shows with their torrents.
    ShowTorrents,
    /// Season requests.
    SeasonRequests,
    /// Movie requests.
    MovieRequests,
    /// Users (settings page).
    Users,
}

impl Loader for ListPage {
    type Data = Option<Value>;

    async fn load(
        &self,
        client: &ApiClient,
        ctx: &LoadContext,
    ) -> Result<Option<Value>, LoadError> {
        let api = ctx.api(client);
        let data = match self {
            Self::Shows => api.shows().await?.data.map(serde_json::to_value),
            Self::ShowTorrents => api.shows_torrents().await?.data.map(serde_json::to_value),
            Self::SeasonRequests => api.season_requests().await?.data.map(serde_json::to_value),
            Self::MovieRequests => api.movie_requests().await?.data.map(serde_json::to_value),
            Self::Users => api.users().await?.data.map(serde_json::to_value),
        };
        data.transpose().map_err(|err| LoadError::Api(err.into()))
    }
}
