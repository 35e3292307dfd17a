//! Media-manager command-line client.
//!
//! Wires the API client the way the web frontend does (logging, then the
//! session guard) and prints what the page loaders would receive.

// Demo-specific lint allowances
#![allow(clippy::print_stdout)]

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use futures_util::future::BoxFuture;
use marquee::loaders::{
    DashboardLoader, ListPage, LoadContext, LoadError, Loader, LoginLoader, MovieLoader,
    SeasonLoader, ShowLoader,
};
use marquee::navigation::Navigator;
use marquee::{ApiClient, ClientConfig};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the backend session cookie.
const SESSION_COOKIE: &str = "mediamanagerauth";

#[derive(Debug, Parser)]
#[command(name = "media-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the media-manager API.
    #[arg(long, env = "PUBLIC_API_URL")]
    api_url: marquee::url::Url,

    /// Session cookie value, as set by the backend after login.
    #[arg(long, env = "MEDIAMANAGER_SESSION")]
    session: Option<String>,

    /// Give up on a request after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Render as the server would: redirects are reported, not followed.
    #[arg(long, default_value_t = false)]
    server: bool,

    /// Log request headers too.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check the session, like the dashboard does.
    Dashboard,
    /// Show login options.
    Login,
    /// Print the OAuth authorization URL.
    Authorize,
    /// End the session.
    Logout,
    /// List shows.
    Shows,
    /// Show details and torrents.
    Show { show_id: String },
    /// Season details and files.
    Season { season_id: String },
    /// Movie details.
    Movie { movie_id: String },
    /// Shows with torrents.
    Torrents,
    /// Pending season requests.
    SeasonRequests,
    /// Pending movie requests.
    MovieRequests,
    /// All users.
    Users,
}

/// Navigation in a terminal: report where the app would go.
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn goto<'a>(&'a self, location: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            info!(%location, "navigating");
            println!("-> {location}");
        })
    }
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "media_cli=debug,marquee=debug"
    } else {
        "media_cli=info,marquee=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_client(cli: &Cli, navigator: Arc<dyn Navigator>) -> Arc<ApiClient> {
    let mut config = ClientConfig::builder();
    if let Some(seconds) = cli.timeout {
        config = config.timeout(Duration::from_secs(seconds));
    }

    let builder = ApiClient::builder(cli.api_url.clone()).config(config.build());
    let builder = if cli.verbose {
        builder.with_debug_logging()
    } else {
        builder.with_logging()
    };
    let client = builder.with_session_guard(navigator).build();

    if let Some(session) = &cli.session {
        client.cookies().insert(SESSION_COOKIE, session.clone());
    }
    client
}

fn print<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("cannot render output: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, client: &ApiClient, ctx: &LoadContext) -> Result<ExitCode, LoadError> {
    let api = client.api();
    let code = match &cli.command {
        Command::Dashboard => {
            let data = DashboardLoader.load(client, ctx).await?;
            print(&data.user)
        }
        Command::Login => print(&LoginLoader.load(client, ctx).await?.oauth_providers),
        Command::Authorize => {
            let response = api.oauth_authorize(&marquee::api::OAUTH_SCOPES).await?;
            print(&response.data.map(|authorization| authorization.authorization_url))
        }
        Command::Logout => {
            let response = api.logout().await?;
            client.cookies().clear();
            println!("logout: {}", response.status());
            ExitCode::SUCCESS
        }
        Command::Show { show_id } => {
            let data = ShowLoader {
                show_id: show_id.clone(),
            }
            .load(client, ctx)
            .await?;
            print(&(data.show, data.torrents))
        }
        Command::Season { season_id } => {
            let data = SeasonLoader {
                season_id: season_id.clone(),
            }
            .load(client, ctx)
            .await?;
            print(&(data.season, data.files))
        }
        Command::Movie { movie_id } => {
            let movie = MovieLoader {
                movie_id: movie_id.clone(),
            }
            .load(client, ctx)
            .await?;
            print(&movie)
        }
        Command::Shows => print(&ListPage::Shows.load(client, ctx).await?),
        Command::Torrents => print(&ListPage::ShowTorrents.load(client, ctx).await?),
        Command::SeasonRequests => print(&ListPage::SeasonRequests.load(client, ctx).await?),
        Command::MovieRequests => print(&ListPage::MovieRequests.load(client, ctx).await?),
        Command::Users => print(&ListPage::Users.load(client, ctx).await?),
    };
    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let navigator: Arc<dyn Navigator> = Arc::new(ConsoleNavigator);
    let client = build_client(&cli, Arc::clone(&navigator));
    let ctx = if cli.server {
        LoadContext::server()
    } else {
        LoadContext::browser(navigator)
    };

    let code = match run(&cli, &client, &ctx).await {
        Ok(code) => code,
        Err(LoadError::Redirect(signal)) => {
            println!("{} See Other, Location: {}", signal.status, signal.location);
            ExitCode::SUCCESS
        }
        Err(LoadError::Api(err)) => {
            error!("request failed: {err}");
            ExitCode::FAILURE
        }
    };

    // Let a logout started by the session guard finish before exiting.
    tokio::time::sleep(Duration::from_millis(200)).await;
    code
}
