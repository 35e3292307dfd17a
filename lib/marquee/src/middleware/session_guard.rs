//! Session-expiry guard.
//!
//! A `401 Unauthorized` means the session cookie is gone or expired: the guard
//! tears the session down in the background and lets the response continue to
//! the caller unchanged. A `403 Forbidden` only gets logged, the backend should
//! never send one to a logged-in user.

use std::sync::{Arc, Weak};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::{Middleware, MiddlewareContext};
use crate::navigation::{LOGIN_PATH, Navigator};
use crate::{ApiClient, Request, Response};

/// Path suffix of the logout endpoint.
///
/// A 401 on this endpoint never triggers another logout.
pub const LOGOUT_SUFFIX: &str = "/auth/cookie/logout";

/// Ends the local session.
pub trait SessionTerminator: Send + Sync + 'static {
    /// Log out and leave the authenticated section.
    fn terminate(&self) -> BoxFuture<'_, ()>;
}

/// Reacts to authentication failures.
///
/// The terminator runs on a spawned task, so concurrent 401s may each start
/// one; logout is idempotent on the backend.
#[derive(Clone)]
pub struct SessionGuard {
    terminator: Arc<dyn SessionTerminator>,
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard").finish_non_exhaustive()
    }
}

impl SessionGuard {
    /// Create a guard around a terminator.
    pub fn new(terminator: impl SessionTerminator) -> Self {
        Self {
            terminator: Arc::new(terminator),
        }
    }

    /// Create a guard around a shared terminator.
    #[must_use]
    pub fn from_arc(terminator: Arc<dyn SessionTerminator>) -> Self {
        Self { terminator }
    }

    async fn end_session(&self) {
        let terminator = Arc::clone(&self.terminator);
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { terminator.terminate().await });
            }
            // Not on a tokio runtime: nothing to spawn onto.
            Err(_) => terminator.terminate().await,
        }
    }
}

impl Middleware for SessionGuard {
    fn name(&self) -> &str {
        "session-guard"
    }

    fn on_response<'a>(
        &'a self,
        ctx: &'a MiddlewareContext,
        request: &'a Request,
        response: Response,
    ) -> BoxFuture<'a, Response> {
        async move {
            if response.is_unauthorized() {
                if request.targets(LOGOUT_SUFFIX) {
                    debug!(
                        id = ctx.id(),
                        url = %request.url(),
                        "logout rejected, session already gone"
                    );
                } else {
                    info!(id = ctx.id(), url = %request.url(), "session expired, logging out");
                    self.end_session().await;
                }
            } else if response.is_forbidden() {
                warn!(
                    id = ctx.id(),
                    url = %request.url(),
                    "forbidden response, this should not happen, consider opening a bug report"
                );
            }
            response
        }
        .boxed()
    }
}

/// Cookie-session logout through the client itself.
///
/// Posts to the logout endpoint, clears the cookie jar, then navigates to the
/// login page. The client is held weakly so the pipeline does not keep itself
/// alive.
pub struct CookieLogout {
    client: Weak<ApiClient>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for CookieLogout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieLogout").finish_non_exhaustive()
    }
}

impl CookieLogout {
    /// Create a logout bound to `client`.
    #[must_use]
    pub fn new(client: Weak<ApiClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self { client, navigator }
    }
}

impl SessionTerminator for CookieLogout {
    fn terminate(&self) -> BoxFuture<'_, ()> {
        async move {
            if let Some(client) = self.client.upgrade() {
                match client.api().logout().await {
                    Ok(response) => debug!(status = response.status(), "logout sent"),
                    Err(err) => warn!(error = %err, "logout request failed"),
                }
                client.cookies().clear();
            } else {
                debug!("client dropped, skipping logout request");
            }
            self.navigator.goto(LOGIN_PATH).await;
        }
        .boxed()
    }
}
