//! Navigation and redirect capabilities.
//!
//! The client never navigates on its own. Whoever embeds it supplies a
//! [`Navigator`] (client-side navigation) and picks a [`Redirect`] flavor that
//! matches where the code runs: a client-side context can move imperatively,
//! a server render has to answer with an HTTP redirect instead.

use std::sync::Arc;

use derive_more::{Display, Error};
use futures_util::future::BoxFuture;

/// Route of the login screen.
pub const LOGIN_PATH: &str = "/login";

/// `303 See Other`, used for redirects raised during a server render.
pub const SEE_OTHER: u16 = 303;

/// Client-side navigation.
pub trait Navigator: Send + Sync + 'static {
    /// Navigate to `location`.
    fn goto<'a>(&'a self, location: &'a str) -> BoxFuture<'a, ()>;
}

/// Raised instead of navigating when the caller cannot navigate imperatively.
///
/// The caller turns it into an HTTP response with the given status and a
/// `Location` header before emitting any markup.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("redirect {status} to {location}")]
pub struct RedirectSignal {
    /// HTTP status of the redirect.
    pub status: u16,
    /// Target location.
    #[error(not(source))]
    pub location: String,
}

impl RedirectSignal {
    /// A `303 See Other` redirect to `location`.
    #[must_use]
    pub fn see_other(location: impl Into<String>) -> Self {
        Self {
            status: SEE_OTHER,
            location: location.into(),
        }
    }
}

/// How a loader leaves the current page, chosen by the caller's context.
#[derive(Clone)]
pub enum Redirect {
    /// Navigate right away through the given navigator.
    Imperative(Arc<dyn Navigator>),
    /// Hand a [`RedirectSignal`] back to the caller.
    Signal,
}

impl std::fmt::Debug for Redirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imperative(_) => f.write_str("Imperative"),
            Self::Signal => f.write_str("Signal"),
        }
    }
}

impl Redirect {
    /// Redirect to `location`.
    ///
    /// # Errors
    ///
    /// [`Redirect::Signal`] always returns the [`RedirectSignal`] to raise.
    pub async fn to(&self, location: &str) -> Result<(), RedirectSignal> {
        match self {
            Self::Imperative(navigator) => {
                navigator.goto(location).await;
                Ok(())
            }
            Self::Signal => Err(RedirectSignal::see_other(location)),
        }
    }
}
