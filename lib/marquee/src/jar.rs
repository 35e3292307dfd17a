//! Cookie storage backing the "include credentials" mode.
//!
//! The jar talks to a single backend, so cookies are keyed by name only;
//! `Domain`, `Path` and `Secure` attributes are not interpreted.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use cookie::Cookie;
use time::{Duration, OffsetDateTime};
use tracing::debug;

/// Shared cookie store. Clones share the same cookies.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<Mutex<BTreeMap<String, Cookie<'static>>>>,
}

impl CookieJar {
    /// Create an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut BTreeMap<String, Cookie<'static>>) -> R) -> R {
        let mut cookies = self
            .cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut cookies)
    }

    /// Store a cookie, e.g. a session forwarded from an incoming request.
    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        let cookie = Cookie::new(name.into(), value.into());
        self.store(cookie);
    }

    fn store(&self, cookie: Cookie<'static>) {
        let name = cookie.name().to_string();
        self.with(|cookies| cookies.insert(name, cookie));
    }

    fn remove(&self, name: &str) {
        self.with(|cookies| cookies.remove(name));
    }

    /// Value of a stored cookie.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.with(|cookies| cookies.get(name).map(|cookie| cookie.value().to_string()))
    }

    /// Drop every cookie.
    pub fn clear(&self) {
        self.with(BTreeMap::clear);
    }

    /// Returns `true` when no cookie is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(|cookies| cookies.is_empty())
    }

    /// The `Cookie` request header value, if any cookie is stored.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        self.with(|cookies| {
            if cookies.is_empty() {
                return None;
            }
            let pairs: Vec<_> = cookies
                .values()
                .map(|cookie| cookie.stripped().to_string())
                .collect();
            Some(pairs.join("; "))
        })
    }

    /// Apply one `Set-Cookie` response header.
    ///
    /// The cookie is removed instead of stored when it is already expired:
    /// an empty value, a `Max-Age` of zero or less, or an `Expires` date that
    /// is not in the future. That is how the backend ends the session.
    pub fn store_set_cookie(&self, header: &str) {
        let cookie = match Cookie::parse(header) {
            Ok(cookie) => cookie.into_owned(),
            Err(err) => {
                debug!(%err, "ignoring malformed set-cookie header");
                return;
            }
        };
        if cookie.name().is_empty() {
            return;
        }

        if is_expired(&cookie, OffsetDateTime::now_utc()) {
            self.remove(cookie.name());
        } else {
            self.store(cookie);
        }
    }
}

fn is_expired(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    cookie.value().trim_matches('"').is_empty()
        || cookie.max_age().is_some_and(|age| age <= Duration::ZERO)
        || cookie.expires_datetime().is_some_and(|expires| expires <= now)
}
