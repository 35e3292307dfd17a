//! Path templates with `{name}` placeholders.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{Error, Result};

/// Characters escaped when a value is substituted into a path segment.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through; anything that
/// would change the shape of the path (`/`, `?`, `#`, `%`, ...) is encoded.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// An API path before parameter substitution, e.g. `/api/v1/movies/{movie_id}`.
///
/// The unresolved template is handed to middleware alongside each request, so
/// hooks can reason about the endpoint rather than a concrete id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    /// Create a new path template.
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// Get the template string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Names of the `{...}` placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.0
            .split('{')
            .skip(1)
            .filter_map(|chunk| chunk.split_once('}').map(|(name, _)| name))
    }

    /// Substitute every placeholder with its percent-encoded value.
    ///
    /// Extra parameters that match no placeholder are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPathParam`] when a placeholder has no value and
    /// [`Error::InvalidRequest`] when a `{` is never closed.
    pub fn resolve<K, V>(&self, params: &[(K, V)]) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut path = String::with_capacity(self.0.len());
        let mut rest = self.0;

        while let Some((before, after)) = rest.split_once('{') {
            path.push_str(before);
            let Some((name, tail)) = after.split_once('}') else {
                return Err(Error::invalid_request(format!(
                    "unterminated placeholder in path template `{}`",
                    self.0
                )));
            };
            let value = params
                .iter()
                .find(|(key, _)| key.as_ref() == name)
                .map(|(_, value)| value.as_ref())
                .ok_or_else(|| Error::MissingPathParam(name.to_string()))?;
            path.extend(utf8_percent_encode(value, PATH_SEGMENT));
            rest = tail;
        }
        path.push_str(rest);

        Ok(path)
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl From<&'static str> for PathTemplate {
    fn from(template: &'static str) -> Self {
        Self(template)
    }
}
