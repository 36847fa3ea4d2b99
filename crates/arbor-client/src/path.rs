//! Site-relative content paths.
//!
//! A [`SitePath`] always starts with `/`, never ends with `/` (except the
//! root itself) and never carries the backend host prefix. It is the key every
//! fetch is issued for.

use std::fmt;

/// Error returned when a string cannot be turned into a [`SitePath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path contains a `.` or `..` segment.
    #[error("path {0:?} contains a relative segment")]
    RelativeSegment(String),
    /// Path contains a query or fragment delimiter.
    #[error("path {0:?} contains a query or fragment")]
    QueryOrFragment(String),
    /// Resource identifier is not under the configured backend host.
    #[error("identifier {id:?} is not under backend host {api_host:?}")]
    ForeignIdentifier {
        /// Identifier returned by the backend.
        id: String,
        /// Configured backend host prefix.
        api_host: String,
    },
}

/// Normalized site-relative path such as `/news/2024-item`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SitePath(String);

impl SitePath {
    /// The site root, `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// Parse and normalize a path.
    ///
    /// A missing leading slash is added, repeated slashes collapse and a
    /// trailing slash is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for `.`/`..` segments or `?`/`#` characters.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.contains(['?', '#']) {
            return Err(PathError::QueryOrFragment(raw.to_owned()));
        }

        let mut normalized = String::with_capacity(raw.len() + 1);
        for segment in raw.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                return Err(PathError::RelativeSegment(raw.to_owned()));
            }
            normalized.push('/');
            normalized.push_str(segment);
        }

        if normalized.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(normalized))
    }

    /// Convert an absolute backend identifier into a site path by stripping
    /// the backend host prefix.
    ///
    /// `api_host` is compared without its trailing slash. The identifier must
    /// either equal the host or continue with `/` right after it.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::ForeignIdentifier`] when the identifier does not
    /// start with the prefix, or any error from [`SitePath::parse`].
    pub fn from_resource_id(id: &str, api_host: &str) -> Result<Self, PathError> {
        let api_host = api_host.trim_end_matches('/');
        let foreign = || PathError::ForeignIdentifier {
            id: id.to_owned(),
            api_host: api_host.to_owned(),
        };

        let rest = id.strip_prefix(api_host).ok_or_else(foreign)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return Err(foreign());
        }
        Self::parse(rest)
    }

    /// Path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path with the leading slash removed (`""` for the root).
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.0[1..]
    }

    /// Path segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.relative().split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for SitePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SitePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SitePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
