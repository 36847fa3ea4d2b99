//! Backend abstraction.
//!
//! The view layer only talks to a [`Backend`]; [`ContentClient`](crate::ContentClient)
//! is the HTTP implementation and [`MockBackend`](crate::MockBackend) (feature
//! `mock`) the in-memory one.

use std::fmt;

use crate::error::FetchError;
use crate::path::SitePath;
use crate::types::{BreadcrumbTrail, ContentNode, NavigationTree};

/// Read-only source of content records.
///
/// Calls block until the record is available. Implementations must be
/// shareable across threads because fetches run on a blocking pool.
pub trait Backend: Send + Sync {
    /// Fetch the content node at `path`.
    fn content(&self, path: &SitePath) -> Result<ContentNode, FetchError>;

    /// Fetch the navigation tree rooted at `path`.
    fn navigation(&self, path: &SitePath) -> Result<NavigationTree, FetchError>;

    /// Fetch the breadcrumb trail for `path`.
    fn breadcrumbs(&self, path: &SitePath) -> Result<BreadcrumbTrail, FetchError>;
}

/// Kind of record a fetch asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Content node.
    Content,
    /// Navigation tree.
    Navigation,
    /// Breadcrumb trail.
    Breadcrumbs,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Content => "content",
            Self::Navigation => "navigation",
            Self::Breadcrumbs => "breadcrumbs",
        })
    }
}
