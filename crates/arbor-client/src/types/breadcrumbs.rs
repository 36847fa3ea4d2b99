//! Breadcrumb trail records.

use serde::Deserialize;

use super::{ItemRef, items_or_empty};
use crate::path::{PathError, SitePath};

/// Response of `GET {api_host}{path}/@breadcrumbs`.
#[derive(Debug, Clone, Deserialize)]
pub struct BreadcrumbsResponse {
    /// Ancestors from the site root down, ending with the requested node.
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<ItemRef>,
}

/// One breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    /// Display title.
    pub title: String,
    /// Link target path.
    pub path: SitePath,
}

/// Ordered trail from the site root down to the current node.
///
/// The site root itself is not part of the trail; it is rendered as the
/// fixed "Home" link in front of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreadcrumbTrail {
    /// Crumbs in root-to-leaf order.
    pub items: Vec<Crumb>,
}

impl BreadcrumbTrail {
    /// True when the trail has no crumbs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BreadcrumbsResponse {
    /// Convert into a typed trail.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if any crumb is not under `api_host`.
    pub fn into_trail(self, api_host: &str) -> Result<BreadcrumbTrail, PathError> {
        let items = self
            .items
            .iter()
            .map(|item| {
                Ok(Crumb {
                    title: item.title.clone(),
                    path: item.site_path(api_host)?,
                })
            })
            .collect::<Result<_, PathError>>()?;
        Ok(BreadcrumbTrail { items })
    }
}
