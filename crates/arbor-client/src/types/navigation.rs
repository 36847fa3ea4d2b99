//! Navigation tree records.

use serde::Deserialize;

use super::items_or_empty;
use crate::path::{PathError, SitePath};

/// Response of `GET {api_host}{path}/@navigation`.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationResponse {
    /// Top-level entries.
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<NavigationEntry>,
}

/// One navigation entry on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationEntry {
    /// Absolute resource identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Short summary.
    #[serde(default)]
    pub description: String,
    /// Nested entries; the backend sends `""` for leaves.
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<NavigationEntry>,
}

/// Navigation item with children for the UI tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Link target path.
    pub path: SitePath,
    /// Short summary.
    pub description: String,
    /// Child navigation items.
    pub children: Vec<NavItem>,
}

/// Navigation tree fetched for one path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationTree {
    /// Top-level items.
    pub items: Vec<NavItem>,
}

impl NavigationTree {
    /// True when the tree has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl NavigationEntry {
    fn into_item(self, api_host: &str) -> Result<NavItem, PathError> {
        Ok(NavItem {
            path: SitePath::from_resource_id(&self.id, api_host)?,
            title: self.title,
            description: self.description,
            children: self
                .items
                .into_iter()
                .map(|child| child.into_item(api_host))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl NavigationResponse {
    /// Convert into a typed tree.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if any entry is not under `api_host`.
    pub fn into_tree(self, api_host: &str) -> Result<NavigationTree, PathError> {
        let items = self
            .items
            .into_iter()
            .map(|entry| entry.into_item(api_host))
            .collect::<Result<_, _>>()?;
        Ok(NavigationTree { items })
    }
}
