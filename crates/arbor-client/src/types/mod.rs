//! Records returned by the content backend.
//!
//! Each module holds the wire shape (`*Response`, deserialized as-is) and the
//! typed record the rest of the workspace consumes. Wire identifiers are
//! absolute URLs; conversion strips the backend host so every typed record
//! speaks [`SitePath`](crate::SitePath).

mod breadcrumbs;
mod content;
mod navigation;

pub use breadcrumbs::{BreadcrumbTrail, BreadcrumbsResponse, Crumb};
pub use content::{
    ChildRef, ContentNode, ContentResponse, Document, Folder, Image, ImageResponse, RichText,
};
pub use navigation::{NavItem, NavigationEntry, NavigationResponse, NavigationTree};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::path::{PathError, SitePath};

/// Minimal `{ "@id", "title" }` reference used by listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRef {
    /// Absolute resource identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
}

impl ItemRef {
    /// Site path of the referenced resource.
    pub(crate) fn site_path(&self, api_host: &str) -> Result<SitePath, PathError> {
        SitePath::from_resource_id(&self.id, api_host)
    }
}

/// Accepted encodings of an `items` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsField<T> {
    List(Vec<T>),
    Blank(String),
}

/// Deserialize an `items` field that may be absent, `null`, `""` or a list.
pub(crate) fn items_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<ItemsField<T>>::deserialize(deserializer)? {
        Some(ItemsField::List(items)) => Ok(items),
        Some(ItemsField::Blank(text)) if text.is_empty() => Ok(Vec::new()),
        Some(ItemsField::Blank(text)) => Err(D::Error::custom(format!(
            "expected a list of items, found string {text:?}"
        ))),
        None => Ok(Vec::new()),
    }
}
