//! Content node records.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ItemRef, items_or_empty};
use crate::path::{PathError, SitePath};

/// Content object as returned by `GET {api_host}{path}`.
///
/// Only the fields the viewer needs are kept; everything else in the
/// backend document is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentResponse {
    /// Absolute resource identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Portal type (`Document`, `Folder`, `News Item`, ...).
    #[serde(rename = "@type", default)]
    pub content_type: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Short summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Rich text body, absent for containers.
    #[serde(default)]
    pub text: Option<RichText>,
    /// Lead image.
    #[serde(default)]
    pub image: Option<ImageResponse>,
    /// Caption for the lead image.
    #[serde(default)]
    pub image_caption: Option<String>,
    /// Contained items in folder order.
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<ItemRef>,
    /// Last modification timestamp (RFC 3339).
    #[serde(default)]
    pub modified: Option<String>,
}

/// Rich text field.
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    /// Body markup.
    #[serde(default)]
    pub data: String,
}

/// Image field.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    /// Download URL.
    pub download: String,
    /// Width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Height in pixels.
    #[serde(default)]
    pub height: u32,
}

/// Reference to a contained item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRef {
    /// Site path of the child.
    pub path: SitePath,
    /// Display title.
    pub title: String,
}

/// Lead image of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Download URL, used verbatim as the image source.
    pub download: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Caption, if the backend provides a non-empty one.
    pub caption: Option<String>,
}

/// Directly viewable content node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Site path of the node.
    pub path: SitePath,
    /// Display title.
    pub title: String,
    /// Short summary (empty when absent).
    pub description: String,
    /// Portal type.
    pub content_type: String,
    /// Trusted HTML body, rendered as provided.
    pub body: String,
    /// Lead image.
    pub image: Option<Image>,
    /// Contained items.
    pub children: Vec<ChildRef>,
    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,
}

/// Container without a body of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Site path of the node.
    pub path: SitePath,
    /// Display title.
    pub title: String,
    /// Short summary (empty when absent).
    pub description: String,
    /// Portal type.
    pub content_type: String,
    /// Contained items, first entry is the default child.
    pub children: Vec<ChildRef>,
    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,
}

impl Folder {
    /// Child to show in place of this folder.
    #[must_use]
    pub fn default_child(&self) -> Option<&ChildRef> {
        self.children.first()
    }
}

/// A content node, split on whether it can be rendered directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    /// Node with a body.
    Viewable(Document),
    /// Node without a body.
    Folder(Folder),
}

impl ContentNode {
    /// Site path of the node.
    #[must_use]
    pub fn path(&self) -> &SitePath {
        match self {
            Self::Viewable(doc) => &doc.path,
            Self::Folder(folder) => &folder.path,
        }
    }
}

impl ContentResponse {
    /// Convert into a typed node.
    ///
    /// A node is viewable iff its text body is present and not blank.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if the node or any child identifier is not under
    /// `api_host`.
    pub fn into_node(self, api_host: &str) -> Result<ContentNode, PathError> {
        let path = SitePath::from_resource_id(&self.id, api_host)?;
        let children = self
            .items
            .iter()
            .map(|item| {
                Ok(ChildRef {
                    path: item.site_path(api_host)?,
                    title: item.title.clone(),
                })
            })
            .collect::<Result<Vec<_>, PathError>>()?;
        let modified = self.modified.as_deref().and_then(parse_timestamp);
        let description = self.description.unwrap_or_default();

        let body = self
            .text
            .map(|text| text.data)
            .filter(|data| !data.trim().is_empty());

        let node = match body {
            Some(body) => ContentNode::Viewable(Document {
                path,
                title: self.title,
                description,
                content_type: self.content_type,
                body,
                image: self.image.map(|image| Image {
                    download: image.download,
                    width: image.width,
                    height: image.height,
                    caption: self.image_caption.filter(|c| !c.is_empty()),
                }),
                children,
                modified,
            }),
            None => ContentNode::Folder(Folder {
                path,
                title: self.title,
                description,
                content_type: self.content_type,
                children,
                modified,
            }),
        };
        Ok(node)
    }
}

/// Parse an RFC 3339 timestamp, ignoring values the backend did not zone.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
