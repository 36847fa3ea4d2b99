//! Content backend client for Arbor.
//!
//! This crate provides:
//! - [`SitePath`]: normalized site-relative paths, the unit of navigation
//! - Typed records ([`ContentNode`], [`NavigationTree`], [`BreadcrumbTrail`])
//!   decoded from the backend's JSON documents
//! - [`Backend`]: the blocking fetch interface the view layer depends on
//! - [`ContentClient`]: the HTTP implementation
//! - [`MockBackend`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use arbor_client::{Backend, ContentClient, ContentNode, SitePath};
//!
//! let client = ContentClient::new("http://localhost:8080/Plone");
//! match client.content(&SitePath::parse("/news")?)? {
//!     ContentNode::Viewable(doc) => println!("{}", doc.body),
//!     ContentNode::Folder(folder) => println!("{} children", folder.children.len()),
//! }
//! # Ok(())
//! # }
//! ```

mod backend;
mod client;
mod error;
#[cfg(feature = "mock")]
mod mock;
mod path;
pub mod types;

pub use backend::{Backend, Resource};
pub use client::ContentClient;
pub use error::{FailureKind, FetchError};
#[cfg(feature = "mock")]
pub use mock::{Gate, MockBackend, MockFailure};
pub use path::{PathError, SitePath};
pub use types::{
    BreadcrumbTrail, ChildRef, ContentNode, Crumb, Document, Folder, Image, NavItem,
    NavigationTree,
};
