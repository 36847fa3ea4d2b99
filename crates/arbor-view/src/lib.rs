//! Path resolution, panels and page composition for Arbor.
//!
//! This crate provides:
//! - [`ContentResolver`]: turns a path into a rendered document, an empty
//!   folder notice, an error, or a redirect to a folder's default child
//! - [`NavigationPanel`] and [`BreadcrumbPanel`]: the chrome around it
//! - [`Layout`]: binds the three panels to one path
//! - [`Session`]: drives a layout on tokio, with history
//! - [`render`]: HTML output for a layout
//!
//! Every panel discards results for paths it has moved away from, so a slow
//! response can never overwrite a newer one.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use arbor_client::{ContentClient, SitePath};
//! use arbor_view::{Session, render};
//!
//! let backend = Arc::new(ContentClient::new("http://localhost:8080/Plone"));
//! let mut session = Session::new(backend, 10);
//! session.navigate(SitePath::parse("/news")?);
//! session.settle().await;
//!
//! println!("{}", render::render_page(session.layout()));
//! # Ok(())
//! # }
//! ```

mod breadcrumbs;
mod fetch;
mod history;
mod layout;
mod navigation;
pub mod render;
mod resolver;
mod session;

pub use breadcrumbs::{BreadcrumbPanel, BreadcrumbState};
pub use fetch::{Delivery, FetchRequest, FetchToken, FetchTracker, Panel};
pub use history::History;
pub use layout::{Layout, Outcome};
pub use navigation::{NavigationPanel, NavigationState};
pub use resolver::{ContentResolver, ContentState, Received, Redirect, ResolveError};
pub use session::{Session, Update};
