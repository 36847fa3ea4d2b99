//! Mock backend implementation for testing.
//!
//! Provides [`MockBackend`] for exercising the view layer without a CMS.
//! Replies are registered per resource and path; [`MockBackend::hold`]
//! keeps a fetch blocked until the returned [`Gate`] is opened, which lets
//! tests force responses to complete out of order.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, RwLock};

use serde::de::Error as _;

use crate::backend::{Backend, Resource};
use crate::error::FetchError;
use crate::path::SitePath;
use crate::types::{
    BreadcrumbTrail, ChildRef, ContentNode, Crumb, Document, Folder, NavItem, NavigationTree,
};

/// Failure a mock reply can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Connection refused.
    Network,
    /// Backend answered with this status.
    Status(u16),
    /// Backend answered with an unusable body.
    Malformed,
}

impl MockFailure {
    fn to_error(self) -> FetchError {
        match self {
            Self::Network => FetchError::Transport(ureq::Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Self::Status(status) => FetchError::Status {
                status,
                body: String::new(),
            },
            Self::Malformed => {
                FetchError::Decode(serde_json::Error::custom("missing field `@id`"))
            }
        }
    }
}

/// Blocks a registered fetch until opened.
#[derive(Debug, Clone, Default)]
pub struct Gate(Arc<(Mutex<bool>, Condvar)>);

impl Gate {
    /// Release every fetch waiting on this gate.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn open(&self) {
        let (open, signal) = &*self.0;
        *open.lock().unwrap() = true;
        signal.notify_all();
    }

    fn wait(&self) {
        let (open, signal) = &*self.0;
        let mut guard = open.lock().unwrap();
        while !*guard {
            guard = signal.wait(guard).unwrap();
        }
    }
}

/// In-memory backend.
///
/// Unknown paths answer with status 404.
///
/// # Example
///
/// ```ignore
/// use arbor_client::{Backend, MockBackend, SitePath};
///
/// let backend = MockBackend::new()
///     .with_folder("/news", "News", &["/news/item"])
///     .with_document("/news/item", "Item", "<p>hi</p>");
///
/// let node = backend.content(&SitePath::parse("/news").unwrap()).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockBackend {
    content: RwLock<HashMap<SitePath, Result<ContentNode, MockFailure>>>,
    navigation: RwLock<HashMap<SitePath, Result<NavigationTree, MockFailure>>>,
    breadcrumbs: RwLock<HashMap<SitePath, Result<BreadcrumbTrail, MockFailure>>>,
    gates: RwLock<HashMap<(Resource, SitePath), Gate>>,
    requests: Mutex<Vec<(Resource, SitePath)>>,
}

/// Parse a test path.
///
/// # Panics
///
/// Panics if `raw` is not a valid site path.
fn site_path(raw: &str) -> SitePath {
    SitePath::parse(raw).unwrap()
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a content node at its own path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_node(self, node: ContentNode) -> Self {
        self.content
            .write()
            .unwrap()
            .insert(node.path().clone(), Ok(node));
        self
    }

    /// Register a viewable document.
    #[must_use]
    pub fn with_document(self, path: &str, title: &str, body: &str) -> Self {
        self.with_node(ContentNode::Viewable(Document {
            path: site_path(path),
            title: title.to_owned(),
            description: String::new(),
            content_type: "Document".to_owned(),
            body: body.to_owned(),
            image: None,
            children: Vec::new(),
            modified: None,
        }))
    }

    /// Register a folder whose children are the given paths, in order.
    ///
    /// Child titles are the last path segment.
    #[must_use]
    pub fn with_folder(self, path: &str, title: &str, children: &[&str]) -> Self {
        let children = children
            .iter()
            .map(|child| {
                let path = site_path(child);
                let title = path.segments().last().unwrap_or_default().to_owned();
                ChildRef { path, title }
            })
            .collect();
        self.with_node(ContentNode::Folder(Folder {
            path: site_path(path),
            title: title.to_owned(),
            description: String::new(),
            content_type: "Folder".to_owned(),
            children,
            modified: None,
        }))
    }

    /// Register a flat navigation tree for `path` from `(path, title)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_navigation(self, path: &str, items: &[(&str, &str)]) -> Self {
        let tree = NavigationTree {
            items: items
                .iter()
                .map(|(item_path, title)| NavItem {
                    title: (*title).to_owned(),
                    path: site_path(item_path),
                    description: String::new(),
                    children: Vec::new(),
                })
                .collect(),
        };
        self.navigation
            .write()
            .unwrap()
            .insert(site_path(path), Ok(tree));
        self
    }

    /// Register a breadcrumb trail for `path` from `(path, title)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_breadcrumbs(self, path: &str, items: &[(&str, &str)]) -> Self {
        let trail = BreadcrumbTrail {
            items: items
                .iter()
                .map(|(item_path, title)| Crumb {
                    title: (*title).to_owned(),
                    path: site_path(item_path),
                })
                .collect(),
        };
        self.breadcrumbs
            .write()
            .unwrap()
            .insert(site_path(path), Ok(trail));
        self
    }

    /// Make fetches of `resource` at `path` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, resource: Resource, path: &str, failure: MockFailure) -> Self {
        let path = site_path(path);
        match resource {
            Resource::Content => {
                self.content.write().unwrap().insert(path, Err(failure));
            }
            Resource::Navigation => {
                self.navigation.write().unwrap().insert(path, Err(failure));
            }
            Resource::Breadcrumbs => {
                self.breadcrumbs.write().unwrap().insert(path, Err(failure));
            }
        }
        self
    }

    /// Block fetches of `resource` at `path` until the returned gate opens.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn hold(&self, resource: Resource, path: &str) -> Gate {
        let gate = Gate::default();
        self.gates
            .write()
            .unwrap()
            .insert((resource, site_path(path)), gate.clone());
        gate
    }

    /// All fetches issued so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<(Resource, SitePath)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of fetches of `resource` at `path` issued so far.
    #[must_use]
    pub fn request_count(&self, resource: Resource, path: &str) -> usize {
        let path = site_path(path);
        self.requests()
            .iter()
            .filter(|(r, p)| *r == resource && *p == path)
            .count()
    }

    fn record_and_wait(&self, resource: Resource, path: &SitePath) {
        self.requests
            .lock()
            .unwrap()
            .push((resource, path.clone()));
        let gate = self
            .gates
            .read()
            .unwrap()
            .get(&(resource, path.clone()))
            .cloned();
        if let Some(gate) = gate {
            gate.wait();
        }
    }

    fn reply<T: Clone>(
        table: &RwLock<HashMap<SitePath, Result<T, MockFailure>>>,
        path: &SitePath,
    ) -> Result<T, FetchError> {
        match table.read().unwrap().get(path) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Err(MockFailure::Status(404).to_error()),
        }
    }
}

impl Backend for MockBackend {
    fn content(&self, path: &SitePath) -> Result<ContentNode, FetchError> {
        self.record_and_wait(Resource::Content, path);
        Self::reply(&self.content, path)
    }

    fn navigation(&self, path: &SitePath) -> Result<NavigationTree, FetchError> {
        self.record_and_wait(Resource::Navigation, path);
        Self::reply(&self.navigation, path)
    }

    fn breadcrumbs(&self, path: &SitePath) -> Result<BreadcrumbTrail, FetchError> {
        self.record_and_wait(Resource::Breadcrumbs, path);
        Self::reply(&self.breadcrumbs, path)
    }
}
