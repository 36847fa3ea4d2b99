//! Path to content resolution.
//!
//! [`ContentResolver`] fetches the node at the current path and decides what
//! the content area shows. A folder with children redirects to its first
//! child; the resolver returns that as a [`Redirect`] effect and leaves
//! history to the caller. Consecutive redirects form a chain that is checked
//! for cycles and bounded by `max_redirects`.

use std::fmt::Write as _;

use arbor_client::{ContentNode, Document, FetchError, Folder, SitePath};

use crate::fetch::{FetchToken, FetchTracker};

/// Why the content area could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Fetching a node failed.
    #[error("failed to load content: {0}")]
    Fetch(#[from] FetchError),

    /// Default-child redirection revisited a path.
    #[error("default-child redirect cycle: {}", format_chain(.chain))]
    CyclicRedirect {
        /// Paths visited, ending with the repeated one.
        chain: Vec<SitePath>,
    },

    /// Default-child redirection did not settle within the limit.
    #[error("gave up after {limit} default-child redirects")]
    TooManyRedirects {
        /// Configured maximum.
        limit: usize,
    },
}

fn format_chain(chain: &[SitePath]) -> String {
    let mut out = String::new();
    for (i, path) in chain.iter().enumerate() {
        if i > 0 {
            out.push_str(" -> ");
        }
        let _ = write!(out, "{path}");
    }
    out
}

/// Navigation the caller must perform because a folder has no view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Folder being left.
    pub from: SitePath,
    /// Its default child.
    pub to: SitePath,
}

/// What the content area currently shows.
#[derive(Debug, Default)]
pub enum ContentState {
    /// No path assigned yet.
    #[default]
    Idle,
    /// Waiting for the node at `path`.
    Loading {
        /// Path being fetched.
        path: SitePath,
    },
    /// A viewable node.
    Rendered(Document),
    /// Leaving a folder for its default child.
    Redirecting {
        /// Folder being left.
        from: SitePath,
        /// Its default child.
        to: SitePath,
    },
    /// A folder without children.
    Empty(Folder),
    /// Resolution failed.
    Failed(ResolveError),
}

/// Result of handing a fetch result to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// Stale result, dropped.
    Discarded,
    /// Result applied; the state is terminal for this path.
    Settled,
    /// Result applied; the caller must navigate to the target.
    Redirect(Redirect),
}

/// Content area state machine.
#[derive(Debug)]
pub struct ContentResolver {
    tracker: FetchTracker,
    state: ContentState,
    chain: Vec<SitePath>,
    max_redirects: usize,
}

impl ContentResolver {
    /// Create an idle resolver following at most `max_redirects` redirects
    /// per user navigation.
    #[must_use]
    pub fn new(max_redirects: usize) -> Self {
        Self {
            tracker: FetchTracker::new(),
            state: ContentState::Idle,
            chain: Vec::new(),
            max_redirects,
        }
    }

    /// Start resolving `path`.
    ///
    /// Loading the target of a pending redirect continues the current chain;
    /// any other path starts a new one.
    pub fn load(&mut self, path: SitePath) -> FetchToken {
        let continues = matches!(&self.state, ContentState::Redirecting { to, .. } if *to == path);
        if !continues {
            self.chain.clear();
        }
        self.chain.push(path.clone());
        self.state = ContentState::Loading { path: path.clone() };
        self.tracker.issue(path)
    }

    /// Apply a fetch result.
    pub fn receive(
        &mut self,
        token: &FetchToken,
        result: Result<ContentNode, FetchError>,
    ) -> Received {
        if !self.tracker.accept(token) {
            tracing::debug!(path = %token.path(), "Dropping stale content result");
            return Received::Discarded;
        }

        match result {
            Ok(ContentNode::Viewable(document)) => {
                self.state = ContentState::Rendered(document);
                Received::Settled
            }
            Ok(ContentNode::Folder(folder)) => self.resolve_folder(token.path(), folder),
            Err(e) => {
                tracing::warn!(path = %token.path(), error = %e, "Content fetch failed");
                self.state = ContentState::Failed(e.into());
                Received::Settled
            }
        }
    }

    fn resolve_folder(&mut self, path: &SitePath, folder: Folder) -> Received {
        let Some(child) = folder.default_child() else {
            self.state = ContentState::Empty(folder);
            return Received::Settled;
        };
        let target = child.path.clone();

        if self.chain.contains(&target) {
            let mut chain = self.chain.clone();
            chain.push(target);
            tracing::warn!(path = %path, chain = %format_chain(&chain), "Default-child redirect cycle");
            self.state = ContentState::Failed(ResolveError::CyclicRedirect { chain });
            return Received::Settled;
        }

        let taken = self.chain.len().saturating_sub(1);
        if taken >= self.max_redirects {
            tracing::warn!(path = %path, limit = self.max_redirects, "Too many default-child redirects");
            self.state = ContentState::Failed(ResolveError::TooManyRedirects {
                limit: self.max_redirects,
            });
            return Received::Settled;
        }

        let redirect = Redirect {
            from: path.clone(),
            to: target,
        };
        self.state = ContentState::Redirecting {
            from: redirect.from.clone(),
            to: redirect.to.clone(),
        };
        Received::Redirect(redirect)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ContentState {
        &self.state
    }

    /// Paths visited since the last user navigation, in order.
    #[must_use]
    pub fn chain(&self) -> &[SitePath] {
        &self.chain
    }

    /// True while a fetch is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.tracker.is_pending()
    }

    /// Drop any pending fetch and return to idle.
    pub fn unmount(&mut self) {
        self.tracker.reset();
        self.chain.clear();
        self.state = ContentState::Idle;
    }
}
