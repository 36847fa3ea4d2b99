//! Navigation panel.

use arbor_client::{FetchError, NavigationTree, SitePath};

use crate::fetch::{FetchToken, FetchTracker};

/// What the navigation panel currently shows.
#[derive(Debug, Default)]
pub enum NavigationState {
    /// No path assigned yet.
    #[default]
    Idle,
    /// Waiting for the tree of the current path.
    Loading,
    /// Tree of the current path.
    Ready(NavigationTree),
    /// Fetch for the current path failed.
    Failed(FetchError),
}

/// Fetches and holds the navigation tree rooted at the current path.
#[derive(Debug, Default)]
pub struct NavigationPanel {
    tracker: FetchTracker,
    state: NavigationState,
}

impl NavigationPanel {
    /// Create an idle panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading the tree for `path`.
    pub fn load(&mut self, path: SitePath) -> FetchToken {
        self.state = NavigationState::Loading;
        self.tracker.issue(path)
    }

    /// Apply a fetch result. Returns `false` if it was stale and dropped.
    pub fn receive(
        &mut self,
        token: &FetchToken,
        result: Result<NavigationTree, FetchError>,
    ) -> bool {
        if !self.tracker.accept(token) {
            tracing::debug!(path = %token.path(), "Dropping stale navigation result");
            return false;
        }

        self.state = match result {
            Ok(tree) => NavigationState::Ready(tree),
            Err(e) => {
                tracing::warn!(path = %token.path(), error = %e, "Navigation fetch failed");
                NavigationState::Failed(e)
            }
        };
        true
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// True while a fetch is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.tracker.is_pending()
    }

    /// Drop any pending fetch and forget the current tree.
    pub fn unmount(&mut self) {
        self.tracker.reset();
        self.state = NavigationState::Idle;
    }
}
