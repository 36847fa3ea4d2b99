//! Breadcrumb panel.
//!
//! Breadcrumbs are chrome: a failed fetch shows an empty trail instead of an
//! error.

use arbor_client::{BreadcrumbTrail, FetchError, SitePath};

use crate::fetch::{FetchToken, FetchTracker};

/// What the breadcrumb panel currently shows.
#[derive(Debug, Default)]
pub enum BreadcrumbState {
    /// No path assigned yet.
    #[default]
    Idle,
    /// Waiting for the trail of the current path.
    Loading,
    /// Trail of the current path (empty after a failure).
    Ready(BreadcrumbTrail),
}

/// Fetches and holds the ancestor trail of the current path.
#[derive(Debug, Default)]
pub struct BreadcrumbPanel {
    tracker: FetchTracker,
    state: BreadcrumbState,
}

impl BreadcrumbPanel {
    /// Create an idle panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading the trail for `path`.
    pub fn load(&mut self, path: SitePath) -> FetchToken {
        self.state = BreadcrumbState::Loading;
        self.tracker.issue(path)
    }

    /// Apply a fetch result. Returns `false` if it was stale and dropped.
    pub fn receive(
        &mut self,
        token: &FetchToken,
        result: Result<BreadcrumbTrail, FetchError>,
    ) -> bool {
        if !self.tracker.accept(token) {
            tracing::debug!(path = %token.path(), "Dropping stale breadcrumbs result");
            return false;
        }

        let trail = result.unwrap_or_else(|e| {
            tracing::warn!(path = %token.path(), error = %e, "Breadcrumbs fetch failed");
            BreadcrumbTrail::default()
        });
        self.state = BreadcrumbState::Ready(trail);
        true
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &BreadcrumbState {
        &self.state
    }

    /// True while a fetch is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.tracker.is_pending()
    }

    /// Drop any pending fetch and forget the current trail.
    pub fn unmount(&mut self) {
        self.tracker.reset();
        self.state = BreadcrumbState::Idle;
    }
}
