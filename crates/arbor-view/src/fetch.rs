//! Fetch tokens and the request/delivery envelopes exchanged with the runtime.
//!
//! Every panel owns a [`FetchTracker`]. Issuing a fetch yields a
//! [`FetchToken`]; a result is applied only if it carries the token the
//! tracker is still waiting for. Path changes and teardown replace or clear
//! that token, so late results fall on the floor.

use std::fmt;

use arbor_client::{
    Backend, BreadcrumbTrail, ContentNode, FetchError, NavigationTree, SitePath,
};

/// Identifies one issued fetch.
///
/// Two fetches for the same path still get distinct tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchToken {
    path: SitePath,
    generation: u64,
}

impl FetchToken {
    /// Path the fetch was issued for.
    #[must_use]
    pub fn path(&self) -> &SitePath {
        &self.path
    }
}

/// Tracks the single fetch a panel is waiting for.
#[derive(Debug, Default)]
pub struct FetchTracker {
    generation: u64,
    pending: Option<FetchToken>,
}

impl FetchTracker {
    /// Create a tracker with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for `path`, superseding any pending one.
    pub fn issue(&mut self, path: SitePath) -> FetchToken {
        self.generation += 1;
        let token = FetchToken {
            path,
            generation: self.generation,
        };
        self.pending = Some(token.clone());
        token
    }

    /// Settle `token` if it is the pending one.
    ///
    /// Returns `false` for superseded, already-settled or foreign tokens.
    pub fn accept(&mut self, token: &FetchToken) -> bool {
        if self.pending.as_ref() == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// True while a fetch is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget the pending fetch.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

/// One of the three independently fetching regions of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Navigation tree.
    Navigation,
    /// Breadcrumb trail.
    Breadcrumbs,
    /// Content body.
    Content,
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Navigation => "navigation",
            Self::Breadcrumbs => "breadcrumbs",
            Self::Content => "content",
        })
    }
}

/// A fetch a panel wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Fetch the navigation tree.
    Navigation(FetchToken),
    /// Fetch the breadcrumb trail.
    Breadcrumbs(FetchToken),
    /// Fetch the content node.
    Content(FetchToken),
}

impl FetchRequest {
    /// Panel that issued the request.
    #[must_use]
    pub fn panel(&self) -> Panel {
        match self {
            Self::Navigation(_) => Panel::Navigation,
            Self::Breadcrumbs(_) => Panel::Breadcrumbs,
            Self::Content(_) => Panel::Content,
        }
    }

    /// Token the result must be delivered with.
    #[must_use]
    pub fn token(&self) -> &FetchToken {
        match self {
            Self::Navigation(token) | Self::Breadcrumbs(token) | Self::Content(token) => token,
        }
    }

    /// Run the fetch against `backend`, blocking until it completes.
    #[must_use]
    pub fn perform(self, backend: &dyn Backend) -> Delivery {
        match self {
            Self::Navigation(token) => {
                let result = backend.navigation(token.path());
                Delivery::Navigation(token, result)
            }
            Self::Breadcrumbs(token) => {
                let result = backend.breadcrumbs(token.path());
                Delivery::Breadcrumbs(token, result)
            }
            Self::Content(token) => {
                let result = backend.content(token.path());
                Delivery::Content(token, result)
            }
        }
    }

    /// Deliver `error` in place of a result.
    #[must_use]
    pub fn fail(self, error: FetchError) -> Delivery {
        match self {
            Self::Navigation(token) => Delivery::Navigation(token, Err(error)),
            Self::Breadcrumbs(token) => Delivery::Breadcrumbs(token, Err(error)),
            Self::Content(token) => Delivery::Content(token, Err(error)),
        }
    }
}

/// Result of a [`FetchRequest`], tagged with its token.
#[derive(Debug)]
pub enum Delivery {
    /// Navigation tree result.
    Navigation(FetchToken, Result<NavigationTree, FetchError>),
    /// Breadcrumb trail result.
    Breadcrumbs(FetchToken, Result<BreadcrumbTrail, FetchError>),
    /// Content node result.
    Content(FetchToken, Result<ContentNode, FetchError>),
}

impl Delivery {
    /// Panel the result belongs to.
    #[must_use]
    pub fn panel(&self) -> Panel {
        match self {
            Self::Navigation(..) => Panel::Navigation,
            Self::Breadcrumbs(..) => Panel::Breadcrumbs,
            Self::Content(..) => Panel::Content,
        }
    }
}
