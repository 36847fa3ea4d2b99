//! One screen: navigation, breadcrumbs and content bound to the same path.

use arbor_client::SitePath;

use crate::breadcrumbs::BreadcrumbPanel;
use crate::fetch::{Delivery, FetchRequest, Panel};
use crate::navigation::NavigationPanel;
use crate::resolver::{ContentResolver, Received, Redirect};

/// What happened to a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The panel's state changed.
    Applied(Panel),
    /// The result was stale and dropped.
    Discarded(Panel),
    /// Content was applied and the caller must navigate to the target.
    Redirect(Redirect),
}

/// The three panels of a screen.
///
/// Every path change reaches all three panels at once, so no panel ever
/// fetches for a different path than the others.
#[derive(Debug)]
pub struct Layout {
    path: Option<SitePath>,
    navigation: NavigationPanel,
    breadcrumbs: BreadcrumbPanel,
    content: ContentResolver,
}

impl Layout {
    /// Create an empty layout.
    #[must_use]
    pub fn new(max_redirects: usize) -> Self {
        Self {
            path: None,
            navigation: NavigationPanel::new(),
            breadcrumbs: BreadcrumbPanel::new(),
            content: ContentResolver::new(max_redirects),
        }
    }

    /// Point every panel at `path` and return the fetches to run.
    pub fn navigate(&mut self, path: SitePath) -> [FetchRequest; 3] {
        self.path = Some(path.clone());
        [
            FetchRequest::Navigation(self.navigation.load(path.clone())),
            FetchRequest::Breadcrumbs(self.breadcrumbs.load(path.clone())),
            FetchRequest::Content(self.content.load(path)),
        ]
    }

    /// Route a fetch result to its panel.
    pub fn deliver(&mut self, delivery: Delivery) -> Outcome {
        let panel = delivery.panel();
        let applied = match delivery {
            Delivery::Navigation(token, result) => self.navigation.receive(&token, result),
            Delivery::Breadcrumbs(token, result) => self.breadcrumbs.receive(&token, result),
            Delivery::Content(token, result) => match self.content.receive(&token, result) {
                Received::Discarded => false,
                Received::Settled => true,
                Received::Redirect(redirect) => return Outcome::Redirect(redirect),
            },
        };

        if applied {
            Outcome::Applied(panel)
        } else {
            Outcome::Discarded(panel)
        }
    }

    /// Path all panels are bound to.
    #[must_use]
    pub fn path(&self) -> Option<&SitePath> {
        self.path.as_ref()
    }

    /// Navigation panel.
    #[must_use]
    pub fn navigation(&self) -> &NavigationPanel {
        &self.navigation
    }

    /// Breadcrumb panel.
    #[must_use]
    pub fn breadcrumbs(&self) -> &BreadcrumbPanel {
        &self.breadcrumbs
    }

    /// Content area.
    #[must_use]
    pub fn content(&self) -> &ContentResolver {
        &self.content
    }

    /// True while any panel has a fetch outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.navigation.is_loading() || self.breadcrumbs.is_loading() || self.content.is_loading()
    }

    /// Tear down every panel; pending results are dropped on arrival.
    pub fn unmount(&mut self) {
        self.path = None;
        self.navigation.unmount();
        self.breadcrumbs.unmount();
        self.content.unmount();
    }
}
