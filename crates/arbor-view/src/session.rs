//! Async driver for a [`Layout`].
//!
//! A session runs each fetch as a tokio task and feeds results back through
//! an mpsc channel. The task is held by a [`Subscription`]: replacing a
//! panel's fetch, or dropping the session, aborts it. A blocking fetch that
//! is already running cannot be interrupted, but its result never reaches
//! the channel once the task is aborted, and anything that does slip through
//! is rejected by the panel's token check.

use std::collections::HashMap;
use std::sync::Arc;

use arbor_client::{Backend, FetchError, SitePath};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::fetch::{Delivery, FetchRequest, Panel};
use crate::history::History;
use crate::layout::{Layout, Outcome};
use crate::resolver::Redirect;

/// Observable effect of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// A panel's state changed.
    Applied(Panel),
    /// A stale result was dropped.
    Discarded(Panel),
    /// Content redirected to a default child; all panels now load the target.
    Redirected(Redirect),
}

/// A running fetch, aborted when dropped.
struct Subscription(JoinHandle<()>);

impl Drop for Subscription {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// A browsing session over a content backend.
///
/// Navigation methods spawn tasks and must be called from within a tokio
/// runtime.
pub struct Session {
    backend: Arc<dyn Backend>,
    layout: Layout,
    history: History,
    sender: mpsc::UnboundedSender<Delivery>,
    receiver: mpsc::UnboundedReceiver<Delivery>,
    subscriptions: HashMap<Panel, Subscription>,
}

impl Session {
    /// Create a session following at most `max_redirects` default-child
    /// redirects per navigation.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, max_redirects: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            backend,
            layout: Layout::new(max_redirects),
            history: History::new(),
            sender,
            receiver,
            subscriptions: HashMap::new(),
        }
    }

    /// Navigate to `path`, recording it in history.
    pub fn navigate(&mut self, path: SitePath) {
        tracing::debug!(path = %path, "Navigate");
        self.history.push(path.clone());
        self.show(path);
    }

    /// Go back in history. Returns `false` if there is nowhere to go.
    pub fn back(&mut self) -> bool {
        match self.history.back().cloned() {
            Some(path) => {
                self.show(path);
                true
            }
            None => false,
        }
    }

    /// Go forward in history. Returns `false` if there is nowhere to go.
    pub fn forward(&mut self) -> bool {
        match self.history.forward().cloned() {
            Some(path) => {
                self.show(path);
                true
            }
            None => false,
        }
    }

    /// Fetch the current path again.
    pub fn reload(&mut self) {
        if let Some(path) = self.layout.path().cloned() {
            self.show(path);
        }
    }

    /// Wait for the next delivery and apply it.
    ///
    /// Returns `None` immediately when nothing is loading.
    pub async fn next_update(&mut self) -> Option<Update> {
        if !self.layout.is_loading() {
            return None;
        }
        let delivery = self.receiver.recv().await?;

        let update = match self.layout.deliver(delivery) {
            Outcome::Applied(panel) => Update::Applied(panel),
            Outcome::Discarded(panel) => Update::Discarded(panel),
            Outcome::Redirect(redirect) => {
                tracing::info!(from = %redirect.from, to = %redirect.to, "Redirecting to default child");
                self.history.redirect(redirect.to.clone());
                self.show(redirect.to.clone());
                Update::Redirected(redirect)
            }
        };
        Some(update)
    }

    /// Apply deliveries until no panel is loading.
    pub async fn settle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    /// Path the panels are bound to.
    #[must_use]
    pub fn current_path(&self) -> Option<&SitePath> {
        self.layout.path()
    }

    /// True while any panel has a fetch outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.layout.is_loading()
    }

    /// Panels and their state.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn show(&mut self, path: SitePath) {
        for request in self.layout.navigate(path) {
            self.spawn(request);
        }
    }

    fn spawn(&mut self, request: FetchRequest) {
        let panel = request.panel();
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();

        let handle = tokio::spawn(async move {
            let fallback = request.clone();
            let delivery =
                match tokio::task::spawn_blocking(move || request.perform(backend.as_ref())).await
                {
                    Ok(delivery) => delivery,
                    Err(e) => {
                        tracing::error!(panel = %panel, error = %e, "Fetch worker failed");
                        fallback.fail(FetchError::Worker(e.to_string()))
                    }
                };
            // The receiver is gone only when the session was dropped
            let _ = sender.send(delivery);
        });

        // Dropping the previous subscription aborts its task
        self.subscriptions.insert(panel, Subscription(handle));
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("layout", &self.layout)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}
