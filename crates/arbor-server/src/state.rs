//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use arbor_client::Backend;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Content backend shared by every request's session.
    pub(crate) backend: Arc<dyn Backend>,
    /// Default-child redirects followed per request.
    pub(crate) max_redirects: usize,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}
