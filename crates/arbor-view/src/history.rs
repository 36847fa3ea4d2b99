//! Browsing history.
//!
//! Redirects push forward like any navigation, but the entry they leave is
//! marked so that back and forward step over it. Otherwise going back to a
//! folder would immediately redirect forward again.

use arbor_client::SitePath;

#[derive(Debug, Clone)]
struct Entry {
    path: SitePath,
    redirected: bool,
}

/// Push-forward history with a cursor.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Entry>,
    cursor: usize,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit `path`, dropping any forward entries.
    ///
    /// Visiting the current path again is a no-op.
    pub fn push(&mut self, path: SitePath) {
        if self.current() == Some(&path) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(Entry {
            path,
            redirected: false,
        });
        self.cursor = self.entries.len() - 1;
    }

    /// Leave the current entry for `to` as a default-child redirect.
    pub fn redirect(&mut self, to: SitePath) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            entry.redirected = true;
        }
        self.push(to);
    }

    /// Step back to the nearest entry that was not redirected away.
    pub fn back(&mut self) -> Option<&SitePath> {
        let target = (0..self.cursor)
            .rev()
            .find(|&i| !self.entries[i].redirected)?;
        self.cursor = target;
        self.current()
    }

    /// Step forward to the nearest entry that was not redirected away.
    pub fn forward(&mut self) -> Option<&SitePath> {
        let target = (self.cursor + 1..self.entries.len()).find(|&i| !self.entries[i].redirected)?;
        self.cursor = target;
        self.current()
    }

    /// Path at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&SitePath> {
        self.entries.get(self.cursor).map(|entry| &entry.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> SitePath {
        SitePath::parse(raw).unwrap()
    }

    fn current(history: &History) -> Option<&str> {
        history.current().map(SitePath::as_str)
    }

    #[test]
    fn test_push_back_forward() {
        let mut history = History::new();
        assert!(history.current().is_none());
        assert!(history.back().is_none());

        history.push(path("/a"));
        history.push(path("/b"));
        history.push(path("/c"));

        assert_eq!(history.back().map(SitePath::as_str), Some("/b"));
        assert_eq!(history.back().map(SitePath::as_str), Some("/a"));
        assert!(history.back().is_none());
        assert_eq!(current(&history), Some("/a"));
        assert_eq!(history.forward().map(SitePath::as_str), Some("/b"));
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = History::new();
        history.push(path("/a"));
        history.push(path("/b"));
        history.back();
        history.push(path("/c"));

        assert!(history.forward().is_none());
        assert_eq!(current(&history), Some("/c"));
        assert_eq!(history.back().map(SitePath::as_str), Some("/a"));
    }

    #[test]
    fn test_repeat_visit_not_duplicated() {
        let mut history = History::new();
        history.push(path("/a"));
        history.push(path("/a"));
        assert!(history.back().is_none());
        assert_eq!(current(&history), Some("/a"));
    }

    #[test]
    fn test_redirect_pushes_forward_and_back_skips_folder() {
        let mut history = History::new();
        history.push(path("/"));
        history.push(path("/news"));
        history.redirect(path("/news/item"));

        assert_eq!(current(&history), Some("/news/item"));

        assert_eq!(history.back().map(SitePath::as_str), Some("/"));
        assert_eq!(history.forward().map(SitePath::as_str), Some("/news/item"));
    }

    #[test]
    fn test_redirect_chain_skipped_entirely() {
        let mut history = History::new();
        history.push(path("/start"));
        history.push(path("/a"));
        history.redirect(path("/a/b"));
        history.redirect(path("/a/b/c"));

        assert_eq!(history.back().map(SitePath::as_str), Some("/start"));
    }

    #[test]
    fn test_redirect_on_first_visit_leaves_nothing_to_go_back_to() {
        let mut history = History::new();
        history.push(path("/news"));
        history.redirect(path("/news/item"));
        assert!(history.back().is_none());
        assert_eq!(current(&history), Some("/news/item"));
    }
}
