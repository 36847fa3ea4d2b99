//! Plain-text rendering of a layout for the terminal.
//!
//! Regions appear in the same order as the HTML page: navigation,
//! breadcrumbs, content. Navigation links are numbered so `browse` can
//! follow them by number.

use std::fmt::Write as _;

use arbor_client::{NavItem, SitePath};
use arbor_view::{BreadcrumbState, ContentState, Layout, NavigationState, render};
use console::Style;

/// A rendered screen and the targets of its numbered links.
pub(crate) struct Screen {
    pub(crate) text: String,
    links: Vec<SitePath>,
}

impl Screen {
    /// Target of link `number` (1-based).
    pub(crate) fn link(&self, number: usize) -> Option<&SitePath> {
        number.checked_sub(1).and_then(|i| self.links.get(i))
    }
}

/// Render `layout` as text.
pub(crate) fn render_screen(layout: &Layout) -> Screen {
    let heading = Style::new().bold();
    let mut text = String::new();
    let mut links = Vec::new();

    let _ = writeln!(text, "{}", heading.apply_to("Navigation"));
    match layout.navigation().state() {
        NavigationState::Idle => {}
        NavigationState::Loading => text.push_str("  Loading\n"),
        NavigationState::Failed(e) => {
            let _ = writeln!(text, "  Navigation unavailable: {e}");
        }
        NavigationState::Ready(tree) => write_nav_items(&mut text, &mut links, &tree.items, 1),
    }
    text.push('\n');

    match layout.breadcrumbs().state() {
        BreadcrumbState::Idle => {}
        BreadcrumbState::Loading => text.push_str("Loading\n"),
        BreadcrumbState::Ready(trail) => {
            text.push_str("You are here: Home");
            for crumb in &trail.items {
                let _ = write!(text, " > {}", crumb.title);
            }
            text.push('\n');
        }
    }
    text.push('\n');

    match layout.content().state() {
        ContentState::Idle => {}
        ContentState::Loading { path } => {
            let _ = writeln!(text, "Loading {path}");
        }
        ContentState::Rendered(doc) => {
            let _ = writeln!(text, "{}", heading.apply_to(&doc.title));
            if !doc.description.is_empty() {
                let _ = writeln!(text, "{}", doc.description);
            }
            if let Some(image) = &doc.image {
                let _ = write!(text, "[image {}x{}: {}", image.width, image.height, image.download);
                if let Some(caption) = &image.caption {
                    let _ = write!(text, " ({caption})");
                }
                text.push_str("]\n");
            }
            text.push('\n');
            text.push_str(&doc.body);
            text.push('\n');
        }
        ContentState::Redirecting { to, .. } => {
            let _ = writeln!(text, "Redirecting to {to}");
        }
        ContentState::Empty(folder) => {
            let _ = writeln!(text, "{}", heading.apply_to(&folder.title));
            let _ = writeln!(text, "{}", render::EMPTY_FOLDER_NOTICE);
        }
        ContentState::Failed(e) => {
            let _ = writeln!(text, "Error: {e}");
        }
    }

    Screen { text, links }
}

fn write_nav_items(text: &mut String, links: &mut Vec<SitePath>, items: &[NavItem], depth: usize) {
    for item in items {
        links.push(item.path.clone());
        let _ = writeln!(
            text,
            "{:indent$}[{}] {}",
            "",
            links.len(),
            item.title,
            indent = depth * 2
        );
        write_nav_items(text, links, &item.children, depth + 1);
    }
}
