//! HTML rendering of a [`Layout`].
//!
//! Everything except the document body is escaped. The body is trusted
//! backend HTML and is emitted as provided.

use std::fmt::Write as _;

use arbor_client::{BreadcrumbTrail, Document, Folder, Image, NavItem};

use crate::breadcrumbs::BreadcrumbState;
use crate::layout::Layout;
use crate::navigation::NavigationState;
use crate::resolver::ContentState;

/// Notice shown for a folder without children.
pub const EMPTY_FOLDER_NOTICE: &str = "This folder has no default view.";

/// Title used when the content area has none.
const FALLBACK_TITLE: &str = "Arbor";

/// Render a full page: navigation, breadcrumbs, content.
#[must_use]
pub fn render_page(layout: &Layout) -> String {
    let title = page_title(layout);
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(title));
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(
        html,
        "<nav class=\"navigation\">{}</nav>",
        render_navigation(layout.navigation().state())
    );
    let _ = writeln!(
        html,
        "<nav class=\"breadcrumbs\">{}</nav>",
        render_breadcrumbs(layout.breadcrumbs().state())
    );
    let _ = writeln!(
        html,
        "<main class=\"content\">{}</main>",
        render_content(layout.content().state())
    );
    html.push_str("</body>\n</html>\n");
    html
}

/// Title of the node shown in the content area.
#[must_use]
pub fn page_title(layout: &Layout) -> &str {
    match layout.content().state() {
        ContentState::Rendered(doc) => &doc.title,
        ContentState::Empty(folder) => &folder.title,
        _ => FALLBACK_TITLE,
    }
}

/// Render the navigation panel as nested lists.
#[must_use]
pub fn render_navigation(state: &NavigationState) -> String {
    match state {
        NavigationState::Idle => String::new(),
        NavigationState::Loading => "<p class=\"loading\">Loading</p>".to_owned(),
        NavigationState::Failed(e) => format!(
            "<p class=\"error\">Navigation unavailable: {}</p>",
            escape_html(&e.to_string())
        ),
        NavigationState::Ready(tree) => {
            let mut html = String::new();
            render_nav_items(&mut html, &tree.items);
            html
        }
    }
}

fn render_nav_items(html: &mut String, items: &[NavItem]) {
    if items.is_empty() {
        return;
    }
    html.push_str("<ul>");
    for item in items {
        let _ = write!(
            html,
            "<li><a href=\"{}\">{}</a>",
            escape_html(item.path.as_str()),
            escape_html(&item.title)
        );
        render_nav_items(html, &item.children);
        html.push_str("</li>");
    }
    html.push_str("</ul>");
}

/// Render the breadcrumb panel.
#[must_use]
pub fn render_breadcrumbs(state: &BreadcrumbState) -> String {
    match state {
        BreadcrumbState::Idle => String::new(),
        BreadcrumbState::Loading => "<p class=\"loading\">Loading</p>".to_owned(),
        BreadcrumbState::Ready(trail) => render_trail(trail),
    }
}

fn render_trail(trail: &BreadcrumbTrail) -> String {
    let mut html = String::from("You are here: <a href=\"/\">Home</a>");
    for crumb in &trail.items {
        let _ = write!(
            html,
            " &gt; <a href=\"{}\">{}</a>",
            escape_html(crumb.path.as_str()),
            escape_html(&crumb.title)
        );
    }
    html
}

/// Render the content area.
#[must_use]
pub fn render_content(state: &ContentState) -> String {
    match state {
        ContentState::Idle => String::new(),
        ContentState::Loading { .. } => "<p class=\"loading\">Loading</p>".to_owned(),
        ContentState::Rendered(doc) => render_document(doc),
        ContentState::Redirecting { to, .. } => format!(
            "<p class=\"loading\">Redirecting to <a href=\"{0}\">{0}</a></p>",
            escape_html(to.as_str())
        ),
        ContentState::Empty(folder) => render_empty_folder(folder),
        ContentState::Failed(e) => format!(
            "<p class=\"error\">{}</p>",
            escape_html(&e.to_string())
        ),
    }
}

fn render_document(doc: &Document) -> String {
    let mut html = String::with_capacity(doc.body.len() + 256);
    let _ = write!(html, "<h2>{}</h2>", escape_html(&doc.title));
    if !doc.description.is_empty() {
        let _ = write!(html, "<strong>{}</strong>", escape_html(&doc.description));
    }
    if let Some(image) = &doc.image {
        render_image(&mut html, image, &doc.title);
    }
    html.push_str(&doc.body);
    html
}

fn render_image(html: &mut String, image: &Image, title: &str) {
    let alt = image.caption.as_deref().unwrap_or(title);
    let _ = write!(
        html,
        "<figure><img src=\"{}\" width=\"{}\" height=\"{}\" alt=\"{}\">",
        escape_html(&image.download),
        image.width,
        image.height,
        escape_html(alt)
    );
    if let Some(caption) = &image.caption {
        let _ = write!(html, "<figcaption>{}</figcaption>", escape_html(caption));
    }
    html.push_str("</figure>");
}

fn render_empty_folder(folder: &Folder) -> String {
    format!(
        "<h2>{}</h2><p class=\"notice\">{EMPTY_FOLDER_NOTICE}</p>",
        escape_html(&folder.title)
    )
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
