//! Page endpoint.
//!
//! Resolves the requested path through a fresh [`Session`] and returns the
//! composed HTML page. When the content area was redirected to a folder's
//! default child the client is sent there with `303 See Other`, so the
//! address bar always shows the path that is actually rendered.

use std::sync::Arc;

use arbor_client::SitePath;
use arbor_view::{ContentState, Layout, ResolveError, Session, render};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET / (site root).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    get_page_impl(SitePath::root(), &state, &headers).await
}

/// Handle GET /{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let requested = SitePath::parse(&format!("/{path}"))?;
    Ok(get_page_impl(requested, &state, &headers).await)
}

/// Shared implementation for page rendering.
async fn get_page_impl(requested: SitePath, state: &AppState, headers: &HeaderMap) -> Response {
    let mut session = Session::new(Arc::clone(&state.backend), state.max_redirects);
    session.navigate(requested.clone());
    session.settle().await;

    let layout = session.layout();
    let status = status_for(layout.content().state());

    if status.is_success()
        && let Some(settled) = layout.path()
        && *settled != requested
    {
        tracing::debug!(from = %requested, to = %settled, "Redirecting to settled path");
        return Redirect::to(settled.as_str()).into_response();
    }

    let html = render::render_page(layout);
    if !status.is_success() {
        return (status, Html(html)).into_response();
    }

    // Compute ETag
    let etag = compute_etag(&state.version, &html);

    // Check If-None-Match header for conditional request
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let mut response = (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Html(html),
    )
        .into_response();

    if let Some(modified) = last_modified(layout)
        && let Ok(value) = modified
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string()
            .parse()
    {
        response.headers_mut().insert(header::LAST_MODIFIED, value);
    }

    response
}

/// HTTP status for a settled content area.
fn status_for(state: &ContentState) -> StatusCode {
    match state {
        ContentState::Failed(ResolveError::Fetch(e)) if e.status() == Some(404) => {
            StatusCode::NOT_FOUND
        }
        ContentState::Failed(ResolveError::Fetch(_)) => StatusCode::BAD_GATEWAY,
        ContentState::Failed(
            ResolveError::CyclicRedirect { .. } | ResolveError::TooManyRedirects { .. },
        ) => StatusCode::LOOP_DETECTED,
        ContentState::Idle
        | ContentState::Loading { .. }
        | ContentState::Redirecting { .. }
        | ContentState::Rendered(_)
        | ContentState::Empty(_) => StatusCode::OK,
    }
}

/// Modification time of the node in the content area.
fn last_modified(layout: &Layout) -> Option<DateTime<Utc>> {
    match layout.content().state() {
        ContentState::Rendered(doc) => doc.modified,
        ContentState::Empty(folder) => folder.modified,
        _ => None,
    }
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
