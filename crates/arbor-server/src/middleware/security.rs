//! Security headers set on every response, error pages included.
//!
//! Document bodies are backend HTML rendered verbatim, so the policy forbids
//! scripts outright and lets the page be framed by nobody.

use axum::http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;

/// Lead images are served by the backend, so images may come from anywhere.
const CSP: &str = "default-src 'self'; \
                   script-src 'none'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src * data:; \
                   frame-ancestors 'none'";

pub(crate) fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP),
    )
}

pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
}

pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"))
}

