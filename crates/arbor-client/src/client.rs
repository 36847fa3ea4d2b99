//! HTTP client for the content backend.
//!
//! Sync client over the Plone-style REST surface: every site path maps to
//! `{api_host}{path}`, with `@navigation` and `@breadcrumbs` endpoints below
//! it. All requests ask for JSON.

use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ureq::Agent;

use crate::backend::Backend;
use crate::error::FetchError;
use crate::path::SitePath;
use crate::types::{
    BreadcrumbTrail, BreadcrumbsResponse, ContentNode, ContentResponse, NavigationResponse,
    NavigationTree,
};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Default `@navigation` expansion depth.
const DEFAULT_NAVIGATION_DEPTH: u32 = 2;

/// Characters escaped when a site path is appended to the backend URL.
///
/// `%` is handled by [`encode_path`].
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Content backend REST client.
pub struct ContentClient {
    agent: Agent,
    api_host: String,
    navigation_depth: u32,
}

impl ContentClient {
    /// Create a client for the site rooted at `api_host`.
    #[must_use]
    pub fn new(api_host: &str) -> Self {
        Self::with_settings(
            api_host,
            Duration::from_secs(DEFAULT_TIMEOUT),
            DEFAULT_NAVIGATION_DEPTH,
        )
    }

    /// Create a client with an explicit timeout and navigation depth.
    #[must_use]
    pub fn with_settings(api_host: &str, timeout: Duration, navigation_depth: u32) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_host: api_host.trim_end_matches('/').to_owned(),
            navigation_depth,
        }
    }

    /// Backend host prefix, without trailing slash.
    #[must_use]
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// URL of the resource at `path`, followed by `suffix`.
    fn resource_url(&self, path: &SitePath, suffix: &str) -> String {
        if path.is_root() {
            format!("{}{suffix}", self.api_host)
        } else {
            format!("{}{}{suffix}", self.api_host, encode_path(path.as_str()))
        }
    }

    pub(crate) fn content_url(&self, path: &SitePath) -> String {
        self.resource_url(path, "")
    }

    pub(crate) fn navigation_url(&self, path: &SitePath) -> String {
        self.resource_url(
            path,
            &format!(
                "/@navigation?expand.navigation.depth={}",
                self.navigation_depth
            ),
        )
    }

    pub(crate) fn breadcrumbs_url(&self, path: &SitePath) -> String {
        self.resource_url(path, "/@breadcrumbs")
    }

    /// GET `url` and decode the JSON body.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url = %url, "GET");

        let response = self
            .agent
            .get(url)
            .header("Accept", "application/json")
            .call()
            .inspect_err(|e| warn!(url = %url, error = %e, "Request failed"))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if !(200..300).contains(&status) {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            warn!(url = %url, status, "Backend returned error status");
            return Err(FetchError::Status {
                status,
                body: error_body,
            });
        }

        let text = body_reader.read_to_string()?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(url = %url, error = %e, "Malformed response body");
            FetchError::Decode(e)
        })
    }
}

/// Percent-encode a site path for the backend URL.
///
/// Identifiers from the backend arrive already encoded, so a `%` that starts
/// a valid escape is kept. Any other `%` is a literal and becomes `%25`.
fn encode_path(path: &str) -> String {
    let mut pieces = path.split('%');
    let mut encoded: String = pieces
        .next()
        .map(|first| utf8_percent_encode(first, PATH_ENCODE_SET).collect())
        .unwrap_or_default();
    for piece in pieces {
        let is_escape = piece
            .as_bytes()
            .get(..2)
            .is_some_and(|digits| digits.iter().all(u8::is_ascii_hexdigit));
        encoded.push_str(if is_escape { "%" } else { "%25" });
        encoded.extend(utf8_percent_encode(piece, PATH_ENCODE_SET));
    }
    encoded
}

impl Backend for ContentClient {
    fn content(&self, path: &SitePath) -> Result<ContentNode, FetchError> {
        let response: ContentResponse = self.get_json(&self.content_url(path))?;
        Ok(response.into_node(&self.api_host)?)
    }

    fn navigation(&self, path: &SitePath) -> Result<NavigationTree, FetchError> {
        let response: NavigationResponse = self.get_json(&self.navigation_url(path))?;
        Ok(response.into_tree(&self.api_host)?)
    }

    fn breadcrumbs(&self, path: &SitePath) -> Result<BreadcrumbTrail, FetchError> {
        let response: BreadcrumbsResponse = self.get_json(&self.breadcrumbs_url(path))?;
        Ok(response.into_trail(&self.api_host)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{FailureKind, PathError};

    static_assertions::assert_impl_all!(ContentClient: Backend, Send, Sync);

    fn client() -> ContentClient {
        ContentClient::new("http://localhost:8080/Plone/")
    }

    fn path(raw: &str) -> SitePath {
        SitePath::parse(raw).unwrap()
    }

    #[test]
    fn test_api_host_trimmed() {
        assert_eq!(client().api_host(), "http://localhost:8080/Plone");
    }

    #[test]
    fn test_content_url() {
        assert_eq!(
            client().content_url(&path("/news/item")),
            "http://localhost:8080/Plone/news/item"
        );
        assert_eq!(
            client().content_url(&SitePath::root()),
            "http://localhost:8080/Plone"
        );
    }

    #[test]
    fn test_navigation_url_carries_depth() {
        let client =
            ContentClient::with_settings("http://cms/Plone", Duration::from_secs(5), 3);
        assert_eq!(
            client.navigation_url(&path("/a/b")),
            "http://cms/Plone/a/b/@navigation?expand.navigation.depth=3"
        );
        assert_eq!(
            client.navigation_url(&SitePath::root()),
            "http://cms/Plone/@navigation?expand.navigation.depth=3"
        );
    }

    #[test]
    fn test_breadcrumbs_url() {
        assert_eq!(
            client().breadcrumbs_url(&path("/a/b")),
            "http://localhost:8080/Plone/a/b/@breadcrumbs"
        );
    }

    #[test]
    fn test_urls_encode_spaces_but_keep_escapes() {
        assert_eq!(
            client().content_url(&path("/my page/caf%C3%A9")),
            "http://localhost:8080/Plone/my%20page/caf%C3%A9"
        );
    }

    #[test]
    fn test_literal_percent_is_escaped() {
        assert_eq!(
            client().content_url(&path("/100%")),
            "http://localhost:8080/Plone/100%25"
        );
        assert_eq!(
            client().content_url(&path("/50%off/100%2")),
            "http://localhost:8080/Plone/50%25off/100%252"
        );
        assert_eq!(
            client().breadcrumbs_url(&path("/a%zz")),
            "http://localhost:8080/Plone/a%25zz/@breadcrumbs"
        );
    }

    /// Answer a single request on a local port.
    ///
    /// `body` receives the site URL so it can build identifiers under it.
    /// The handle yields the request line and headers as received.
    fn serve_once(
        status: &str,
        body: impl FnOnce(&str) -> String,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let site = format!("http://{}/Plone", listener.local_addr().unwrap());
        let body = body(&site);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.trim_end().is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            stream.write_all(response.as_bytes()).unwrap();
            head
        });
        (site, handle)
    }

    fn local_client(site: &str) -> ContentClient {
        ContentClient::with_settings(site, Duration::from_secs(5), 2)
    }

    #[test]
    fn test_document_fetched_as_json() {
        let (site, server) = serve_once("200 OK", |site| {
            format!(r#"{{"@id": "{site}/a", "title": "A", "text": {{"data": "<p>a</p>"}}}}"#)
        });

        let node = local_client(&site).content(&path("/a")).unwrap();
        let head = server.join().unwrap();

        let ContentNode::Viewable(doc) = node else {
            panic!("expected viewable node");
        };
        assert_eq!(doc.path.as_str(), "/a");
        assert_eq!(doc.body, "<p>a</p>");
        assert!(head.starts_with("GET /Plone/a HTTP/1.1"));
        assert!(
            head.to_ascii_lowercase().contains("accept: application/json"),
            "request head was: {head}"
        );
    }

    #[test]
    fn test_error_status_keeps_body() {
        let (site, server) = serve_once("500 Internal Server Error", |_| "boom".to_owned());

        let err = local_client(&site).content(&path("/a")).unwrap_err();
        server.join().unwrap();

        let FetchError::Status { status, body } = &err else {
            panic!("expected status error, got {err:?}");
        };
        assert_eq!(*status, 500);
        assert_eq!(body, "boom");
        assert_eq!(err.kind(), FailureKind::Transient);
    }

    #[test]
    fn test_truncated_json_is_decode_error() {
        let (site, server) = serve_once("200 OK", |_| "{".to_owned());

        let err = local_client(&site).navigation(&path("/a")).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
        assert_eq!(err.kind(), FailureKind::Malformed);
    }

    #[test]
    fn test_foreign_identifier_is_integrity_error() {
        let (site, server) = serve_once("200 OK", |_| {
            r#"{"@id": "http://elsewhere/Plone/a", "text": {"data": "<p>x</p>"}}"#.to_owned()
        });

        let err = local_client(&site).content(&path("/a")).unwrap_err();
        server.join().unwrap();

        assert!(
            matches!(err, FetchError::Integrity(PathError::ForeignIdentifier { .. })),
            "got {err:?}"
        );
        assert_eq!(err.kind(), FailureKind::Malformed);
    }

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let client = ContentClient::with_settings(
            "http://127.0.0.1:9/Plone",
            Duration::from_millis(500),
            2,
        );
        let err = client.content(&path("/a")).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transient);
    }
}
