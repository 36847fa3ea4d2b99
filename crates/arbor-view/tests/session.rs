//! End-to-end resolution through `Session` against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use arbor_client::{
    Backend, FailureKind, FetchError, MockBackend, MockFailure, Resource, SitePath,
};
use arbor_view::{
    BreadcrumbState, ContentState, NavigationState, ResolveError, Session, Update, render,
};
use pretty_assertions::assert_eq;

fn path(raw: &str) -> SitePath {
    SitePath::parse(raw).unwrap()
}

fn session(backend: &Arc<MockBackend>) -> Session {
    Session::new(Arc::clone(backend) as Arc<dyn Backend>, 10)
}

/// Drive the session to rest, collecting every update.
async fn drain(session: &mut Session) -> Vec<Update> {
    let mut updates = Vec::new();
    while let Some(update) = session.next_update().await {
        updates.push(update);
    }
    updates
}

fn redirects(updates: &[Update]) -> usize {
    updates
        .iter()
        .filter(|u| matches!(u, Update::Redirected(_)))
        .count()
}

fn current(session: &Session) -> &str {
    session.current_path().map_or("", SitePath::as_str)
}

#[tokio::test]
async fn test_document_renders_without_redirect() {
    let backend = Arc::new(
        MockBackend::new()
            .with_document("/about", "About", "<p>about us</p>")
            .with_navigation("/about", &[("/about", "About")])
            .with_breadcrumbs("/about", &[("/about", "About")]),
    );
    let mut session = session(&backend);

    session.navigate(path("/about"));
    let updates = drain(&mut session).await;

    assert_eq!(redirects(&updates), 0);
    assert_eq!(current(&session), "/about");
    let ContentState::Rendered(doc) = session.layout().content().state() else {
        panic!("expected rendered state");
    };
    assert_eq!(doc.body, "<p>about us</p>");
    assert_eq!(backend.requests().len(), 3);
}

#[tokio::test]
async fn test_folder_redirects_to_first_child_once() {
    let backend = Arc::new(
        MockBackend::new()
            .with_folder("/p", "P", &["/p/c1", "/p/c2"])
            .with_document("/p/c1", "C1", "<p>one</p>")
            .with_document("/p/c2", "C2", "<p>two</p>"),
    );
    let mut session = session(&backend);

    session.navigate(path("/p"));
    let updates = drain(&mut session).await;

    assert_eq!(redirects(&updates), 1);
    assert_eq!(current(&session), "/p/c1");
    assert_eq!(backend.request_count(Resource::Content, "/p/c1"), 1);
    assert_eq!(backend.request_count(Resource::Content, "/p/c2"), 0);
}

#[tokio::test]
async fn test_empty_folder_issues_no_further_fetch() {
    let backend = Arc::new(MockBackend::new().with_folder("/empty", "Empty", &[]));
    let mut session = session(&backend);

    session.navigate(path("/empty"));
    session.settle().await;

    assert!(matches!(
        session.layout().content().state(),
        ContentState::Empty(_)
    ));
    assert_eq!(backend.requests().len(), 3);
    assert!(render::render_page(session.layout()).contains(render::EMPTY_FOLDER_NOTICE));
}

#[tokio::test]
async fn test_stale_path_never_reflected() {
    let backend = Arc::new(
        MockBackend::new()
            .with_document("/p1", "P1", "<p>first</p>")
            .with_navigation("/p1", &[("/p1", "P1")])
            .with_document("/p2", "P2", "<p>second</p>")
            .with_navigation("/p2", &[("/p2", "P2")]),
    );
    let gates = [
        backend.hold(Resource::Content, "/p1"),
        backend.hold(Resource::Navigation, "/p1"),
        backend.hold(Resource::Breadcrumbs, "/p1"),
    ];
    let mut session = session(&backend);

    session.navigate(path("/p1"));
    // Let the P1 fetches reach the backend and block there
    tokio::time::sleep(Duration::from_millis(20)).await;
    session.navigate(path("/p2"));
    session.settle().await;

    // P1 answers only after P2 has landed
    for gate in &gates {
        gate.open();
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(session.next_update().await.is_none());

    assert_eq!(current(&session), "/p2");
    let ContentState::Rendered(doc) = session.layout().content().state() else {
        panic!("expected rendered state");
    };
    assert_eq!(doc.title, "P2");
    let NavigationState::Ready(tree) = session.layout().navigation().state() else {
        panic!("expected navigation");
    };
    assert_eq!(tree.items[0].title, "P2");
}

#[tokio::test]
async fn test_queued_result_for_old_path_is_discarded() {
    let backend = Arc::new(
        MockBackend::new()
            .with_document("/p1", "P1", "<p>first</p>")
            .with_document("/p2", "P2", "<p>second</p>")
            .with_navigation("/p2", &[("/p2", "P2")]),
    );
    let mut session = session(&backend);

    session.navigate(path("/p1"));
    // P1 finishes and its results wait in the channel unapplied
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.navigate(path("/p2"));

    let first = session.next_update().await;
    assert!(
        matches!(first, Some(Update::Discarded(_))),
        "expected a discarded P1 result, got {first:?}"
    );
    let mut updates = vec![first.unwrap()];
    updates.extend(drain(&mut session).await);

    let discarded = updates
        .iter()
        .filter(|u| matches!(u, Update::Discarded(_)))
        .count();
    assert_eq!(discarded, 3);
    assert_eq!(current(&session), "/p2");
    let ContentState::Rendered(doc) = session.layout().content().state() else {
        panic!("expected rendered state");
    };
    assert_eq!(doc.title, "P2");
}

#[tokio::test]
async fn test_malformed_content_leaves_panels_ready() {
    let backend = Arc::new(
        MockBackend::new()
            .with_navigation("/bad", &[("/bad", "Bad")])
            .with_breadcrumbs("/bad", &[("/bad", "Bad")])
            .with_failure(Resource::Content, "/bad", MockFailure::Malformed),
    );
    let mut session = session(&backend);

    session.navigate(path("/bad"));
    session.settle().await;

    let layout = session.layout();
    let ContentState::Failed(ResolveError::Fetch(err)) = layout.content().state() else {
        panic!("expected fetch failure");
    };
    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
    assert_eq!(err.kind(), FailureKind::Malformed);
    assert!(matches!(layout.navigation().state(), NavigationState::Ready(_)));
    assert!(matches!(layout.breadcrumbs().state(), BreadcrumbState::Ready(t) if !t.is_empty()));
    assert!(
        render::render_page(layout)
            .contains("<p class=\"error\">failed to load content: malformed response")
    );
}

#[tokio::test]
async fn test_self_referencing_folder_is_cycle() {
    let backend = Arc::new(MockBackend::new().with_folder("/a", "A", &["/a"]));
    let mut session = session(&backend);

    session.navigate(path("/a"));
    let updates = drain(&mut session).await;

    assert_eq!(redirects(&updates), 0);
    assert!(matches!(
        session.layout().content().state(),
        ContentState::Failed(ResolveError::CyclicRedirect { .. })
    ));
    assert_eq!(backend.request_count(Resource::Content, "/a"), 1);
}

#[tokio::test]
async fn test_two_folder_cycle_stops() {
    let backend = Arc::new(
        MockBackend::new()
            .with_folder("/a", "A", &["/b"])
            .with_folder("/b", "B", &["/a"]),
    );
    let mut session = session(&backend);

    session.navigate(path("/a"));
    session.settle().await;

    let ContentState::Failed(ResolveError::CyclicRedirect { chain }) =
        session.layout().content().state()
    else {
        panic!("expected cyclic redirect");
    };
    assert_eq!(chain, &vec![path("/a"), path("/b"), path("/a")]);
    assert_eq!(backend.request_count(Resource::Content, "/a"), 1);
    assert_eq!(backend.request_count(Resource::Content, "/b"), 1);
}

#[tokio::test]
async fn test_redirect_limit_bounds_long_chains() {
    let backend = Arc::new(
        MockBackend::new()
            .with_folder("/1", "1", &["/2"])
            .with_folder("/2", "2", &["/3"])
            .with_folder("/3", "3", &["/4"])
            .with_document("/4", "4", "<p>4</p>"),
    );
    let mut session = Session::new(Arc::clone(&backend) as Arc<dyn Backend>, 2);

    session.navigate(path("/1"));
    session.settle().await;

    assert!(matches!(
        session.layout().content().state(),
        ContentState::Failed(ResolveError::TooManyRedirects { limit: 2 })
    ));
    assert_eq!(backend.request_count(Resource::Content, "/4"), 0);
}

#[tokio::test]
async fn test_news_folder_lands_on_item() {
    let backend = Arc::new(
        MockBackend::new()
            .with_document("/", "Home", "<p>home</p>")
            .with_folder("/news", "News", &["/news/2024-item"])
            .with_document("/news/2024-item", "Item", "<p>hi</p>"),
    );
    let mut session = session(&backend);

    session.navigate(SitePath::root());
    session.settle().await;
    session.navigate(path("/news"));
    session.settle().await;

    assert_eq!(current(&session), "/news/2024-item");
    let ContentState::Rendered(doc) = session.layout().content().state() else {
        panic!("expected rendered state");
    };
    assert_eq!(doc.title, "Item");
    assert_eq!(doc.body, "<p>hi</p>");

    // Back skips the folder instead of bouncing through its redirect
    assert!(session.back());
    session.settle().await;
    assert_eq!(current(&session), "/");
    assert_eq!(backend.request_count(Resource::Content, "/news"), 1);
}

#[tokio::test]
async fn test_breadcrumb_failure_is_isolated() {
    let backend = Arc::new(
        MockBackend::new()
            .with_document("/a/b", "B", "<p>b</p>")
            .with_navigation("/a/b", &[("/a/b/c", "C")])
            .with_failure(Resource::Breadcrumbs, "/a/b", MockFailure::Network),
    );
    let mut session = session(&backend);

    session.navigate(path("/a/b"));
    session.settle().await;

    let layout = session.layout();
    let BreadcrumbState::Ready(trail) = layout.breadcrumbs().state() else {
        panic!("expected breadcrumbs to settle");
    };
    assert!(trail.is_empty());
    assert!(matches!(layout.navigation().state(), NavigationState::Ready(_)));
    assert!(matches!(layout.content().state(), ContentState::Rendered(_)));

    let html = render::render_page(layout);
    assert!(html.contains("You are here: <a href=\"/\">Home</a></nav>"));
    assert!(html.contains("<p>b</p>"));
}

#[tokio::test]
async fn test_content_failure_leaves_chrome_intact() {
    let backend = Arc::new(
        MockBackend::new()
            .with_navigation("/gone", &[("/other", "Other")])
            .with_breadcrumbs("/gone", &[("/gone", "Gone")])
            .with_failure(Resource::Content, "/gone", MockFailure::Status(404)),
    );
    let mut session = session(&backend);

    session.navigate(path("/gone"));
    session.settle().await;

    let layout = session.layout();
    let ContentState::Failed(ResolveError::Fetch(err)) = layout.content().state() else {
        panic!("expected fetch failure");
    };
    assert_eq!(err.status(), Some(404));
    assert!(matches!(layout.navigation().state(), NavigationState::Ready(_)));
    assert!(matches!(layout.breadcrumbs().state(), BreadcrumbState::Ready(t) if !t.is_empty()));
}

#[tokio::test]
async fn test_dropping_session_with_fetch_in_flight() {
    let backend = Arc::new(MockBackend::new().with_document("/slow", "Slow", "<p>slow</p>"));
    let gate = backend.hold(Resource::Content, "/slow");

    let mut session = session(&backend);
    session.navigate(path("/slow"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    drop(session);

    gate.open();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.request_count(Resource::Content, "/slow"), 1);
}
