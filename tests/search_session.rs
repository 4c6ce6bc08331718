//! End-to-end behaviour of a search session on tokio's paused clock.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use github_user_search::search::client::LookupError;
use github_user_search::search::orchestrator::{ErrorKind, GENERIC_ERROR_MESSAGE};
use github_user_search::selection::TriState;
use github_user_search::ui::state::EMPTY_QUERY_NOTICE;

mod util;
use util::{ScriptedLookup, TestTracing, driver, users};

const QUICK: Duration = Duration::from_millis(10);

#[tokio::test(start_paused = true)]
async fn empty_query_issues_no_lookup() {
    let lookup = Arc::new(ScriptedLookup::new());
    let mut d = driver(lookup.clone());

    d.screen_mut().set_query("a");
    tokio::time::sleep(Duration::from_millis(100)).await;
    d.screen_mut().set_query("");
    d.settle().await;

    assert!(lookup.calls().is_empty());
    let snap = d.screen().snapshot();
    assert!(snap.results.is_none());
    assert!(!snap.loading);
    assert_eq!(snap.notice.as_deref(), Some(EMPTY_QUERY_NOTICE));
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_searches_once_for_final_text() {
    let lookup = Arc::new(ScriptedLookup::new().respond("panda", QUICK, Ok(users("panda", 3))));
    let mut d = driver(lookup.clone());

    for q in ["p", "pa", "pan", "panda"] {
        d.screen_mut().set_query(q);
        tokio::time::sleep(Duration::from_millis(150)).await;
        d.pump();
    }
    assert!(lookup.calls().is_empty(), "still inside the quiet window");

    d.settle().await;
    assert_eq!(lookup.calls(), vec!["panda".to_string()]);
    assert_eq!(d.screen().results().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn superseded_lookup_never_overwrites_latest() {
    let tracing = TestTracing::new();
    let _guard = tracing.install();

    let lookup = Arc::new(
        ScriptedLookup::new()
            .respond("foo", Duration::from_secs(2), Ok(users("foo", 4)))
            .respond("bar", Duration::from_millis(50), Ok(users("bar", 2))),
    );
    let mut d = driver(lookup.clone());

    d.screen_mut().set_query("foo");
    tokio::time::sleep(Duration::from_millis(600)).await;
    d.pump();
    assert!(d.screen().is_loading());

    d.screen_mut().set_query("bar");
    d.settle().await;
    assert_eq!(d.screen().results().unwrap().items[0].login, "bar1");

    // Let the slow "foo" answer land after "bar".
    tokio::time::sleep(Duration::from_secs(3)).await;
    d.pump();
    let rs = d.screen().results().unwrap();
    assert_eq!(rs.len(), 2);
    assert!(rs.items.iter().all(|u| u.login.starts_with("bar")));
    assert_eq!(lookup.calls(), vec!["foo".to_string(), "bar".to_string()]);
    assert_eq!(d.in_flight(), 0);
    tracing.assert_contains("discarding stale lookup outcome");
}

#[tokio::test(start_paused = true)]
async fn rate_limit_then_manual_retry() {
    let lookup = Arc::new(
        ScriptedLookup::new()
            .respond("testuser", QUICK, Err(LookupError::Status(403)))
            .respond("testuser", QUICK, Ok(users("testuser", 2))),
    );
    let mut d = driver(lookup.clone());

    d.screen_mut().set_query("testuser");
    d.settle().await;
    let err = d.screen().snapshot().error.expect("error surfaced");
    assert_eq!(err.kind, ErrorKind::RateLimited);
    assert!(err.message.contains("Rate limit exceeded"));
    assert!(err.retryable);

    d.retry();
    assert!(d.screen().is_loading());
    d.settle().await;
    let snap = d.screen().snapshot();
    assert!(snap.error.is_none());
    assert_eq!(snap.results.unwrap().len(), 2);
    assert_eq!(lookup.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn server_and_transport_failures_are_generic() {
    let lookup = Arc::new(
        ScriptedLookup::new()
            .respond("a", QUICK, Err(LookupError::Status(500)))
            .respond("b", QUICK, Err(LookupError::Transport("connection reset".into()))),
    );
    let mut d = driver(lookup);

    d.screen_mut().set_query("a");
    d.settle().await;
    let err = d.screen().snapshot().error.unwrap();
    assert_eq!(err.kind, ErrorKind::Generic);
    assert_eq!(err.message, GENERIC_ERROR_MESSAGE);

    d.screen_mut().set_query("b");
    d.settle().await;
    assert_eq!(d.screen().snapshot().error.unwrap().kind, ErrorKind::Generic);
}

#[tokio::test(start_paused = true)]
async fn bulk_edit_flow() {
    let lookup = Arc::new(ScriptedLookup::new().respond("user", QUICK, Ok(users("user", 5))));
    let mut d = driver(lookup);
    d.screen_mut().set_query("user");
    d.settle().await;

    let screen = d.screen_mut();
    screen.toggle_all(true);
    screen.toggle_one(3, false);
    assert_eq!(screen.all_selected(), TriState::Indeterminate);
    screen.toggle_one(3, true);
    assert_eq!(screen.all_selected(), TriState::Checked);
    screen.toggle_all(false);
    assert_eq!(screen.all_selected(), TriState::Unchecked);

    // Duplicate two.
    screen.toggle_one(2, true);
    screen.toggle_one(5, true);
    screen.duplicate_selected();
    let snap = screen.snapshot();
    let rs = snap.results.as_ref().unwrap();
    assert_eq!(rs.len(), 7);
    assert_eq!(rs.total_count, 7);
    assert!(snap.selected.is_empty());
    let ids: HashSet<_> = rs.ids().collect();
    assert_eq!(ids.len(), 7);

    // Remove three, including one copy.
    let copy_id = rs.items[5].id;
    for id in [1, 4, copy_id] {
        screen.toggle_one(id, true);
    }
    screen.remove_selected();
    let snap = screen.snapshot();
    let rs = snap.results.unwrap();
    assert_eq!(rs.len(), 4);
    assert_eq!(rs.total_count, 4);
    assert!(!rs.contains(1) && !rs.contains(4) && !rs.contains(copy_id));
    assert_eq!(snap.selected_count, 0);
}

#[tokio::test(start_paused = true)]
async fn new_search_resets_selection() {
    let lookup = Arc::new(
        ScriptedLookup::new()
            .respond("a", QUICK, Ok(users("a", 3)))
            .respond("b", QUICK, Ok(users("b", 3))),
    );
    let mut d = driver(lookup);
    d.screen_mut().set_query("a");
    d.settle().await;
    d.screen_mut().toggle_all(true);

    d.screen_mut().set_query("b");
    d.settle().await;
    let snap = d.screen().snapshot();
    assert_eq!(snap.selected_count, 0);
    assert_eq!(snap.all_selected, TriState::Unchecked);
}

#[tokio::test(start_paused = true)]
async fn retry_drops_selection_of_previous_results() {
    let lookup = Arc::new(
        ScriptedLookup::new()
            .respond("user", QUICK, Ok(users("user", 4)))
            .respond("user", QUICK, Ok(users("user", 4))),
    );
    let mut d = driver(lookup.clone());
    d.screen_mut().set_query("user");
    d.settle().await;
    d.screen_mut().toggle_all(true);
    assert_eq!(d.screen().all_selected(), TriState::Checked);

    d.retry();
    let snap = d.screen().snapshot();
    assert!(snap.loading);
    assert_eq!(snap.selected_count, 0);
    assert_eq!(snap.all_selected, TriState::Unchecked);

    d.settle().await;
    assert_eq!(d.screen().results().unwrap().len(), 4);
    assert_eq!(d.screen().snapshot().selected_count, 0);
    assert_eq!(lookup.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_search() {
    let lookup = Arc::new(ScriptedLookup::new());
    let mut d = driver(lookup.clone());
    d.screen_mut().set_query("never");
    d.shutdown();
    tokio::time::sleep(Duration::from_secs(2)).await;
    d.pump();
    assert!(lookup.calls().is_empty());
    assert_eq!(d.screen().debounced_query(), "");
}
