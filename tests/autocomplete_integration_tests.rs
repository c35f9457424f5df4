//! Integration Tests for the Autocomplete Controller
//!
//! Typing sequences against the mock search endpoint, including a slow
//! response that must never surface once a newer query was issued.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{MockServer, SLOW_QUERY};
use crm_client::autocomplete::{
    Autocomplete, AutocompleteState, Suggestion, SuggestionView, ITEM_SEARCH_ENDPOINT,
};

// == Helper Functions ==

#[derive(Default)]
struct RecordingView {
    shown: Mutex<Vec<Vec<String>>>,
    value: Mutex<Option<String>>,
    changes: Mutex<usize>,
}

impl RecordingView {
    fn shown(&self) -> Vec<Vec<String>> {
        self.shown.lock().unwrap().clone()
    }
}

impl SuggestionView for RecordingView {
    fn show(&self, suggestions: &[Suggestion]) {
        let texts = suggestions.iter().map(Suggestion::display_text).collect();
        self.shown.lock().unwrap().push(texts);
    }

    fn hide(&self) {}

    fn set_value(&self, value: &str) {
        *self.value.lock().unwrap() = Some(value.to_string());
    }

    fn dispatch_change(&self) {
        *self.changes.lock().unwrap() += 1;
    }
}

async fn setup() -> (MockServer, Autocomplete, Arc<RecordingView>) {
    let server = MockServer::start().await;
    let (ctx, _rx) = server.context();
    let view = Arc::new(RecordingView::default());
    let auto = Autocomplete::new(&ctx, ITEM_SEARCH_ENDPOINT, view.clone());
    (server, auto, view)
}

// == Debounce ==

#[tokio::test]
async fn test_burst_of_keystrokes_sends_one_request() {
    let (server, auto, view) = setup().await;

    for text in ["b", "bo", "bol", "bolt"] {
        auto.on_input(text);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(server.state.hits("search-items"), 1);
    assert_eq!(server.state.hits("search-items:bolt"), 1);
    assert_eq!(auto.state(), AutocompleteState::Showing);
    assert_eq!(view.shown(), vec![vec!["bolt item".to_string(), "bolt spare".to_string()]]);
}

#[tokio::test]
async fn test_short_query_makes_no_request() {
    let (server, auto, view) = setup().await;

    auto.on_input("b");
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(server.state.hits("search-items"), 0);
    assert_eq!(auto.state(), AutocompleteState::Idle);
    assert!(view.shown().is_empty());
}

// == Cancellation ==

#[tokio::test]
async fn test_outdated_response_is_never_shown() {
    let (server, auto, view) = setup().await;

    // The slow query is in flight when the newer one is issued
    auto.search_now(SLOW_QUERY);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(auto.state(), AutocompleteState::Querying);
    auto.search_now("abc");

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(server.state.hits("search-items:ab"), 1);
    assert_eq!(view.shown(), vec![vec!["abc item".to_string(), "abc spare".to_string()]]);
    let values: Vec<String> = auto.suggestions().iter().map(Suggestion::value).collect();
    assert_eq!(values, vec!["ABC", "ABC-2"]);
}

#[tokio::test]
async fn test_empty_response_goes_idle() {
    let (_server, auto, view) = setup().await;

    auto.search_now("none");
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(auto.state(), AutocompleteState::Idle);
    assert!(view.shown().is_empty());
}

// == Cache and selection ==

#[tokio::test]
async fn test_repeated_query_is_served_from_cache() {
    let (server, auto, view) = setup().await;

    auto.search_now("nut");
    tokio::time::sleep(Duration::from_millis(150)).await;
    auto.search_now("nu");
    tokio::time::sleep(Duration::from_millis(150)).await;
    auto.search_now("nut");
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(server.state.hits("search-items:nut"), 1);
    assert_eq!(view.shown().len(), 3);
}

#[tokio::test]
async fn test_selection_writes_value_and_fires_change() {
    let (_server, auto, view) = setup().await;

    auto.search_now("nut");
    tokio::time::sleep(Duration::from_millis(150)).await;
    let chosen = auto.select(1).unwrap();

    assert_eq!(chosen.display_text(), "nut spare");
    assert_eq!(view.value.lock().unwrap().as_deref(), Some("NUT-2"));
    assert_eq!(*view.changes.lock().unwrap(), 1);
    assert_eq!(auto.state(), AutocompleteState::Idle);
    assert!(auto.suggestions().is_empty());
}

#[tokio::test]
async fn test_blur_dismisses_dropdown() {
    let (_server, auto, _view) = setup().await;

    auto.search_now("nut");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(auto.state(), AutocompleteState::Showing);

    auto.on_blur();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(auto.state(), AutocompleteState::Idle);
}
