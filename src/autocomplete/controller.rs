//! Autocomplete Controller
//!
//! One controller per input. Text changes are debounced, then sent to the
//! search endpoint through the cache. A newer query aborts the task of the
//! older one; a generation counter, compared under the session lock when a
//! response arrives, catches anything that completes before the abort lands.
//! Together they guarantee that suggestions for an outdated query are never
//! shown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::context::CrmContext;
use crate::fetch::{CachedFetcher, RequestOptions};
use crate::tasks::{debounce, Debounced};

use super::{decode_suggestions, Suggestion};

/// UI side of an autocomplete input.
///
/// Methods are called with the session lock held; implementations must not
/// call back into the controller.
pub trait SuggestionView: Send + Sync {
    /// Renders the dropdown, replacing any previous one.
    fn show(&self, suggestions: &[Suggestion]);
    /// Removes the dropdown.
    fn hide(&self);
    /// Writes the chosen value into the input.
    fn set_value(&self, value: &str);
    /// Fires the input's change event.
    fn dispatch_change(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteState {
    Idle,
    Querying,
    Showing,
}

struct Session {
    state: AutocompleteState,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    blur: Option<JoinHandle<()>>,
    dropdown: Vec<Suggestion>,
}

impl Session {
    /// Invalidates whatever request is in flight.
    fn supersede(&mut self) -> u64 {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation += 1;
        self.generation
    }

    fn close(&mut self, view: &dyn SuggestionView) {
        let was_open = !self.dropdown.is_empty();
        self.dropdown.clear();
        self.state = AutocompleteState::Idle;
        if was_open {
            view.hide();
        }
    }
}

struct Core {
    fetcher: CachedFetcher,
    endpoint: String,
    min_chars: usize,
    blur_grace: Duration,
    view: Arc<dyn SuggestionView>,
    session: Mutex<Session>,
}

impl Core {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn search(self: &Arc<Self>, query: String) {
        let query = query.trim().to_string();
        let mut session = self.session();
        let generation = session.supersede();

        if query.chars().count() < self.min_chars {
            debug!(endpoint = %self.endpoint, "query below minimum length");
            session.close(self.view.as_ref());
            return;
        }

        session.close(self.view.as_ref());
        session.state = AutocompleteState::Querying;

        let core = Arc::clone(self);
        session.pending = Some(tokio::spawn(async move {
            core.run_query(generation, query).await;
        }));
    }

    async fn run_query(&self, generation: u64, query: String) {
        let key = format!("{}:{}", self.endpoint, query);
        let options = RequestOptions::get().query("q", query.as_str()).quiet();
        let result = self.fetcher.cached_fetch(&self.endpoint, Some(&key), &options).await;

        let mut session = self.session();
        if session.generation != generation {
            debug!(%query, "discarding response for superseded query");
            return;
        }
        session.pending = None;

        let suggestions = match result {
            Ok(body) => decode_suggestions(body),
            Err(err) => {
                debug!(%query, error = %err, "suggestion request failed");
                Vec::new()
            }
        };

        if suggestions.is_empty() {
            session.close(self.view.as_ref());
        } else {
            self.view.show(&suggestions);
            session.dropdown = suggestions;
            session.state = AutocompleteState::Showing;
        }
    }

    fn dismiss(&self) {
        let mut session = self.session();
        session.supersede();
        session.blur = None;
        session.close(self.view.as_ref());
    }
}

/// Suggestion dropdown controller for one input.
#[derive(Clone)]
pub struct Autocomplete {
    core: Arc<Core>,
    input: Debounced<String>,
}

impl Autocomplete {
    /// Controller querying `endpoint` with `?q=`, using the context's
    /// debounce delay, minimum length and blur grace.
    pub fn new(ctx: &CrmContext, endpoint: impl Into<String>, view: Arc<dyn SuggestionView>) -> Self {
        let config = ctx.config();
        let core = Arc::new(Core {
            fetcher: ctx.fetcher().clone(),
            endpoint: endpoint.into(),
            min_chars: config.autocomplete_min_chars,
            blur_grace: config.blur_grace(),
            view,
            session: Mutex::new(Session {
                state: AutocompleteState::Idle,
                generation: 0,
                pending: None,
                blur: None,
                dropdown: Vec::new(),
            }),
        });

        let searcher = Arc::clone(&core);
        let input = debounce(move |query: String| searcher.search(query), config.debounce_delay());

        Self { core, input }
    }

    pub fn endpoint(&self) -> &str {
        &self.core.endpoint
    }

    pub fn state(&self) -> AutocompleteState {
        self.core.session().state
    }

    /// Suggestions currently in the dropdown.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.core.session().dropdown.clone()
    }

    /// Debounced text change.
    pub fn on_input(&self, text: &str) {
        self.input.call(text.to_string());
    }

    /// Queries immediately, skipping the debounce.
    pub fn search_now(&self, text: &str) {
        self.input.cancel();
        self.core.search(text.to_string());
    }

    /// Schedules the dropdown's removal after the blur grace period, leaving
    /// time for a click on a suggestion to land.
    pub fn on_blur(&self) {
        let core = Arc::clone(&self.core);
        let grace = self.core.blur_grace;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            core.dismiss();
        });

        if let Some(previous) = self.core.session().blur.replace(handle) {
            previous.abort();
        }
    }

    /// Cancels a pending blur dismissal.
    pub fn on_focus(&self) {
        if let Some(handle) = self.core.session().blur.take() {
            handle.abort();
        }
    }

    /// Closes the dropdown now (Escape).
    pub fn dismiss(&self) {
        self.input.cancel();
        self.core.dismiss();
    }

    /// Writes the suggestion at `index` into the input, fires a change event
    /// and closes the dropdown. Returns `None` when nothing is shown at
    /// `index`.
    pub fn select(&self, index: usize) -> Option<Suggestion> {
        self.input.cancel();
        let mut session = self.core.session();
        let chosen = session.dropdown.get(index).cloned()?;

        session.supersede();
        if let Some(blur) = session.blur.take() {
            blur.abort();
        }
        let view = self.core.view.as_ref();
        view.set_value(&chosen.value());
        view.dispatch_change();
        session.close(view);

        Some(chosen)
    }
}
