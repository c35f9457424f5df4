//! Autocomplete
//!
//! Debounced, cancellable suggestion lookups for item and prospect inputs.

mod controller;
mod suggestion;

pub use controller::{Autocomplete, AutocompleteState, SuggestionView};
pub use suggestion::{decode_suggestions, Suggestion};

/// Item search endpoint.
pub const ITEM_SEARCH_ENDPOINT: &str = "/api/search-items/";
/// Prospect search endpoint.
pub const PROSPECT_SEARCH_ENDPOINT: &str = "/api/search-prospects/";
