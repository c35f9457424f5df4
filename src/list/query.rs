//! List Query State
//!
//! Pagination, sort, filter and search criteria of a list page, and their
//! serialization to request parameters and to a shareable query string.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Parameter names owned by the query itself; filters may not use them.
pub const RESERVED_PARAMS: [&str; 5] = ["page", "page_size", "search", "sort_field", "sort_direction"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

// == List Query ==
/// Criteria of one list view.
///
/// Changing search, filters or sort restarts pagination at page 1; only
/// [`ListQuery::set_page`] moves between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    page: usize,
    page_size: usize,
    search: String,
    sort_field: Option<String>,
    sort_direction: SortDirection,
    filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListQuery {
    /// Creates a query on page 1. A zero page size falls back to the default.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            search: String::new(),
            sort_field: None,
            sort_direction: SortDirection::Asc,
            filters: BTreeMap::new(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    // == Mutations ==
    pub fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_string();
        self.page = 1;
    }

    /// Sets one filter. An empty value removes it; reserved names are ignored.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        if RESERVED_PARAMS.contains(&key) {
            debug!(key, "ignoring filter on reserved parameter");
            return;
        }
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
        self.page = 1;
    }

    /// Replaces every filter, as when a filter form is submitted.
    pub fn set_filters<I, K, V>(&mut self, filters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.filters = filters
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, v)| !v.is_empty() && !RESERVED_PARAMS.contains(&k.as_str()))
            .collect();
        self.page = 1;
    }

    /// Sorts by `field`. The same field twice in a row flips the direction;
    /// a different field starts ascending.
    pub fn set_sort(&mut self, field: &str) {
        if self.sort_field.as_deref() == Some(field) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = Some(field.to_string());
            self.sort_direction = SortDirection::Asc;
        }
        self.page = 1;
    }

    /// Moves to `page` (at least 1), keeping every other criterion.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Drops search, filters and sort.
    pub fn clear(&mut self) {
        *self = Self::new(self.page_size);
    }

    // == Serialization ==
    /// Request parameters for the list endpoint.
    ///
    /// Empty search, unset sort and the default page size are omitted; the
    /// direction is always sent alongside a sort field.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("page".to_string(), self.page.to_string())];
        params.extend(self.criteria_params());
        params
    }

    /// Query string mirrored into the address bar; page 1 is left implicit.
    pub fn to_location_query(&self) -> String {
        let mut params = Vec::new();
        if self.page > 1 {
            params.push(("page".to_string(), self.page.to_string()));
        }
        params.extend(self.criteria_params());
        encode(&params)
    }

    /// Encoded form of [`ListQuery::to_query_params`].
    pub fn to_query_string(&self) -> String {
        encode(&self.to_query_params())
    }

    /// Restores a query from a shared URL's query string.
    ///
    /// Unknown parameters become filters; malformed numbers and directions
    /// fall back to their defaults.
    pub fn from_query_string(query: &str, page_size: usize) -> Self {
        let mut state = Self::new(page_size);
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => state.page = value.parse::<usize>().unwrap_or(1).max(1),
                "page_size" => {
                    if let Ok(size) = value.parse::<usize>() {
                        if size > 0 {
                            state.page_size = size;
                        }
                    }
                }
                "search" => state.search = value.trim().to_string(),
                "sort_field" if !value.is_empty() => state.sort_field = Some(value.into_owned()),
                "sort_direction" => state.sort_direction = value.parse().unwrap_or_default(),
                "sort_field" => {}
                _ if !value.is_empty() => {
                    state.filters.insert(key.to_string(), value.into_owned());
                }
                _ => {}
            }
        }

        state
    }

    fn criteria_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if self.page_size != DEFAULT_PAGE_SIZE {
            params.push(("page_size".to_string(), self.page_size.to_string()));
        }
        if !self.search.is_empty() {
            params.push(("search".to_string(), self.search.clone()));
        }
        if let Some(field) = &self.sort_field {
            params.push(("sort_field".to_string(), field.clone()));
            params.push((
                "sort_direction".to_string(),
                self.sort_direction.as_str().to_string(),
            ));
        }
        params.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}

fn encode(params: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}
