//! List Controller
//!
//! Binds a [`ListQuery`] to one paginated list endpoint. Every user action
//! is applied to a copy of the query; the copy replaces the current state
//! only once its page has been fetched, so a failed request leaves the list
//! as it was.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info};

use crate::context::CrmContext;
use crate::error::{CrmError, Result};
use crate::export::{export_filename, write_download, ExportFormat};
use crate::fetch::{CachedFetcher, RequestOptions};
use crate::models::{BulkActionRequest, ListResponse};
use crate::notify::{Notice, Notifier};

use super::{ListQuery, Pagination};

const LOAD_FAILED: &str = "Failed to load data";

pub struct ListController {
    fetcher: CachedFetcher,
    notifier: Arc<dyn Notifier>,
    path: String,
    query: ListQuery,
    current: Option<ListResponse>,
}

impl ListController {
    /// Controller for the list served at `path`, starting on page 1.
    pub fn new(ctx: &CrmContext, path: impl Into<String>) -> Self {
        let query = ListQuery::new(ctx.config().page_size);
        Self::with_query(ctx, path, query)
    }

    /// Controller whose state is restored from an address-bar query string.
    pub fn from_location(ctx: &CrmContext, path: impl Into<String>, query_string: &str) -> Self {
        let query = ListQuery::from_query_string(query_string, ctx.config().page_size);
        Self::with_query(ctx, path, query)
    }

    fn with_query(ctx: &CrmContext, path: impl Into<String>, query: ListQuery) -> Self {
        Self {
            fetcher: ctx.fetcher().clone(),
            notifier: ctx.notifier().clone(),
            path: path.into(),
            query,
            current: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Last successfully loaded page.
    pub fn current(&self) -> Option<&ListResponse> {
        self.current.as_ref()
    }

    pub fn cache_key(&self) -> String {
        self.cache_key_for(&self.query)
    }

    /// Path plus query string to mirror into the address bar.
    pub fn location(&self) -> String {
        let query = self.query.to_location_query();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    pub fn pagination(&self) -> Pagination {
        let total = self.current.as_ref().map_or(0, |page| page.total_count);
        Pagination::new(self.query.page(), self.query.page_size(), total)
    }

    // == Loading ==
    /// Fetches the page for the current state.
    pub async fn load(&mut self) -> Result<&ListResponse> {
        self.apply(|_| {}).await
    }

    pub async fn search(&mut self, term: &str) -> Result<&ListResponse> {
        self.apply(|query| query.set_search(term)).await
    }

    pub async fn filter(&mut self, key: &str, value: &str) -> Result<&ListResponse> {
        self.apply(|query| query.set_filter(key, value)).await
    }

    /// Replaces every filter at once (filter form submit).
    pub async fn apply_filters<I, K, V>(&mut self, filters: I) -> Result<&ListResponse>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.apply(|query| query.set_filters(filters)).await
    }

    pub async fn sort(&mut self, field: &str) -> Result<&ListResponse> {
        self.apply(|query| query.set_sort(field)).await
    }

    pub async fn go_to_page(&mut self, page: usize) -> Result<&ListResponse> {
        self.apply(|query| query.set_page(page)).await
    }

    pub async fn clear_filters(&mut self) -> Result<&ListResponse> {
        self.apply(ListQuery::clear).await
    }

    async fn apply<F>(&mut self, mutate: F) -> Result<&ListResponse>
    where
        F: FnOnce(&mut ListQuery),
    {
        let mut next = self.query.clone();
        mutate(&mut next);

        let key = self.cache_key_for(&next);
        let options = RequestOptions::get()
            .queries(next.to_query_params())
            .header("X-Requested-With", "XMLHttpRequest")
            .quiet();

        match self.fetcher.fetch_json::<ListResponse>(&self.path, Some(&key), &options).await {
            Ok(page) => {
                debug!(path = %self.path, page = next.page(), rows = page.items.len(), "list loaded");
                self.query = next;
                let page = &*self.current.insert(page);
                Ok(page)
            }
            Err(err) => {
                self.notifier.notify(Notice::error(LOAD_FAILED));
                Err(err)
            }
        }
    }

    /// Drops every cached page of this list.
    pub async fn invalidate(&self) -> usize {
        let prefix = format!("list_{}_", self.path);
        self.fetcher.cache().write().await.remove_prefix(&prefix)
    }

    // == Row actions ==
    /// POSTs the selected ids to `/api/bulk-{action}/`, then reloads.
    pub async fn bulk_action<I, S>(&mut self, action: &str, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !is_path_segment(action) {
            return Err(CrmError::InvalidRequest(format!(
                "invalid bulk action: {:?}",
                action
            )));
        }

        let request = BulkActionRequest::new(ids);
        if let Some(message) = request.validate() {
            self.notifier.notify(Notice::error(message.clone()));
            return Err(CrmError::validation("ids", message));
        }

        let url = format!("/api/bulk-{}/", action);
        let options = RequestOptions::post_json(serde_json::to_value(&request)?).quiet();
        if let Err(err) = self.fetcher.cached_fetch(&url, None, &options).await {
            self.notifier.notify(Notice::error(format!("Failed to {}", action)));
            return Err(err);
        }

        info!(action, count = request.ids.len(), "bulk action completed");
        self.notifier
            .notify(Notice::success(format!("{} completed successfully", action)));
        self.invalidate().await;
        self.load().await?;
        Ok(())
    }

    /// POSTs to `{path}{id}/delete/`, then reloads.
    pub async fn delete_item(&mut self, id: &str) -> Result<()> {
        if !is_path_segment(id) {
            return Err(CrmError::InvalidRequest(format!("invalid item id: {:?}", id)));
        }

        let url = format!("{}/{}/delete/", self.path.trim_end_matches('/'), id);
        let options = RequestOptions::post().quiet();

        if let Err(err) = self.fetcher.cached_fetch(&url, None, &options).await {
            self.notifier.notify(Notice::error("Failed to delete item"));
            return Err(err);
        }

        self.notifier.notify(Notice::success("Item deleted successfully"));
        self.invalidate().await;
        self.load().await?;
        Ok(())
    }

    /// Downloads the filtered list in `format` and writes it into `dir`.
    ///
    /// Pagination and sort are not sent; the export covers every matching row.
    pub async fn export(&self, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        let mut options = RequestOptions::get()
            .query("export", format.extension())
            .queries(self.query.filters().clone())
            .quiet();
        if !self.query.search().is_empty() {
            options = options.query("search", self.query.search());
        }

        let bytes = match self.fetcher.download(&self.path, &options).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.notifier.notify(Notice::error("Failed to export data"));
                return Err(err);
            }
        };

        let filename = export_filename(format, Local::now().date_naive());
        write_download(dir, &filename, &bytes)
    }

    fn cache_key_for(&self, query: &ListQuery) -> String {
        format!("list_{}_{}", self.path, query.to_query_string())
    }
}

/// Non-empty and made of ASCII alphanumerics, `-` or `_` only.
fn is_path_segment(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
