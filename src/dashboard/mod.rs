//! Dashboard
//!
//! Holds the latest dashboard metrics, refreshes them in the background and
//! exports them as CSV or JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::context::CrmContext;
use crate::error::Result;
use crate::export::{dashboard_csv, dashboard_filename, pretty_json, write_download, ExportFormat};
use crate::fetch::{CachedFetcher, RequestOptions};
use crate::models::DashboardMetrics;

pub const DASHBOARD_ENDPOINT: &str = "/api/dashboard-data/";

/// One successful dashboard fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    /// Body exactly as returned, for the JSON export
    pub raw: Value,
    pub metrics: DashboardMetrics,
    pub fetched_at: DateTime<Utc>,
}

/// Dashboard data source. Clones share the latest snapshot.
#[derive(Clone)]
pub struct DashboardService {
    fetcher: CachedFetcher,
    latest: Arc<RwLock<Option<DashboardSnapshot>>>,
}

impl DashboardService {
    pub fn new(ctx: &CrmContext) -> Self {
        Self {
            fetcher: ctx.fetcher().clone(),
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Fetches fresh metrics, bypassing the response cache, and keeps them
    /// as the latest snapshot. Failures raise no notice.
    pub async fn refresh(&self) -> Result<DashboardSnapshot> {
        let options = RequestOptions::get().quiet();
        let raw = self.fetcher.cached_fetch(DASHBOARD_ENDPOINT, None, &options).await?;
        let metrics: DashboardMetrics = serde_json::from_value(raw.clone())?;

        let snapshot = DashboardSnapshot {
            raw,
            metrics,
            fetched_at: Utc::now(),
        };
        *self.latest.write().await = Some(snapshot.clone());
        debug!(total_leads = snapshot.metrics.total_leads, "dashboard refreshed");

        Ok(snapshot)
    }

    /// [`refresh`](Self::refresh) with errors logged instead of returned.
    /// Returns whether the refresh succeeded.
    pub async fn refresh_silently(&self) -> bool {
        match self.refresh().await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "dashboard refresh failed");
                false
            }
        }
    }

    pub async fn latest(&self) -> Option<DashboardSnapshot> {
        self.latest.read().await.clone()
    }

    // == Export ==
    /// Renders the latest snapshot, or `None` when nothing was loaded yet.
    pub async fn export(&self, format: ExportFormat) -> Result<Option<String>> {
        let guard = self.latest.read().await;
        let Some(snapshot) = guard.as_ref() else {
            info!("no dashboard data to export");
            return Ok(None);
        };

        let body = match format {
            ExportFormat::Csv => dashboard_csv(&snapshot.metrics),
            ExportFormat::Json => pretty_json(&snapshot.raw)?,
        };
        Ok(Some(body))
    }

    /// Writes `dashboard_data.{csv,json}` into `dir`.
    pub async fn write_export(&self, format: ExportFormat, dir: &Path) -> Result<Option<PathBuf>> {
        match self.export(format).await? {
            Some(body) => Ok(Some(write_download(dir, &dashboard_filename(format), body.as_bytes())?)),
            None => Ok(None),
        }
    }
}
