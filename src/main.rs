//! CRM Client - dashboard refresher
//!
//! Keeps the dashboard metrics fresh in the background and exports the last
//! snapshot on shutdown.

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crm_client::dashboard::DashboardService;
use crm_client::export::ExportFormat;
use crm_client::{spawn_refresh_task, Config, CrmContext};

/// Main entry point for the dashboard refresher.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the client context
/// 4. Load the dashboard once, then start the background refresh task
/// 5. On SIGINT/SIGTERM, stop refreshing and export the last snapshot
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crm_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CRM client");

    let config = Config::from_env();
    info!(
        "Configuration loaded: base_url={}, cache_ttl={}ms, refresh_interval={}s",
        config.base_url, config.cache_ttl_ms, config.dashboard_refresh_secs
    );

    let ctx = CrmContext::from_config(&config).context("failed to build client context")?;
    let dashboard = DashboardService::new(&ctx);

    if dashboard.refresh_silently().await {
        info!("Dashboard loaded");
    }

    let refresh_handle = spawn_refresh_task(dashboard.clone(), config.dashboard_refresh_interval());
    info!("Background refresh task started");

    shutdown_signal().await?;

    refresh_handle.abort();
    warn!("Refresh task aborted");

    for format in [ExportFormat::Csv, ExportFormat::Json] {
        match dashboard.write_export(format, &config.export_dir).await {
            Ok(Some(path)) => info!("Dashboard exported to {}", path.display()),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "dashboard export failed"),
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("failed to install SIGTERM handler")?;

    #[cfg(unix)]
    let terminate = terminate.recv();

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<()>>();

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("failed to install Ctrl+C handler")?;
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    Ok(())
}
