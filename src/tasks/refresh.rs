//! Dashboard refresh task
//!
//! Background task that periodically reloads the dashboard metrics.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dashboard::DashboardService;

/// Spawns a task refreshing `service` every `interval`.
///
/// The first refresh happens one interval after spawning. Failures are
/// logged and the loop carries on. Abort the returned handle on shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_refresh_task(dashboard.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_refresh_task(service: DashboardService, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting dashboard refresh task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            if service.refresh_silently().await {
                debug!("dashboard refresh succeeded");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::CrmContext;

    fn service() -> DashboardService {
        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        DashboardService::new(&CrmContext::from_config(&config).unwrap())
    }

    #[tokio::test]
    async fn test_refresh_task_survives_failures() {
        let handle = spawn_refresh_task(service(), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!handle.is_finished(), "Task should keep running after failed refreshes");

        handle.abort();
    }

    #[tokio::test]
    async fn test_refresh_task_can_be_aborted() {
        let handle = spawn_refresh_task(service(), Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
