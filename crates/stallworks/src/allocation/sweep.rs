use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::repository::{ActivityLog, AllocationStore, NotificationGateway};
use super::service::StallAllocationService;
use crate::config::SweepConfig;

/// Spawn the two recurring duties on their own tickers: session expiry
/// on a short poll, rejected-paperwork cleanup on a daily cadence. Both
/// go through the same transactional store as request traffic, so they
/// can safely race operator actions.
pub fn spawn_sweeps<S, N, L>(
    service: Arc<StallAllocationService<S, N, L>>,
    config: SweepConfig,
) -> (JoinHandle<()>, JoinHandle<()>)
where
    S: AllocationStore + 'static,
    N: NotificationGateway + 'static,
    L: ActivityLog + 'static,
{
    let expiry = {
        let service = service.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.session_poll);
            loop {
                ticker.tick().await;
                match service.run_expiry_sweep(Utc::now()) {
                    Ok(report) if report.touched() > 0 => {
                        info!(
                            closed_won = report.closed_won,
                            cancelled = report.cancelled,
                            skipped = report.skipped,
                            failures = report.failures,
                            "expiry sweep finished"
                        );
                    }
                    Ok(_) => {}
                    Err(error) => error!(error = %error, "expiry sweep aborted"),
                }
            }
        })
    };

    let cleanup = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.cleanup_poll);
        loop {
            ticker.tick().await;
            match service.run_cleanup_sweep(Utc::now()) {
                Ok(report) if report.purged + report.failures > 0 => {
                    info!(
                        purged = report.purged,
                        skipped = report.skipped,
                        failures = report.failures,
                        "cleanup sweep finished"
                    );
                }
                Ok(_) => {}
                Err(error) => error!(error = %error, "cleanup sweep aborted"),
            }
        }
    });

    (expiry, cleanup)
}
