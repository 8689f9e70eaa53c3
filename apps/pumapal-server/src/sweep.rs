//! Background removal of groups whose meeting day has passed.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::server::{today, PumaPalServer};

/// One pass against today's date. Failures are logged, never fatal.
pub async fn sweep_once(server: &PumaPalServer) -> Option<u64> {
    match server.sweep_expired(today()).await {
        Ok(deleted) => Some(deleted),
        Err(e) => {
            error!(error = %e, "expiry sweep failed");
            None
        }
    }
}

/// Sweep every `interval` until `shutdown` fires. The first pass happens one full
/// interval after start; callers run [`sweep_once`] at startup themselves.
pub async fn run_sweeper(
    server: PumaPalServer,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    info!(interval_secs = interval.as_secs(), "expiry sweeper started");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sweep_once(&server).await;
            }
            _ = shutdown.recv() => {
                info!("expiry sweeper stopped");
                break;
            }
        }
    }
}
