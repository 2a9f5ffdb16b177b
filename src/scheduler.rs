//! Periodic hotspot scan
//!
//! One pass per interval, run on the blocking pool. The loop awaits each
//! pass before the next tick, so scheduled passes never overlap each other;
//! overlap with on-demand API passes is prevented by the service's pass lock.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::bma::BmaService;

pub struct HotspotScheduler {
    service: Arc<BmaService>,
    period: Duration,
    cycles: u64,
}

impl HotspotScheduler {
    pub fn new(service: Arc<BmaService>, period: Duration) -> Self {
        Self {
            service,
            period,
            cycles: 0,
        }
    }

    /// Scheduler using the service's configured scan interval.
    pub fn from_config(service: Arc<BmaService>) -> Self {
        let secs = service.config().hotspot.scan_interval_secs.max(1);
        Self::new(service, Duration::from_secs(secs))
    }

    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one detection pass. Errors are logged, never propagated.
    pub async fn run_cycle(&mut self) {
        self.cycles += 1;
        let cycle = self.cycles;
        let service = Arc::clone(&self.service);

        match tokio::task::spawn_blocking(move || service.identify_hotspots()).await {
            Ok(Ok(scan)) => {
                if !scan.failures.is_empty() {
                    warn!(
                        cycle,
                        failures = scan.failures.len(),
                        "[HotspotScheduler] Some alerts could not be stored"
                    );
                }
            }
            Ok(Err(e)) => error!(cycle, error = %e, "[HotspotScheduler] Scan failed"),
            Err(e) => error!(cycle, error = %e, "[HotspotScheduler] Scan task panicked"),
        }
    }

    /// Tick until `cancel` fires. Returns the number of cycles run.
    pub async fn run(mut self, cancel: CancellationToken) -> u64 {
        info!(period = ?self.period, "[HotspotScheduler] Task starting");

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!(cycles = self.cycles, "[HotspotScheduler] Received shutdown signal");
                    return self.cycles;
                }
                _ = interval.tick() => self.run_cycle().await,
            }
        }
    }
}
