use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::table::ConnTable;

/// Default tick interval and idle threshold (§4.8), matching the original
/// module's `TIMEOUT_INTERVAL` of 5 seconds for both.
pub const DEFAULT_TICK: Duration = Duration::from_secs(5);
pub const DEFAULT_IDLE_THRESHOLD_SECS: u64 = 5;

/// Periodically evicts flow records idle longer than the configured
/// threshold (§4.8). Built on `tokio::time::interval` rather than a kernel
/// timer, the natural replacement in an async userspace daemon.
pub struct Reaper {
    table: Arc<ConnTable>,
    clock: Arc<Clock>,
    tick: Duration,
    idle_threshold_secs: u64,
}

impl Reaper {
    pub fn new(table: Arc<ConnTable>, clock: Arc<Clock>) -> Self {
        Reaper {
            table,
            clock,
            tick: DEFAULT_TICK,
            idle_threshold_secs: DEFAULT_IDLE_THRESHOLD_SECS,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_idle_threshold_secs(mut self, secs: u64) -> Self {
        self.idle_threshold_secs = secs;
        self
    }

    /// Runs a single reap pass synchronously, evicting every record idle
    /// longer than the threshold. Kept separate from [`Self::spawn`] so it
    /// can be exercised without a live tokio timer.
    pub fn reap_once(&self) {
        let now = self.clock.now();
        let threshold = self.idle_threshold_secs;
        let mut evicted = 0usize;
        self.table.scan(|_key, record| {
            let keep = now.saturating_sub(record.last_seen()) <= threshold;
            if !keep {
                evicted += 1;
            }
            keep
        });
        if evicted > 0 {
            debug!(target: "warden-conntrack", evicted, "reaped idle connections");
        }
    }

    /// Spawns the periodic reaping task on the current tokio runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        info!(
            target: "warden-conntrack",
            tick_secs = self.tick.as_secs(),
            idle_threshold_secs = self.idle_threshold_secs,
            "starting connection reaper"
        );
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.tick);
            loop {
                interval.tick().await;
                self.reap_once();
            }
        })
    }
}
