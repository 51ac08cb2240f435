//! src/memory.rs
//!
//! Throttled system-memory probe backing the `memory_percentage`
//! stopping condition.
//!
//! Reading system memory on every loop iteration would dominate cheap
//! sampling functions, so the probe caches its last reading and refreshes
//! at most once per `refresh_interval`. A reading may therefore be stale
//! by up to one interval.

use std::time::{Duration, Instant};
use sysinfo::{System, SystemExt};

/// Reports the fraction of total system memory currently in use.
pub(crate) struct MemoryProbe {
    system: System,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
    cached: f64,
}

impl MemoryProbe {
    pub(crate) fn new(refresh_interval: Duration) -> Self {
        Self {
            system: System::new(),
            refresh_interval,
            last_refresh: None,
            cached: 0.0,
        }
    }

    /// Current memory usage as a fraction in `[0, 1]`.
    ///
    /// Platforms where no total memory is reported read as `0.0`, so the
    /// condition never fires there rather than stopping every run.
    pub(crate) fn usage_fraction(&mut self) -> f64 {
        let stale = self
            .last_refresh
            .map_or(true, |at| at.elapsed() >= self.refresh_interval);

        if stale {
            self.system.refresh_memory();
            let total = self.system.total_memory();
            self.cached = if total == 0 {
                0.0
            } else {
                self.system.used_memory() as f64 / total as f64
            };
            self.last_refresh = Some(Instant::now());
        }

        self.cached
    }
}
