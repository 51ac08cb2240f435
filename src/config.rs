//! src/config.rs
//!
//! Configuration for sampling runs.
//!
//! `SampleConfig` stores the stopping conditions and the execution
//! parameters shared by every entry point.
//!
//! Example:
//! ```
//! use std::time::Duration;
//! use sample_until::SampleConfig;
//!
//! let config = SampleConfig::builder()
//!     .duration(Duration::from_secs(2))
//!     .num_samples(1000)
//!     .memory_percentage(0.8)
//!     .num_workers(4)
//!     .build();
//! ```
//!
//! # Performance considerations:
//! - `num_workers`: more workers raise throughput for CPU-bound sampling
//!   functions but multiply memory usage in collect mode
//! - `batch_size`: larger batches amortize channel transfers in folded
//!   multi-worker runs at the cost of coarser stopping granularity
//! - `prefetch_factor`: bounds how far producers may run ahead of the
//!   aggregator; higher values smooth uneven sampling times but use
//!   more memory

use crate::args::Finiteness;
use anyhow::{anyhow, Result};
use std::time::Duration;

/// How often a stale memory reading is refreshed at most.
const DEFAULT_MEMORY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration shared by all sampling entry points.
///
/// Every stopping condition is optional; absence means the condition never
/// triggers. At least one condition must be set unless the argument source
/// is known to be finite (running out of arguments stops the run on its own).
#[derive(Clone, Debug)]
pub struct SampleConfig {
    /// Stop once this much wall-clock time has elapsed.
    pub duration: Option<Duration>,
    /// Stop once this many samples have been produced.
    pub num_samples: Option<usize>,
    /// Stop once system memory usage exceeds this fraction, e.g. `0.8`.
    pub memory_percentage: Option<f64>,
    /// Number of parallel workers (1 = run in the caller's thread).
    pub num_workers: usize,
    /// Samples a producer accumulates before sending one batch to the
    /// aggregator (folded multi-worker runs only).
    pub batch_size: usize,
    /// Number of batches each producer may run ahead of the aggregator.
    pub prefetch_factor: usize,
    /// How often the memory probe refreshes its reading.
    /// Not a stopping parameter - just a polling throttle.
    pub memory_poll_interval: Duration,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            duration: None,
            num_samples: None,
            memory_percentage: None,
            num_workers: 1,
            batch_size: 1,
            prefetch_factor: 2,
            memory_poll_interval: DEFAULT_MEMORY_POLL_INTERVAL,
        }
    }
}

impl SampleConfig {
    pub fn builder() -> SampleConfigBuilder {
        SampleConfigBuilder::default()
    }

    /// True when at least one explicit stopping condition is set.
    pub fn has_stop_condition(&self) -> bool {
        self.duration.is_some() || self.num_samples.is_some() || self.memory_percentage.is_some()
    }

    /// Checks the configuration against the finiteness of the argument
    /// source. All configuration errors surface here, before any worker
    /// is spawned.
    pub(crate) fn validate(&self, feed: Finiteness) -> Result<()> {
        if let Some(duration) = self.duration {
            if duration.is_zero() {
                return Err(anyhow!("duration has to be > 0"));
            }
        }
        if self.num_samples == Some(0) {
            return Err(anyhow!("num_samples has to be > 0"));
        }
        if let Some(p) = self.memory_percentage {
            if !(0.0..=1.0).contains(&p) {
                return Err(anyhow!("memory_percentage has to be between 0 and 1"));
            }
        }
        if self.num_workers == 0 {
            return Err(anyhow!(
                "num_workers has to be >= 1 (use num_workers_auto() for one per core)"
            ));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("batch_size has to be > 0"));
        }
        if self.prefetch_factor == 0 {
            return Err(anyhow!("prefetch_factor has to be > 0"));
        }

        if !self.has_stop_condition() {
            match feed {
                Finiteness::Finite => {}
                Finiteness::Absent => {
                    return Err(anyhow!("provide at least one stopping condition"));
                }
                Finiteness::Unknown => {
                    tracing::warn!(
                        "could not determine if the argument source is finite; \
                         sampling may run indefinitely"
                    );
                }
            }
        }

        Ok(())
    }
}

/// Builder for `SampleConfig` with method chaining.
#[derive(Default)]
pub struct SampleConfigBuilder {
    config: SampleConfig,
}

impl SampleConfigBuilder {
    /// Stop after this much wall-clock time. Overshoot is bounded by the
    /// duration of one in-flight sampling call.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = Some(duration);
        self
    }

    /// Stop after this many samples (must be > 0).
    pub fn num_samples(mut self, num_samples: usize) -> Self {
        self.config.num_samples = Some(num_samples);
        self
    }

    /// Stop once system memory usage reaches this fraction of total
    /// memory (must be within `[0, 1]`).
    pub fn memory_percentage(mut self, fraction: f64) -> Self {
        self.config.memory_percentage = Some(fraction);
        self
    }

    /// Set the number of workers (must be >= 1).
    pub fn num_workers(mut self, workers: usize) -> Self {
        self.config.num_workers = workers;
        self
    }

    /// Use one worker per available CPU core.
    pub fn num_workers_auto(mut self) -> Self {
        self.config.num_workers = num_cpus::get().max(1);
        self
    }

    /// Set the producer-side transport batch size (folded runs only).
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Set how many batches each producer may buffer ahead of the
    /// aggregator.
    ///
    /// - Too low: producers stall on the channel between batches.
    /// - Too high: more samples in flight when a stop condition fires.
    pub fn prefetch_factor(mut self, factor: usize) -> Self {
        self.config.prefetch_factor = factor;
        self
    }

    /// Set the memory probe refresh throttle.
    pub fn memory_poll_interval(mut self, interval: Duration) -> Self {
        self.config.memory_poll_interval = interval;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> SampleConfig {
        self.config
    }
}
