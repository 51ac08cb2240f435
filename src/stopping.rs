//! src/stopping.rs
//!
//! Stopping conditions and their evaluation.
//!
//! A `StopCondition` is a cheap predicate over run progress, evaluated at
//! every loop iteration. A `StopSet` is the disjunction of the configured
//! conditions: the run stops as soon as any member triggers. Argument
//! exhaustion and cooperative cancellation are handled by the sampling
//! loop itself, not here.
//!
//! Conditions are deliberately per-worker values (not shared): each
//! worker's `StopSet` is built from a `StopPlan`, which also encodes how
//! the `num_samples` threshold is divided across workers:
//! - collect workers each get an even share (remainder to the first
//!   workers), so the concatenated total is exact;
//! - fold producers get no sample-count condition at all - the aggregator
//!   enforces it against the true global count and cancels them;
//! - the aggregator and single-worker loops get the exact threshold.

use crate::config::SampleConfig;
use crate::memory::MemoryProbe;
use std::time::{Duration, Instant};

/// A predicate over run progress.
///
/// `should_stop` takes the evaluating loop's own sample count; time and
/// memory conditions ignore it and consult the clock or the probe.
/// Evaluation may mutate internal state (the memory probe throttles its
/// refreshes) but must stay cheap enough to call every iteration.
pub(crate) trait StopCondition: Send {
    fn should_stop(&mut self, count: usize) -> bool;

    /// Short explanation used when logging why sampling stopped.
    fn reason(&self) -> &'static str;
}

/// Triggers once the wall-clock duration since `start` is exceeded.
pub(crate) struct TimeElapsed {
    start: Instant,
    duration: Duration,
}

impl StopCondition for TimeElapsed {
    fn should_stop(&mut self, _count: usize) -> bool {
        self.start.elapsed() >= self.duration
    }

    fn reason(&self) -> &'static str {
        "time elapsed"
    }
}

/// Triggers once the loop has produced `limit` samples.
pub(crate) struct NumSamples {
    limit: usize,
}

impl StopCondition for NumSamples {
    fn should_stop(&mut self, count: usize) -> bool {
        count >= self.limit
    }

    fn reason(&self) -> &'static str {
        "number of samples reached"
    }
}

/// Triggers once system memory usage reaches the threshold fraction.
pub(crate) struct MemoryPercentage {
    probe: MemoryProbe,
    threshold: f64,
}

impl StopCondition for MemoryPercentage {
    fn should_stop(&mut self, _count: usize) -> bool {
        self.probe.usage_fraction() >= self.threshold
    }

    fn reason(&self) -> &'static str {
        "memory usage exceeded"
    }
}

/// Disjunction of stopping conditions. Empty sets never stop on their own.
pub(crate) struct StopSet {
    conditions: Vec<Box<dyn StopCondition>>,
}

impl StopSet {
    /// Returns the reason of the first triggering condition, if any.
    pub(crate) fn should_stop(&mut self, count: usize) -> Option<&'static str> {
        for condition in &mut self.conditions {
            if condition.should_stop(count) {
                return Some(condition.reason());
            }
        }
        None
    }
}

/// Per-invocation recipe for building worker `StopSet`s.
///
/// One plan is created per entry-point call, capturing the shared start
/// instant so every worker measures elapsed time from the same origin.
#[derive(Clone)]
pub(crate) struct StopPlan {
    start: Instant,
    duration: Option<Duration>,
    memory_percentage: Option<f64>,
    memory_poll_interval: Duration,
}

impl StopPlan {
    pub(crate) fn new(config: &SampleConfig, start: Instant) -> Self {
        Self {
            start,
            duration: config.duration,
            memory_percentage: config.memory_percentage,
            memory_poll_interval: config.memory_poll_interval,
        }
    }

    /// Builds a `StopSet` with the given sample-count threshold (`None`
    /// leaves the count unbounded for this worker).
    pub(crate) fn stop_set(&self, num_samples: Option<usize>) -> StopSet {
        let mut conditions: Vec<Box<dyn StopCondition>> = Vec::new();
        if let Some(duration) = self.duration {
            conditions.push(Box::new(TimeElapsed {
                start: self.start,
                duration,
            }));
        }
        if let Some(limit) = num_samples {
            conditions.push(Box::new(NumSamples { limit }));
        }
        if let Some(threshold) = self.memory_percentage {
            conditions.push(Box::new(MemoryPercentage {
                probe: MemoryProbe::new(self.memory_poll_interval),
                threshold,
            }));
        }
        StopSet { conditions }
    }
}

/// Divides `num_samples` across `num_workers` collect workers: even
/// shares, remainder to the first workers, so the shares sum exactly to
/// the requested total.
pub(crate) fn split_quota(num_samples: usize, num_workers: usize) -> Vec<usize> {
    let base = num_samples / num_workers;
    let remainder = num_samples % num_workers;
    (0..num_workers)
        .map(|worker_id| base + usize::from(worker_id < remainder))
        .collect()
}
