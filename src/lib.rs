//! Run a sampling function repeatedly until a stopping condition is met,
//! optionally in parallel, collecting or folding the outputs.
//!
//! The sampling function is opaque to this crate: anything from drawing
//! a random variate to timing a network request. The crate's job is the
//! scheduling around it - racing heterogeneous stop signals against an
//! unbounded production loop, and, for folded runs, funneling many
//! producers into one aggregator so the accumulator never needs a lock.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────┐
//!                  │ ArgSource │ (optional; sharded round-robin)
//!                  └─────┬─────┘
//!                        │ one argument per call
//!                        ↓
//!                 ┌──────────────┐
//!                 │ sampling fn  │ (user-supplied, may block)
//!                 └──────┬───────┘
//!                        │ one sample per call
//!                        ↓
//!                  ┌───────────┐
//!                  │   Sink    │ ←──── StopSet (duration | count | memory)
//!                  └─────┬─────┘        checked between iterations
//!                        │
//!          collect       │        fold
//!       ┌────────────────┴────────────────┐
//!       ↓                                 ↓
//!  local Vec per worker,        producers ─▶ bounded channel ─▶ aggregator
//!  joined + concatenated        (batched)                      (owns acc)
//! ```
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── lib.rs       # Public re-exports + this overview
//! ├── api.rs       # sample_until / sample_until_folded entry points
//! ├── config.rs    # SampleConfig, builder, and validation
//! ├── args.rs      # ArgSource trait and round-robin sharding
//! ├── stopping.rs  # Stopping conditions and per-worker StopSets
//! ├── memory.rs    # Throttled system-memory probe
//! ├── sink.rs      # Collect / Fold / Channel sinks
//! ├── driver.rs    # The sampling loop itself
//! └── workers/
//!     ├── pool.rs     # Worker thread pool with cooperative shutdown
//!     ├── collect.rs  # Parallel collect execution
//!     └── fold.rs     # Producers + aggregator execution
//! ```
//!
//! # Example Usage
//!
//! ## Collect for a fixed duration:
//! ```no_run
//! use std::time::Duration;
//! use sample_until::{sample_until, SampleConfig};
//!
//! let config = SampleConfig::builder()
//!     .duration(Duration::from_secs(2))
//!     .num_workers(4)
//!     .build();
//!
//! let samples = sample_until(|| anyhow::Ok(expensive_measurement()), &config)?;
//! # fn expensive_measurement() -> f64 { 0.0 }
//! # anyhow::Ok(())
//! ```
//!
//! ## Fold a long run into a bounded accumulator:
//! ```no_run
//! use std::time::Duration;
//! use sample_until::{sample_until_folded, SampleConfig};
//!
//! let config = SampleConfig::builder()
//!     .duration(Duration::from_secs(60))
//!     .num_workers(8)
//!     .batch_size(64)
//!     .build();
//!
//! let (sum, count) = sample_until_folded(
//!     || anyhow::Ok(simulate_once()),
//!     |acc, x| anyhow::Ok(acc + x),
//!     0.0f64,
//!     &config,
//! )?;
//! let mean = sum / count as f64;
//! # fn simulate_once() -> f64 { 0.0 }
//! # anyhow::Ok(())
//! ```
//!
//! ## Map over a finite argument sequence in parallel:
//! ```
//! use sample_until::{sample_until_with_args, SampleConfig};
//!
//! let config = SampleConfig::builder().num_workers(2).build();
//! let inputs: Vec<u64> = (0..8).collect();
//! let outputs = sample_until_with_args(|x: u64| anyhow::Ok(x * 10), inputs, &config)?;
//! // Worker 0 processed [0, 2, 4, 6], worker 1 processed [1, 3, 5, 7];
//! // the result is both shards concatenated, not the input order.
//! assert_eq!(outputs.len(), 8);
//! # anyhow::Ok(())
//! ```
//!
//! # Guarantees and tolerances
//!
//! - Stopping is cooperative and checked only between iterations: an
//!   in-flight sampling call always completes, bounding overshoot to one
//!   call per worker.
//! - Single-worker runs with only `num_samples` set are exact.
//! - Multi-worker fold enforces `num_samples` at the aggregator against
//!   the global count; batches in flight when it fires are dropped.
//! - Any worker failure cancels the whole run; all threads are joined
//!   before the error returns.

mod api;
mod args;
mod config;
mod driver;
mod memory;
mod sink;
mod stopping;
mod workers;

pub use api::{
    sample_until, sample_until_folded, sample_until_folded_with_args, sample_until_time_elapsed,
    sample_until_with_args,
};
pub use args::{ArgSource, FnArgs};
pub use config::{SampleConfig, SampleConfigBuilder};
