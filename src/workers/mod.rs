//! src/workers/mod.rs
//!
//! Parallel execution of sampling loops.
//!
//! ```text
//! collect mode                          fold mode
//! ------------                          ---------
//!  worker 0 ──▶ Vec ┐                    producer 0 ──▶ ┐
//!  worker 1 ──▶ Vec ├─ join, concat      producer 1 ──▶ ├─ bounded channel ──▶ aggregator
//!  worker 2 ──▶ Vec ┘  (worker order)    producer 2 ──▶ ┘  (batches)            (caller's
//!                                                                                thread, owns acc)
//! ```
//!
//! Collect workers are fully independent: each runs its own loop over its
//! round-robin argument shard with its own stopping conditions and local
//! vector; the pool joins them in worker-index order and concatenates.
//!
//! Fold producers ship batches to a single aggregator instead, so the
//! accumulator has exactly one owner and needs no synchronization. The
//! aggregator enforces the global sample count and cancels producers via
//! the pool's shared shutdown flag.

pub(crate) mod collect;
pub(crate) mod fold;
pub(crate) mod pool;
