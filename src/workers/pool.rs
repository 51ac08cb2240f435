//! src/workers/pool.rs
//!
//! Thread pool for parallel sampling.
//!
//! Manages worker lifecycle and cooperative shutdown:
//! - Named worker threads (`sample-worker-3`) for debuggability
//! - One shared shutdown flag, polled by every loop at iteration
//!   boundaries
//! - A worker that fails flips the flag, so its siblings stop at their
//!   next boundary instead of running to their own conditions
//! - `join` collects results in worker-index order and converts panics
//!   into errors; the first failure surfaces only after every handle has
//!   been joined, so the error path never leaks threads

use anyhow::{anyhow, Context, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// A set of worker threads running the same worker function.
///
/// # Type parameter
/// - `R`: the per-worker result joined back into the caller
pub(crate) struct WorkerPool<R> {
    workers: Vec<thread::JoinHandle<Result<R>>>,
    shutdown: Arc<AtomicBool>,
}

impl<R> WorkerPool<R>
where
    R: Send + 'static,
{
    /// Spawns `num_workers` threads, each running
    /// `worker_fn(worker_id, &shutdown)`.
    pub(crate) fn spawn<W>(num_workers: usize, name_prefix: &str, worker_fn: W) -> Result<Self>
    where
        W: Fn(usize, &AtomicBool) -> Result<R> + Send + Sync + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_fn = Arc::new(worker_fn);
        let mut workers = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let shutdown = Arc::clone(&shutdown);
            let worker_fn = Arc::clone(&worker_fn);

            let handle = thread::Builder::new()
                .name(format!("{}-{}", name_prefix, worker_id))
                .spawn(move || {
                    // Panics are caught so a crashing worker still cancels
                    // its siblings instead of leaving them to run out their
                    // own stopping conditions.
                    let result =
                        match catch_unwind(AssertUnwindSafe(|| worker_fn(worker_id, &shutdown))) {
                            Ok(result) => result,
                            Err(_) => Err(anyhow!("worker panicked")),
                        };
                    if result.is_err() {
                        // Siblings stop at their next iteration boundary.
                        shutdown.store(true, Ordering::Relaxed);
                    }
                    result
                })
                .with_context(|| format!("failed to spawn worker thread {}", worker_id))?;

            workers.push(handle);
        }

        Ok(Self { workers, shutdown })
    }

    /// Asks every worker to stop at its next iteration boundary.
    pub(crate) fn cancel(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Joins all workers in worker-index order.
    ///
    /// Every handle is joined before any error is returned; the first
    /// failing worker's error (by index) wins.
    pub(crate) fn join(mut self) -> Result<Vec<R>> {
        let mut results = Vec::with_capacity(self.workers.len());
        let mut first_failure: Option<anyhow::Error> = None;

        for (worker_id, handle) in self.workers.drain(..).enumerate() {
            match handle.join() {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) => {
                    if first_failure.is_none() {
                        first_failure = Some(e.context(format!("worker {} failed", worker_id)));
                    }
                }
                Err(_) => {
                    if first_failure.is_none() {
                        first_failure = Some(anyhow!("worker {} panicked", worker_id));
                    }
                }
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }
}

impl<R> Drop for WorkerPool<R> {
    fn drop(&mut self) {
        // Signal shutdown to all workers, then wait for them. After a
        // normal `join` the handle list is already empty.
        self.shutdown.store(true, Ordering::Relaxed);
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
