//! src/workers/collect.rs
//!
//! Collect-mode execution: every sample is kept in a vector.
//!
//! Single worker runs the loop in the caller's thread with no spawning
//! overhead. Multiple workers each collect locally over their round-robin
//! argument shard and the pool concatenates the local vectors in
//! worker-index order - so the output order matches neither the argument
//! feed nor production time across workers.

use crate::args::ArgSource;
use crate::config::SampleConfig;
use crate::driver::drive;
use crate::sink::CollectSink;
use crate::stopping::{split_quota, StopPlan};
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

pub(crate) fn run<A, T, S, F>(f: Arc<F>, args: Arc<S>, config: &SampleConfig) -> Result<Vec<T>>
where
    A: Send + 'static,
    T: Send + 'static,
    S: ArgSource<A> + 'static,
    F: Fn(A) -> Result<T> + Send + Sync + 'static,
{
    let plan = StopPlan::new(config, Instant::now());
    let num_workers = config.num_workers;

    if num_workers == 1 {
        let mut stop = plan.stop_set(config.num_samples);
        let mut sink = CollectSink::new();
        drive(f.as_ref(), args.stream(), &mut stop, None, &mut sink)?;
        return Ok(sink.into_samples());
    }

    // Each worker gets an even share of the sample budget (remainder to
    // the first workers), so the concatenated total is exact when no
    // other condition fires first.
    let quotas: Vec<Option<usize>> = match config.num_samples {
        Some(total) => split_quota(total, num_workers)
            .into_iter()
            .map(Some)
            .collect(),
        None => vec![None; num_workers],
    };

    let pool = super::pool::WorkerPool::spawn(
        num_workers,
        "sample-worker",
        move |worker_id, shutdown| {
            let mut stop = plan.stop_set(quotas[worker_id]);
            let mut sink = CollectSink::new();
            let shard = args.stream_sharded(worker_id, num_workers);
            drive(f.as_ref(), shard, &mut stop, Some(shutdown), &mut sink)?;
            Ok(sink.into_samples())
        },
    )?;

    let local_samples = pool.join()?;
    Ok(local_samples.into_iter().flatten().collect())
}
