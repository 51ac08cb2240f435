//! src/workers/fold.rs
//!
//! Fold-mode execution: samples are folded into one accumulator.
//!
//! With `num_workers = N`, the caller's thread is the aggregator and N-1
//! producer threads sample into a shared bounded channel. The aggregator
//! is the only owner of the accumulator, so the fold needs no locking;
//! it also alone enforces the `num_samples` condition, against the true
//! global count, and cancels the producers when any of its conditions
//! fires. Batches still in flight at that point are dropped - that is
//! the documented overshoot/undershoot of multi-worker folding.
//!
//! `num_workers = 1` degenerates to the aggregator sampling on its own:
//! a plain single-threaded fold with no channel involved.
//!
//! Channel-closing doubles as the completion protocol: every producer
//! drops its sender when its loop stops, and a disconnected receive
//! tells the aggregator that all producers are done.

use crate::args::ArgSource;
use crate::config::SampleConfig;
use crate::driver::drive;
use crate::sink::{ChannelSink, FoldSink, Sink};
use crate::stopping::StopPlan;
use anyhow::Result;
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long the aggregator waits for a batch before re-checking its own
/// stopping conditions. Keeps duration/memory conditions responsive even
/// when producers are slow.
const AGGREGATOR_RECV_TIMEOUT_MS: u64 = 100;

pub(crate) fn run<A, T, Acc, S, F, FF>(
    f: Arc<F>,
    fold: FF,
    init: Acc,
    args: Arc<S>,
    config: &SampleConfig,
) -> Result<(Acc, usize)>
where
    A: Send + 'static,
    T: Send + 'static,
    S: ArgSource<A> + 'static,
    F: Fn(A) -> Result<T> + Send + Sync + 'static,
    FF: Fn(Acc, T) -> Result<Acc>,
{
    let plan = StopPlan::new(config, Instant::now());
    let num_producers = config.num_workers - 1;

    // No producers: the aggregator samples itself, no channel involved.
    if num_producers == 0 {
        let mut stop = plan.stop_set(config.num_samples);
        let mut sink = FoldSink::new(init, fold);
        let count = drive(f.as_ref(), args.stream(), &mut stop, None, &mut sink)?;
        return Ok((sink.into_acc()?, count));
    }

    let capacity = num_producers * config.prefetch_factor * config.batch_size;
    let (batch_tx, batch_rx) = bounded::<Vec<T>>(capacity);
    let batch_size = config.batch_size;

    let pool = super::pool::WorkerPool::spawn(num_producers, "sample-producer", {
        let plan = plan.clone();
        move |worker_id, shutdown| {
            // Producers carry no sample-count condition: the aggregator
            // enforces it globally and cancels them through `shutdown`.
            let mut stop = plan.stop_set(None);
            let mut sink = ChannelSink::new(batch_tx.clone(), batch_size);
            let shard = args.stream_sharded(worker_id, num_producers);
            drive(f.as_ref(), shard, &mut stop, Some(shutdown), &mut sink)?;
            sink.flush()?;
            Ok(())
        }
    })?;

    let mut stop = plan.stop_set(config.num_samples);
    let mut sink = FoldSink::new(init, fold);
    let mut count = 0usize;

    'drain: loop {
        if let Some(reason) = stop.should_stop(count) {
            tracing::debug!("stopped aggregating: {}", reason);
            break 'drain;
        }

        match batch_rx.recv_timeout(Duration::from_millis(AGGREGATOR_RECV_TIMEOUT_MS)) {
            Ok(batch) => {
                for sample in batch {
                    match sink.deliver(sample) {
                        Ok(_) => count += 1,
                        Err(e) => {
                            // Release the producers before surfacing the
                            // fold failure: cancel, unblock any sender
                            // parked on the full channel, then join.
                            pool.cancel();
                            drop(batch_rx);
                            if let Err(join_err) = pool.join() {
                                tracing::warn!(
                                    "producer shutdown after fold failure also failed: {:#}",
                                    join_err
                                );
                            }
                            return Err(e);
                        }
                    }
                    if let Some(reason) = stop.should_stop(count) {
                        tracing::debug!("stopped aggregating: {}", reason);
                        break 'drain;
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("all producers finished");
                break 'drain;
            }
        }
    }

    pool.cancel();
    drop(batch_rx);
    pool.join()?;

    Ok((sink.into_acc()?, count))
}
