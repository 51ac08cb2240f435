//! Worker lifecycle and concurrency behavior.
//!
//! Tests cover:
//! - Cancellation boundaries (dispatched calls always complete)
//! - Failure handling (errors and panics cancel siblings and surface)
//! - Thread cleanup (no sampling continues after a call returns)

mod common;
use common::{counting_unit, sleepy_unit};

use anyhow::{anyhow, Result};
use sample_until::{
    sample_until, sample_until_folded, sample_until_folded_with_args, SampleConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn no_sampling_continues_after_return() -> Result<()> {
    let (calls, f) = counting_unit();
    let config = SampleConfig::builder()
        .num_samples(200)
        .num_workers(4)
        .build();

    let samples = sample_until(f, &config)?;
    assert_eq!(samples.len(), 200);

    let after_return = calls.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(
        calls.load(Ordering::SeqCst),
        after_return,
        "worker threads kept sampling after the call returned"
    );
    Ok(())
}

#[test]
fn dispatched_calls_always_complete() -> Result<()> {
    // A stop signal may only be observed between iterations: every call
    // that starts must finish, even when the aggregator cancels early.
    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let f = {
        let started = started.clone();
        let finished = finished.clone();
        move || -> Result<u64> {
            started.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(1));
            finished.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        }
    };

    let config = SampleConfig::builder()
        .num_samples(50)
        .num_workers(4)
        .build();
    let (_, count) = sample_until_folded(f, |acc, x: u64| Ok(acc + x), 0u64, &config)?;

    assert_eq!(count, 50);
    assert_eq!(
        started.load(Ordering::SeqCst),
        finished.load(Ordering::SeqCst),
        "a sampling call was abandoned mid-invocation"
    );
    Ok(())
}

#[test]
fn worker_error_cancels_siblings_and_surfaces() {
    let calls = Arc::new(AtomicUsize::new(0));
    let f = {
        let calls = calls.clone();
        move || -> Result<u64> {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 50 {
                return Err(anyhow!("sampling function failed"));
            }
            std::thread::sleep(Duration::from_millis(1));
            Ok(1)
        }
    };

    let config = SampleConfig::builder()
        .duration(Duration::from_secs(30))
        .num_workers(4)
        .build();
    let err = sample_until(f, &config).unwrap_err();
    assert!(format!("{:#}", err).contains("sampling function failed"));

    // All workers were joined before the error returned.
    let after_return = calls.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(calls.load(Ordering::SeqCst), after_return);
}

#[test]
fn worker_panic_surfaces_as_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let f = {
        let calls = calls.clone();
        move || -> Result<u64> {
            if calls.fetch_add(1, Ordering::SeqCst) == 20 {
                panic!("sampling function panicked");
            }
            Ok(1)
        }
    };

    let config = SampleConfig::builder()
        .duration(Duration::from_secs(30))
        .num_workers(4)
        .build();
    let err = sample_until(f, &config).unwrap_err();
    assert!(format!("{:#}", err).contains("panicked"));
}

#[test]
fn failing_producer_aborts_a_parallel_fold() {
    // One shard contains the poisoned argument; the aggregator must not
    // return a partial accumulator.
    let args: Vec<u64> = (0..1000).collect();
    let config = SampleConfig::builder().num_workers(4).build();
    let result = sample_until_folded_with_args(
        |x: u64| {
            if x == 500 {
                Err(anyhow!("poisoned argument"))
            } else {
                Ok(x)
            }
        },
        |acc, x: u64| Ok(acc + x),
        0u64,
        args,
        &config,
    );
    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("poisoned argument"));
}

#[test]
fn slow_sampling_does_not_block_cancellation_forever() -> Result<()> {
    // Cancellation latency is bounded by one in-flight call.
    let config = SampleConfig::builder()
        .num_samples(8)
        .num_workers(4)
        .build();
    let start = std::time::Instant::now();
    let samples = sample_until(sleepy_unit(20), &config)?;
    assert_eq!(samples.len(), 8);
    // 2 samples per worker at ~20ms each, plus slack.
    assert!(start.elapsed() < Duration::from_secs(5));
    Ok(())
}

#[test]
fn single_worker_runs_in_the_callers_thread() -> Result<()> {
    let caller = std::thread::current().id();
    let seen = Arc::new(std::sync::Mutex::new(None));
    let f = {
        let seen = seen.clone();
        move || -> Result<u64> {
            *seen.lock().unwrap() = Some(std::thread::current().id());
            Ok(1)
        }
    };

    let config = SampleConfig::builder().num_samples(1).build();
    sample_until(f, &config)?;
    assert_eq!(*seen.lock().unwrap(), Some(caller));
    Ok(())
}
