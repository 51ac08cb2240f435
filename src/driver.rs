//! src/driver.rs
//!
//! The sampling loop: one driver shared by every execution path.
//!
//! Each iteration, in order:
//! 1. check the cooperative cancellation flag (multi-worker runs)
//! 2. evaluate the stopping conditions against this loop's count
//! 3. pull the next argument - exhaustion stops the loop
//! 4. invoke the sampling function
//! 5. deliver the result to the sink
//!
//! Cancellation and stopping are only ever observed between iterations:
//! an in-flight call to the sampling function always completes and its
//! result is always delivered, which bounds overshoot to at most one
//! invocation per worker. Errors from the sampling function or the sink
//! abort the loop immediately.

use crate::sink::{Sink, SinkStatus};
use crate::stopping::StopSet;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};

/// Runs the loop to completion and returns the number of samples the
/// sink accepted.
pub(crate) fn drive<A, T, I, F, S>(
    f: &F,
    mut args: I,
    stop: &mut StopSet,
    shutdown: Option<&AtomicBool>,
    sink: &mut S,
) -> Result<usize>
where
    I: Iterator<Item = A>,
    F: Fn(A) -> Result<T>,
    S: Sink<T>,
{
    let mut count = 0;

    loop {
        if let Some(flag) = shutdown {
            if flag.load(Ordering::Relaxed) {
                tracing::debug!("sampling cancelled");
                break;
            }
        }

        if let Some(reason) = stop.should_stop(count) {
            tracing::debug!("stopped sampling: {}", reason);
            break;
        }

        let Some(arg) = args.next() else {
            tracing::debug!("stopped sampling: argument source exhausted");
            break;
        };

        let sample = f(arg)?;
        match sink.deliver(sample)? {
            SinkStatus::Accepted => count += 1,
            SinkStatus::Closed => break,
        }
    }

    Ok(count)
}
