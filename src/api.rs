//! src/api.rs
//!
//! Public entry points.
//!
//! # Function family
//!
//! The sampling function either takes no argument or exactly one, and its
//! outputs are either collected or folded - four combinations, one
//! function each, plus one convenience wrapper:
//!
//! - `sample_until` - no argument, collect into a `Vec`
//! - `sample_until_with_args` - one argument per call, collect
//! - `sample_until_folded` - no argument, fold into an accumulator
//! - `sample_until_folded_with_args` - one argument per call, fold
//! - `sample_until_time_elapsed` - shorthand for the most common case:
//!   collect for a fixed duration
//!
//! All of them validate the configuration up front (before any worker is
//! spawned), run until the first stopping condition fires, and release
//! every worker thread before returning - on the error path too.

use crate::args::{finiteness_of, ArgSource, Finiteness, UnitArgs};
use crate::config::SampleConfig;
use crate::workers::{collect, fold};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Runs `f` repeatedly until one of the configured conditions is met and
/// collects its outputs.
///
/// The stopping conditions might not be respected exactly: the elapsed
/// time can be slightly longer than the configured duration (by at most
/// one in-flight call per worker), and memory readings may lag by one
/// poll interval. With a single worker and only `num_samples` set, the
/// returned length is exact; with multiple workers the sample budget is
/// split evenly across them.
///
/// Workers' local sequences are concatenated in worker-index order; with
/// `num_workers > 1` the result order is unrelated to production time.
///
/// # Example
/// ```
/// use sample_until::{sample_until, SampleConfig};
///
/// let config = SampleConfig::builder().num_samples(50).build();
/// let samples = sample_until(|| anyhow::Ok(1u32), &config)?;
/// assert_eq!(samples.len(), 50);
/// assert!(samples.iter().all(|&x| x == 1));
/// # anyhow::Ok(())
/// ```
pub fn sample_until<T, F>(f: F, config: &SampleConfig) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn() -> Result<T> + Send + Sync + 'static,
{
    config.validate(Finiteness::Absent)?;
    let f = Arc::new(move |_: ()| f());
    collect::run(f, Arc::new(UnitArgs), config)
}

/// Runs `f(arg)` over arguments drawn from `f_args` until a condition is
/// met, collecting the outputs.
///
/// Arguments are partitioned round-robin across workers: worker `i`
/// receives every `num_workers`-th element starting at offset `i`, in
/// order. Running out of arguments is itself a stopping condition, so a
/// finite `f_args` needs no explicit condition.
///
/// # Example
/// ```
/// use sample_until::{sample_until_with_args, SampleConfig};
///
/// let config = SampleConfig::default();
/// let squares = sample_until_with_args(|x: u64| anyhow::Ok(x * x), vec![1u64, 2, 3], &config)?;
/// assert_eq!(squares, vec![1, 4, 9]);
/// # anyhow::Ok(())
/// ```
pub fn sample_until_with_args<A, T, S, F>(f: F, f_args: S, config: &SampleConfig) -> Result<Vec<T>>
where
    A: Send + 'static,
    T: Send + 'static,
    S: ArgSource<A> + 'static,
    F: Fn(A) -> Result<T> + Send + Sync + 'static,
{
    config.validate(finiteness_of(&f_args))?;
    collect::run(Arc::new(f), Arc::new(f_args), config)
}

/// Runs `f` repeatedly until a condition is met, folding its outputs
/// into an accumulator: `acc = fold(acc, f()?)?` starting from `init`.
///
/// Returns the final accumulator and the number of samples folded. Use
/// this instead of [`sample_until`] when collecting every sample would
/// use too much memory.
///
/// With `num_workers > 1`, samples from different producers interleave
/// arbitrarily (per-producer order is preserved), so `fold` must be
/// order-tolerant - associative and commutative - for a well-defined
/// result. The `num_samples` condition is enforced by the aggregator
/// against the global count and is exact up to batches already in
/// flight when it fires.
///
/// # Example
/// ```
/// use sample_until::{sample_until_folded, SampleConfig};
///
/// let config = SampleConfig::builder().num_samples(50).build();
/// let (sum, count) = sample_until_folded(
///     || anyhow::Ok(1u64),
///     |acc, x| anyhow::Ok(acc + x),
///     0u64,
///     &config,
/// )?;
/// assert_eq!((sum, count), (50, 50));
/// # anyhow::Ok(())
/// ```
pub fn sample_until_folded<T, Acc, F, FF>(
    f: F,
    fold: FF,
    init: Acc,
    config: &SampleConfig,
) -> Result<(Acc, usize)>
where
    T: Send + 'static,
    F: Fn() -> Result<T> + Send + Sync + 'static,
    FF: Fn(Acc, T) -> Result<Acc>,
{
    config.validate(Finiteness::Absent)?;
    let f = Arc::new(move |_: ()| f());
    fold::run(f, fold, init, Arc::new(UnitArgs), config)
}

/// Runs `f(arg)` over arguments drawn from `f_args` until a condition is
/// met, folding the outputs into an accumulator.
///
/// Combines the argument handling of [`sample_until_with_args`] with the
/// folding of [`sample_until_folded`]; the same round-robin partitioning
/// and fold-order caveats apply.
pub fn sample_until_folded_with_args<A, T, Acc, S, F, FF>(
    f: F,
    fold: FF,
    init: Acc,
    f_args: S,
    config: &SampleConfig,
) -> Result<(Acc, usize)>
where
    A: Send + 'static,
    T: Send + 'static,
    S: ArgSource<A> + 'static,
    F: Fn(A) -> Result<T> + Send + Sync + 'static,
    FF: Fn(Acc, T) -> Result<Acc>,
{
    config.validate(finiteness_of(&f_args))?;
    fold::run(Arc::new(f), fold, init, Arc::new(f_args), config)
}

/// Runs `f` repeatedly for `duration` and collects its outputs.
///
/// Shorthand for [`sample_until`] with only a duration condition.
pub fn sample_until_time_elapsed<T, F>(
    f: F,
    duration: Duration,
    num_workers: usize,
) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn() -> Result<T> + Send + Sync + 'static,
{
    let config = SampleConfig::builder()
        .duration(duration)
        .num_workers(num_workers)
        .build();
    sample_until(f, &config)
}
