//! src/args.rs
//!
//! Argument sources for sampling functions.
//!
//! An `ArgSource` supplies the positional argument for each invocation of
//! the sampling function. Sources are re-streamable: every worker opens
//! its own iterator and, in multi-worker runs, reads a round-robin shard
//! of the sequence so no element is sampled twice.
//!
//! Two implementations cover the common cases:
//! - `Vec<A>`: a finite, in-memory sequence (length known up front)
//! - `FnArgs`: a closure producing a fresh iterator per stream, for
//!   generated or infinite feeds
//!
//! Running out of arguments is a normal stopping condition, not an error.

/// Whether an argument source is known to end.
///
/// Used during configuration validation: a run with no explicit stopping
/// condition is only accepted when exhaustion of a finite source will end
/// it, and warned about when finiteness cannot be determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Finiteness {
    /// No argument source at all (the zero-argument entry points).
    Absent,
    /// The source cannot say whether it ends.
    Unknown,
    /// The source reports a finite length.
    Finite,
}

/// A source of input arguments for the sampling function.
///
/// Implementations must be `Send + Sync`: in multi-worker runs the source
/// is shared across worker threads and each worker opens its own stream.
///
/// # Sharding
/// `stream_sharded(shard, num_shards)` yields every `num_shards`-th
/// element starting at offset `shard`, preserving encounter order within
/// the shard. With 2 shards over `[0, 1, 2, 3, 4, 5, 6, 7]`:
/// - shard 0 reads `[0, 2, 4, 6]`
/// - shard 1 reads `[1, 3, 5, 7]`
pub trait ArgSource<A>: Send + Sync {
    /// Opens a fresh iterator over all arguments.
    fn stream(&self) -> Box<dyn Iterator<Item = A> + Send + '_>;

    /// Number of arguments this source will yield, if known.
    fn len_hint(&self) -> Option<usize> {
        None
    }

    /// Opens an iterator over one round-robin shard of the arguments.
    fn stream_sharded<'a>(&'a self, shard: usize, num_shards: usize) -> Box<dyn Iterator<Item = A> + Send + 'a>
    where
        A: 'a,
    {
        debug_assert!(num_shards > 0, "num_shards must be >= 1");
        Box::new(self.stream().skip(shard).step_by(num_shards))
    }
}

impl<A> ArgSource<A> for Vec<A>
where
    A: Clone + Send + Sync,
{
    fn stream(&self) -> Box<dyn Iterator<Item = A> + Send + '_> {
        Box::new(self.iter().cloned())
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// An argument source backed by a closure that produces a fresh iterator
/// for every stream.
///
/// Use this for generated or infinite feeds, or to hand each worker its
/// own seeded random-number generator:
///
/// ```
/// use sample_until::FnArgs;
///
/// // An infinite counter; pair it with an explicit stopping condition.
/// let args = FnArgs::new(|| 0u64..);
/// # let _ = args;
/// ```
///
/// The closure must yield the same sequence on every call: sharded
/// streams are independent re-reads of it, and round-robin partitioning
/// is only meaningful over a stable sequence.
pub struct FnArgs<F>(F);

impl<F> FnArgs<F> {
    pub fn new(make_iter: F) -> Self {
        Self(make_iter)
    }
}

impl<A, I, F> ArgSource<A> for FnArgs<F>
where
    A: Send,
    I: IntoIterator<Item = A>,
    I::IntoIter: Send + 'static,
    F: Fn() -> I + Send + Sync,
{
    fn stream(&self) -> Box<dyn Iterator<Item = A> + Send + '_> {
        Box::new((self.0)().into_iter())
    }
}

/// Internal feed for the zero-argument entry points: supplies `()`
/// forever so the one sampling loop serves both arities.
pub(crate) struct UnitArgs;

impl ArgSource<()> for UnitArgs {
    fn stream(&self) -> Box<dyn Iterator<Item = ()> + Send + '_> {
        Box::new(std::iter::repeat(()))
    }
}

/// Classifies a source for configuration validation.
pub(crate) fn finiteness_of<A, S: ArgSource<A> + ?Sized>(source: &S) -> Finiteness {
    match source.len_hint() {
        Some(_) => Finiteness::Finite,
        None => Finiteness::Unknown,
    }
}
