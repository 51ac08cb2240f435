//! src/sink.rs
//!
//! Sample sinks: where the sampling loop delivers each produced value.
//!
//! One loop implementation serves every execution path by being generic
//! over its sink:
//! - `CollectSink` appends to a growing vector (collect mode)
//! - `FoldSink` folds into the accumulator (fold mode)
//! - `ChannelSink` batches samples and ships them to the aggregator over
//!   a bounded channel (fold producers)
//!
//! A sink reports `Closed` when its downstream is gone - for
//! `ChannelSink`, when the aggregator has stopped draining and dropped
//! the receiver. The loop treats that as a stop signal, not an error.

use anyhow::{anyhow, Result};
use crossbeam_channel::Sender;
use std::mem;

/// Outcome of delivering one sample.
pub(crate) enum SinkStatus {
    /// The sample was accepted and counts toward this loop's total.
    Accepted,
    /// The downstream consumer is gone; stop producing.
    Closed,
}

pub(crate) trait Sink<T> {
    fn deliver(&mut self, sample: T) -> Result<SinkStatus>;

    /// Push out any buffered samples. Called once when the loop stops.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Appends every sample to an ordered, growing vector.
pub(crate) struct CollectSink<T> {
    samples: Vec<T>,
}

impl<T> CollectSink<T> {
    pub(crate) fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub(crate) fn into_samples(self) -> Vec<T> {
        self.samples
    }
}

impl<T> Sink<T> for CollectSink<T> {
    fn deliver(&mut self, sample: T) -> Result<SinkStatus> {
        self.samples.push(sample);
        Ok(SinkStatus::Accepted)
    }
}

/// Folds every sample into the accumulator via the user's fold function.
///
/// The accumulator is owned exclusively by this sink; the fold is applied
/// exactly once per delivered sample, in delivery order.
pub(crate) struct FoldSink<Acc, F> {
    acc: Option<Acc>,
    fold: F,
}

impl<Acc, F> FoldSink<Acc, F> {
    pub(crate) fn new(init: Acc, fold: F) -> Self {
        Self {
            acc: Some(init),
            fold,
        }
    }

    pub(crate) fn into_acc(self) -> Result<Acc> {
        self.acc
            .ok_or_else(|| anyhow!("accumulator unavailable after a failed fold"))
    }
}

impl<T, Acc, F> Sink<T> for FoldSink<Acc, F>
where
    F: Fn(Acc, T) -> Result<Acc>,
{
    fn deliver(&mut self, sample: T) -> Result<SinkStatus> {
        let acc = self
            .acc
            .take()
            .ok_or_else(|| anyhow!("fold applied after a previous failure"))?;
        self.acc = Some((self.fold)(acc, sample)?);
        Ok(SinkStatus::Accepted)
    }
}

/// Buffers samples into batches and sends them over the bounded channel
/// to the aggregator.
///
/// `send` blocks when the channel is full, so producers can never outrun
/// the aggregator by more than the channel capacity (backpressure). A
/// failed send means the aggregator dropped the receiver; the batch is
/// discarded and the producer is told to stop.
pub(crate) struct ChannelSink<T> {
    tx: Sender<Vec<T>>,
    buffer: Vec<T>,
    batch_size: usize,
}

impl<T> ChannelSink<T> {
    pub(crate) fn new(tx: Sender<Vec<T>>, batch_size: usize) -> Self {
        Self {
            tx,
            buffer: Vec::with_capacity(batch_size),
            batch_size,
        }
    }
}

impl<T> Sink<T> for ChannelSink<T> {
    fn deliver(&mut self, sample: T) -> Result<SinkStatus> {
        self.buffer.push(sample);
        if self.buffer.len() < self.batch_size {
            return Ok(SinkStatus::Accepted);
        }

        let batch = mem::replace(&mut self.buffer, Vec::with_capacity(self.batch_size));
        match self.tx.send(batch) {
            Ok(()) => Ok(SinkStatus::Accepted),
            Err(_) => Ok(SinkStatus::Closed),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        // A disconnect here means the aggregator already stopped; the
        // partial batch is dropped like any other in-flight batch.
        let _ = self.tx.send(mem::take(&mut self.buffer));
        Ok(())
    }
}
