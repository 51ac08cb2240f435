//! Argument-feed behavior: finite sources, generated sources, and
//! round-robin partitioning across workers.

use anyhow::Result;
use sample_until::{sample_until_with_args, FnArgs, SampleConfig};

#[test]
fn finite_args_stop_the_run_on_their_own() -> Result<()> {
    let args: Vec<u64> = (0..100).collect();
    let samples = sample_until_with_args(|x: u64| Ok(x), args, &SampleConfig::default())?;
    assert_eq!(samples, (0..100).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn generated_args_of_unknown_length_still_run() -> Result<()> {
    // The source cannot report a length, so the run is accepted with a
    // warning and ends when the iterator does.
    let args = FnArgs::new(|| 0u64..100);
    let samples = sample_until_with_args(|x: u64| Ok(x), args, &SampleConfig::default())?;
    assert_eq!(samples, (0..100).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn num_samples_truncates_a_finite_feed() -> Result<()> {
    let args: Vec<u64> = (0..100).collect();
    let config = SampleConfig::builder().num_samples(50).build();
    let samples = sample_until_with_args(|x: u64| Ok(x), args, &config)?;
    assert_eq!(samples, (0..50).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn infinite_generator_with_num_samples() -> Result<()> {
    let args = FnArgs::new(|| 0u64..);
    let config = SampleConfig::builder().num_samples(50).build();
    let samples = sample_until_with_args(|x: u64| Ok(x), args, &config)?;
    assert_eq!(samples, (0..50).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn two_workers_partition_round_robin() -> Result<()> {
    let args: Vec<u64> = (0..8).collect();
    let config = SampleConfig::builder().num_workers(2).build();
    let samples = sample_until_with_args(|x: u64| Ok(x), args, &config)?;
    // Worker 0 reads [0, 2, 4, 6], worker 1 reads [1, 3, 5, 7]; local
    // outputs are concatenated in worker-index order.
    assert_eq!(samples, vec![0, 2, 4, 6, 1, 3, 5, 7]);
    Ok(())
}

#[test]
fn multi_worker_total_covers_the_whole_feed() -> Result<()> {
    let args: Vec<u64> = (0..103).collect();
    let config = SampleConfig::builder().num_workers(4).build();
    let mut samples = sample_until_with_args(|x: u64| Ok(x), args, &config)?;
    samples.sort_unstable();
    assert_eq!(samples, (0..103).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn more_workers_than_arguments() -> Result<()> {
    let args: Vec<u64> = vec![10, 20, 30];
    let config = SampleConfig::builder().num_workers(8).build();
    let samples = sample_until_with_args(|x: u64| Ok(x), args, &config)?;
    assert_eq!(samples, vec![10, 20, 30]);
    Ok(())
}

#[test]
fn empty_feed_yields_nothing() -> Result<()> {
    let args: Vec<u64> = Vec::new();
    let samples = sample_until_with_args(|x: u64| Ok(x), args, &SampleConfig::default())?;
    assert!(samples.is_empty());
    Ok(())
}

#[test]
fn arguments_can_carry_per_worker_state() -> Result<()> {
    // The documented way to give each worker distinct randomness: ship
    // seeds through the argument feed.
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn draw(seed: u64) -> Result<u32> {
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(rng.random::<u32>())
    }

    let seeds: Vec<u64> = (0..16).collect();
    let config = SampleConfig::builder().num_workers(4).build();

    let mut parallel = sample_until_with_args(draw, seeds.clone(), &config)?;
    let mut serial = sample_until_with_args(draw, seeds, &SampleConfig::default())?;
    parallel.sort_unstable();
    serial.sort_unstable();
    assert_eq!(parallel, serial);
    Ok(())
}
