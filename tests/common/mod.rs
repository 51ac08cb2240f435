use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Sampling function that takes roughly `delay_ms` per call and returns 1.
pub fn sleepy_unit(delay_ms: u64) -> impl Fn() -> Result<u64> + Send + Sync + 'static {
    move || -> Result<u64> {
        std::thread::sleep(Duration::from_millis(delay_ms));
        Ok(1)
    }
}

/// Sampling function that counts its invocations.
pub fn counting_unit() -> (
    Arc<AtomicUsize>,
    impl Fn() -> Result<u64> + Send + Sync + 'static,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let f = move || -> Result<u64> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    };
    (calls, f)
}
