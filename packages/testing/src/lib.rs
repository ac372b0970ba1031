#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in the pool packages.

use std::sync::atomic::{self, AtomicUsize};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use recycle_pool::Reset;

/// Runs a test with a timeout to prevent infinite hangs.
///
/// Tests that block on pool acquisition can hang forever if a release is lost. This wraps the
/// test closure so a hang turns into a panic instead of a stuck CI job.
///
/// The timeout is 10 seconds under normal conditions and 60 seconds under Miri, where thread
/// synchronization primitives are significantly slower.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the watchdog is disabled and
/// the test function is executed directly, so mutation testing can detect hanging mutations.
///
/// # Panics
///
/// Panics if the test exceeds the timeout (when not in mutation testing mode).
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        let result = test_fn();
        // If this fails, the receiver has already timed out.
        drop(tx.send(result));
    });

    let timeout = if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(10)
    };

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            test_handle.join().expect("test thread should not panic");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test exceeded {timeout:?} timeout");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("test thread disconnected unexpectedly"),
            Err(e) => std::panic::resume_unwind(e),
        },
    }
}

/// Runs `f` and returns its result together with how long it took.
pub fn timed<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// A pooled test item that tracks how many instances of it are alive at the same time.
///
/// Every instance shares a [`LiveCounter`]. Construction increments it and dropping decrements
/// it, so a test can observe the true number of live instances independently of what the
/// pool reports about itself.
#[derive(Debug)]
pub struct Tracked {
    counter: LiveCounter,

    /// Caller-visible state that must be cleared on reset.
    pub payload: Vec<u8>,
}

impl Tracked {
    /// Creates a new instance registered with `counter`.
    #[must_use]
    pub fn new(counter: &LiveCounter) -> Self {
        let live = counter
            .live
            .fetch_add(1, atomic::Ordering::SeqCst)
            .wrapping_add(1);
        counter.peak.fetch_max(live, atomic::Ordering::SeqCst);

        Self {
            counter: counter.clone(),
            payload: Vec::new(),
        }
    }
}

impl Reset for Tracked {
    fn reset(&mut self) {
        self.payload.clear();
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counter.live.fetch_sub(1, atomic::Ordering::SeqCst);
    }
}

/// Counts live [`Tracked`] instances and remembers the highest count ever observed.
#[derive(Clone, Debug, Default)]
pub struct LiveCounter {
    live: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl LiveCounter {
    /// Creates a counter with no live instances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of instances alive right now.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.load(atomic::Ordering::SeqCst)
    }

    /// The highest number of instances that were ever alive at the same time.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(atomic::Ordering::SeqCst)
    }
}
