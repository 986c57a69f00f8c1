use core::time::Duration;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::{Instant, SystemTime},
};

use super::{TimeSource, system::unix_millis};

/// Shared tick counter updated by the background thread.
#[derive(Debug)]
struct SharedTicker {
    current: AtomicU64,
}

/// A clock that never moves backward.
///
/// On construction it reads the wall clock once and spawns a ticker thread
/// that stores the elapsed monotonic time (from [`Instant`]) into an atomic
/// counter once per millisecond. [`current_millis`] adds the two, so reads
/// are a single relaxed load with no syscall, and wall-clock adjustments
/// after construction are ignored.
///
/// Clones share the ticker. The thread exits once the last clone is dropped.
///
/// # Example
///
/// ```
/// use sfid::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(5));
/// assert!(clock.current_millis() >= a);
/// ```
///
/// [`current_millis`]: TimeSource::current_millis
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTicker>,
    epoch_offset: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a clock anchored to the current wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        let start = Instant::now();
        let epoch_offset = unix_millis(SystemTime::now());

        let inner = Arc::new(SharedTicker {
            current: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&inner);
        thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(ticker) = weak.upgrade() else {
                    break;
                };

                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                // Store where we actually are, then aim for the next whole
                // millisecond after it.
                let now_ms = elapsed_millis(start);
                ticker.current.store(now_ms, Ordering::Relaxed);
                tick = now_ms + 1;
            }
        });

        Self {
            inner,
            epoch_offset,
        }
    }
}

fn elapsed_millis(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.inner.current.load(Ordering::Relaxed)
    }
}
