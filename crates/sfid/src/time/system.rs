use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{SleepProvider, TimeSource};

/// Reads [`SystemTime::now`] on every call.
///
/// Follows wall-clock adjustments, so it can move backward. The generator
/// tolerates that by continuing its own sequence until the clock passes the
/// last timestamp it issued.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    /// Milliseconds since the Unix epoch, or 0 if the system clock is set
    /// before 1970.
    fn current_millis(&self) -> u64 {
        unix_millis(SystemTime::now())
    }
}

pub(crate) fn unix_millis(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Sleeps with [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl SleepProvider for ThreadSleep {
    fn sleep_for(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}
