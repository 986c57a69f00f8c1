use core::time::Duration;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// This abstraction lets the generator run against the system clock, a
/// monotonic ticker, or a mocked clock in tests.
///
/// # Example
///
/// ```
/// use sfid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

/// Blocks the calling thread for a given [`Duration`].
///
/// The generator sleeps through this trait while it waits for the clock to
/// catch up after the sequence wraps, so tests can advance a mock clock
/// instead of sleeping.
pub trait SleepProvider {
    /// Blocks the calling thread for at least `dur`.
    fn sleep_for(&self, dur: Duration);
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<S: SleepProvider + ?Sized> SleepProvider for &S {
    fn sleep_for(&self, dur: Duration) {
        (**self).sleep_for(dur);
    }
}
