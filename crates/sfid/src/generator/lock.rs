use core::time::Duration;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::mutex::Mutex;
use crate::{Error, Field, Result, Sfid, SleepProvider, ThreadSleep, TimeSource};

/// The part of the generator guarded by the lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct State {
    pub(crate) timestamp: u64,
    pub(crate) sequence: u32,
}

/// A lock-based generator of monotonically increasing [`Sfid`]s.
///
/// The last issued timestamp and sequence live behind an [`Arc<Mutex<_>>`],
/// so the generator (and any clone of it) can be shared across threads. The
/// node and nonce are fixed at construction and stamped into every id.
///
/// Within one generator, an id returned before another call starts always
/// compares less than the id that call returns. When the clock has not moved
/// past the last issued timestamp, the sequence is incremented instead. If
/// the sequence wraps, the generator moves to the next millisecond and blocks
/// the calling thread, still holding the lock, until the clock reaches it.
///
/// ## See Also
/// - [`MonotonicClock`] for a clock that cannot move backward
/// - [`random_nonce`] for a per-process nonce
///
/// [`MonotonicClock`]: crate::MonotonicClock
/// [`random_nonce`]: crate::random_nonce
pub struct SfidGenerator<T, S = ThreadSleep>
where
    T: TimeSource,
    S: SleepProvider,
{
    pub(crate) state: Arc<Mutex<State>>,
    node: u16,
    nonce: u64,
    time: T,
    sleep: S,
}

impl<T> SfidGenerator<T, ThreadSleep>
where
    T: TimeSource,
{
    /// Creates a generator that sleeps with [`std::thread::sleep`].
    ///
    /// The internal timestamp and sequence start at zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `nonce` exceeds [`Sfid::MAX_NONCE`].
    ///
    /// # Example
    ///
    /// ```
    /// use sfid::{SfidGenerator, SystemClock};
    ///
    /// let generator = SfidGenerator::new(100, 123_456_789, SystemClock)?;
    /// let id = generator.try_next_id()?;
    /// assert_eq!(id.node(), 100);
    /// assert_eq!(id.nonce(), 123_456_789);
    /// # Ok::<(), sfid::Error>(())
    /// ```
    pub fn new(node: u16, nonce: u64, time: T) -> Result<Self> {
        Self::with_sleep(node, nonce, time, ThreadSleep)
    }
}

impl<T, S> SfidGenerator<T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    /// Creates a generator with a custom [`SleepProvider`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `nonce` exceeds [`Sfid::MAX_NONCE`].
    pub fn with_sleep(node: u16, nonce: u64, time: T, sleep: S) -> Result<Self> {
        Self::from_components(node, nonce, 0, 0, time, sleep)
    }

    /// Creates a generator preloaded with a previously issued timestamp and
    /// sequence, e.g. to resume after a restart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `nonce`, `timestamp` or `sequence`
    /// does not fit its field.
    pub fn from_components(
        node: u16,
        nonce: u64,
        timestamp: u64,
        sequence: u32,
        time: T,
        sleep: S,
    ) -> Result<Self> {
        if nonce > Sfid::MAX_NONCE {
            return Err(Error::out_of_range(Field::Nonce, nonce, Sfid::MAX_NONCE));
        }
        if timestamp > Sfid::MAX_TIMESTAMP {
            return Err(Error::out_of_range(
                Field::Timestamp,
                timestamp,
                Sfid::MAX_TIMESTAMP,
            ));
        }
        if sequence > Sfid::MAX_SEQUENCE {
            return Err(Error::out_of_range(
                Field::Sequence,
                u64::from(sequence),
                u64::from(Sfid::MAX_SEQUENCE),
            ));
        }
        Ok(Self {
            state: Arc::new(Mutex::new(State {
                timestamp,
                sequence,
            })),
            node,
            nonce,
            time,
            sleep,
        })
    }

    /// The node id stamped into every generated id.
    pub const fn node(&self) -> u16 {
        self.node
    }

    /// The nonce stamped into every generated id.
    pub const fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Generates the next id.
    ///
    /// Blocks only when the per-millisecond sequence is exhausted, until the
    /// clock reaches the next millisecond.
    ///
    /// # Panics
    ///
    /// Panics once the last millisecond of the 48-bit timestamp range
    /// ([`Sfid::MAX_TIMESTAMP`], year 10889) has used up its sequence. Use
    /// [`Self::try_next_id`] to get an error instead.
    ///
    /// # Example
    ///
    /// ```
    /// use sfid::{MonotonicClock, SfidGenerator};
    ///
    /// let generator = SfidGenerator::new(7, 42, MonotonicClock::new())?;
    /// let a = generator.next_id();
    /// let b = generator.next_id();
    /// assert!(a < b);
    /// # Ok::<(), sfid::Error>(())
    /// ```
    #[cfg_attr(docsrs, doc(cfg(feature = "parking-lot")))]
    #[cfg(feature = "parking-lot")]
    #[track_caller]
    pub fn next_id(&self) -> Sfid {
        match self.try_next_id() {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Generates the next id, reporting failures instead of panicking.
    ///
    /// Clock readings above [`Sfid::MAX_TIMESTAMP`] are treated as
    /// [`Sfid::MAX_TIMESTAMP`], so ids never wrap back to timestamp 0.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfRange`] for [`Field::Timestamp`] once the sequence of
    ///   the last representable millisecond is exhausted. The state is left
    ///   unchanged, so every later call fails the same way.
    /// - With the standard library mutex, [`Error::LockPoisoned`] if another
    ///   thread panicked while holding the lock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<Sfid> {
        let now = self.time.current_millis().min(Sfid::MAX_TIMESTAMP);
        let (timestamp, sequence) = {
            #[cfg(feature = "parking-lot")]
            let mut state = self.state.lock();
            #[cfg(not(feature = "parking-lot"))]
            let mut state = self.state.lock()?;
            self.advance(&mut state, now)?
        };
        Ok(Sfid::from_parts(timestamp, self.node, self.nonce, sequence))
    }

    /// Moves the locked state forward and returns the pair to stamp.
    fn advance(&self, state: &mut State, now: u64) -> Result<(u64, u32)> {
        if now > state.timestamp {
            state.timestamp = now;
            state.sequence = 0;
        } else if state.sequence < Sfid::MAX_SEQUENCE {
            state.sequence += 1;
        } else if state.timestamp < Sfid::MAX_TIMESTAMP {
            state.timestamp += 1;
            state.sequence = 0;
            self.cold_wait_until(state.timestamp);
        } else {
            return Err(Error::out_of_range(
                Field::Timestamp,
                Sfid::MAX_TIMESTAMP + 1,
                Sfid::MAX_TIMESTAMP,
            ));
        }
        Ok((state.timestamp, state.sequence))
    }

    #[cold]
    #[inline(never)]
    fn cold_wait_until(&self, target: u64) {
        #[cfg(feature = "tracing")]
        tracing::debug!(target_ms = target, "sequence exhausted, waiting for clock");

        loop {
            let now = self.time.current_millis();
            if now >= target {
                break;
            }
            self.sleep.sleep_for(Duration::from_millis(target - now));
        }
    }
}

impl<T, S> Clone for SfidGenerator<T, S>
where
    T: TimeSource + Clone,
    S: SleepProvider + Clone,
{
    /// The clone shares the timestamp and sequence state with `self`.
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            node: self.node,
            nonce: self.nonce,
            time: self.time.clone(),
            sleep: self.sleep.clone(),
        }
    }
}

impl<T, S> core::fmt::Debug for SfidGenerator<T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SfidGenerator")
            .field("node", &self.node)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}
