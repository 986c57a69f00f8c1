use core::time::Duration;
use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    thread::scope,
};

use crate::{
    Error, Field, MonotonicClock, Sfid, SfidGenerator, SleepProvider, SystemClock, TimeSource,
};

/// A shared mock clock. Sleeping advances the clock instead of blocking,
/// by the requested amount or by a fixed step when one is set.
#[derive(Clone, Default)]
struct MockClock {
    millis: Arc<AtomicU64>,
    step: Option<u64>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl MockClock {
    fn at(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
            ..Self::default()
        }
    }

    fn stepping(millis: u64, step: u64) -> Self {
        Self {
            step: Some(step),
            ..Self::at(millis)
        }
    }

    fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl TimeSource for MockClock {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

impl SleepProvider for MockClock {
    fn sleep_for(&self, dur: Duration) {
        self.sleeps.lock().unwrap().push(dur);
        let by = self
            .step
            .unwrap_or_else(|| u64::try_from(dur.as_millis()).unwrap());
        self.millis.fetch_add(by, Ordering::SeqCst);
    }
}

fn mock_generator(clock: &MockClock) -> SfidGenerator<MockClock, MockClock> {
    SfidGenerator::with_sleep(100, 123_456_789, clock.clone(), clock.clone()).unwrap()
}

#[test]
fn first_id_stamps_fields() {
    let clock = MockClock::at(1_000);
    let generator = mock_generator(&clock);
    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 1_000);
    assert_eq!(id.node(), 100);
    assert_eq!(id.nonce(), 123_456_789);
    assert_eq!(id.sequence(), 0);
    assert_eq!(generator.node(), 100);
    assert_eq!(generator.nonce(), 123_456_789);
}

#[test]
fn sequence_increments_within_same_millisecond() {
    let clock = MockClock::at(1_000);
    let generator = mock_generator(&clock);
    for expected in 0..100 {
        let id = generator.try_next_id().unwrap();
        assert_eq!(id.timestamp(), 1_000);
        assert_eq!(id.sequence(), expected);
    }
    assert!(clock.sleeps().is_empty());
}

#[test]
fn clock_advance_resets_sequence() {
    let clock = MockClock::at(1_000);
    let generator = mock_generator(&clock);
    generator.try_next_id().unwrap();
    generator.try_next_id().unwrap();

    clock.set(1_005);
    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 1_005);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn clock_going_backward_keeps_ids_increasing() {
    let clock = MockClock::at(1_000);
    let generator = mock_generator(&clock);
    let first = generator.try_next_id().unwrap();

    clock.set(500);
    let second = generator.try_next_id().unwrap();
    assert!(second > first);
    assert_eq!(second.timestamp(), 1_000);
    assert_eq!(second.sequence(), 1);
}

#[test]
fn initial_state_is_zero() {
    let clock = MockClock::at(0);
    let generator = mock_generator(&clock);
    // now == 0 == state.timestamp, so the sequence is bumped.
    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 0);
    assert_eq!(id.sequence(), 1);
}

#[test]
fn sequence_wrap_moves_to_next_millisecond() {
    let clock = MockClock::at(1_000);
    let generator = SfidGenerator::from_components(
        1,
        2,
        1_000,
        Sfid::MAX_SEQUENCE,
        clock.clone(),
        clock.clone(),
    )
    .unwrap();

    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 1_001);
    assert_eq!(id.sequence(), 0);
    assert_eq!(clock.sleeps(), [Duration::from_millis(1)]);
    assert_eq!(clock.current_millis(), 1_001);
}

#[test]
fn catch_up_wait_recomputes_after_each_sleep() {
    // State is 5ms ahead of the clock; the clock crawls forward 1ms per sleep.
    let clock = MockClock::stepping(1_000, 1);
    let generator = SfidGenerator::from_components(
        1,
        2,
        1_005,
        Sfid::MAX_SEQUENCE,
        clock.clone(),
        clock.clone(),
    )
    .unwrap();

    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 1_006);
    assert_eq!(id.sequence(), 0);
    assert_eq!(
        clock.sleeps(),
        (1..=6).rev().map(Duration::from_millis).collect::<Vec<_>>()
    );
}

#[test]
fn full_sequence_range_in_one_millisecond() {
    let clock = MockClock::at(1_000);
    let generator = mock_generator(&clock);

    let mut last = generator.try_next_id().unwrap();
    assert_eq!(last.sequence(), 0);
    for _ in 0..Sfid::MAX_SEQUENCE {
        let id = generator.try_next_id().unwrap();
        assert!(id > last);
        last = id;
    }
    assert_eq!(last.timestamp(), 1_000);
    assert_eq!(last.sequence(), Sfid::MAX_SEQUENCE);
    assert!(clock.sleeps().is_empty());

    let wrapped = generator.try_next_id().unwrap();
    assert_eq!(wrapped.timestamp(), 1_001);
    assert_eq!(wrapped.sequence(), 0);
    assert!(wrapped > last);
    assert_eq!(clock.sleeps().len(), 1);
}

#[test]
fn clock_past_timestamp_range_saturates() {
    let clock = MockClock::at(1 << 48);
    let generator = mock_generator(&clock);

    let first = generator.try_next_id().unwrap();
    assert_eq!(first.timestamp(), Sfid::MAX_TIMESTAMP);
    assert_eq!(first.sequence(), 0);

    clock.set(u64::MAX);
    let second = generator.try_next_id().unwrap();
    assert_eq!(second.timestamp(), Sfid::MAX_TIMESTAMP);
    assert_eq!(second.sequence(), 1);
    assert!(second > first);
}

#[test]
fn exhausted_timestamp_range_is_an_error() {
    let clock = MockClock::at(Sfid::MAX_TIMESTAMP);
    let generator = SfidGenerator::from_components(
        1,
        2,
        Sfid::MAX_TIMESTAMP,
        Sfid::MAX_SEQUENCE,
        clock.clone(),
        clock.clone(),
    )
    .unwrap();

    let want = Err(Error::OutOfRange {
        field: Field::Timestamp,
        value: Sfid::MAX_TIMESTAMP + 1,
        max: Sfid::MAX_TIMESTAMP,
    });
    assert_eq!(generator.try_next_id(), want);
    assert_eq!(generator.try_next_id(), want);
    assert!(clock.sleeps().is_empty());
}

#[test]
fn last_millisecond_still_hands_out_its_sequence() {
    let clock = MockClock::at(Sfid::MAX_TIMESTAMP);
    let generator = SfidGenerator::from_components(
        1,
        2,
        Sfid::MAX_TIMESTAMP,
        Sfid::MAX_SEQUENCE - 1,
        clock.clone(),
        clock.clone(),
    )
    .unwrap();

    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), Sfid::MAX_TIMESTAMP);
    assert_eq!(id.sequence(), Sfid::MAX_SEQUENCE);
    assert!(generator.try_next_id().is_err());
}

#[test]
fn rejects_out_of_range_nonce() {
    let clock = MockClock::at(0);
    assert_eq!(
        SfidGenerator::new(0, 1 << 40, clock.clone()).map(|_| ()),
        Err(Error::OutOfRange {
            field: Field::Nonce,
            value: 1 << 40,
            max: Sfid::MAX_NONCE,
        })
    );
    assert!(SfidGenerator::new(0, Sfid::MAX_NONCE, clock).is_ok());
}

#[test]
fn from_components_validates_state() {
    let clock = MockClock::at(0);
    let err = SfidGenerator::from_components(0, 0, 1 << 48, 0, clock.clone(), clock.clone())
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, Error::OutOfRange { field: Field::Timestamp, .. }));

    let err = SfidGenerator::from_components(0, 0, 0, 1 << 24, clock.clone(), clock.clone())
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, Error::OutOfRange { field: Field::Sequence, .. }));
}

#[test]
fn clones_share_state() {
    let clock = MockClock::at(1_000);
    let a = mock_generator(&clock);
    let b = a.clone();
    assert_eq!(a.try_next_id().unwrap().sequence(), 0);
    assert_eq!(b.try_next_id().unwrap().sequence(), 1);
    assert_eq!(a.try_next_id().unwrap().sequence(), 2);
}

#[test]
fn worked_example_with_system_clock() {
    let generator = SfidGenerator::new(100, 123_456_789, SystemClock).unwrap();
    let before = SystemClock.current_millis();
    let id = generator.try_next_id().unwrap();
    let after = SystemClock.current_millis();

    assert_eq!(id.node(), 100);
    assert_eq!(id.nonce(), 123_456_789);
    assert!(before <= id.timestamp() && id.timestamp() <= after);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn ids_are_unique_across_threads() {
    const IDS_PER_THREAD: usize = 4_096;
    let threads = num_cpus::get().clamp(2, 8);
    let generator = SfidGenerator::new(1, 2, MonotonicClock::new()).unwrap();

    let streams: Vec<Vec<Sfid>> = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let generator = generator.clone();
                s.spawn(move || {
                    (0..IDS_PER_THREAD)
                        .map(|_| generator.try_next_id().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut seen = HashSet::with_capacity(threads * IDS_PER_THREAD);
    for stream in &streams {
        assert!(stream.windows(2).all(|w| w[0] < w[1]));
        for id in stream {
            assert!(seen.insert(*id), "duplicate id {id}");
        }
    }
    assert_eq!(seen.len(), threads * IDS_PER_THREAD);
}

#[test]
fn sequential_calls_are_strictly_increasing() {
    let generator = SfidGenerator::new(9, 9, SystemClock).unwrap();
    let mut last = generator.try_next_id().unwrap();
    for _ in 0..10_000 {
        let id = generator.try_next_id().unwrap();
        assert!(id > last);
        assert!(id.encode().as_str() > last.encode().as_str());
        last = id;
    }
}

#[cfg(feature = "parking-lot")]
#[test]
fn next_id_matches_try_next_id() {
    let clock = MockClock::at(1_000);
    let generator = mock_generator(&clock);
    let a = generator.next_id();
    let b = generator.try_next_id().unwrap();
    assert_eq!((a.timestamp(), a.sequence()), (1_000, 0));
    assert_eq!((b.timestamp(), b.sequence()), (1_000, 1));
}

#[cfg(feature = "parking-lot")]
#[test]
#[should_panic(expected = "timestamp")]
fn next_id_panics_when_timestamp_range_is_exhausted() {
    let clock = MockClock::at(Sfid::MAX_TIMESTAMP);
    let generator = SfidGenerator::from_components(
        1,
        2,
        Sfid::MAX_TIMESTAMP,
        Sfid::MAX_SEQUENCE,
        clock.clone(),
        clock,
    )
    .unwrap();
    let _ = generator.next_id();
}

#[cfg(not(feature = "parking-lot"))]
#[test]
fn poisoned_lock_is_reported() {
    let clock = MockClock::at(1_000);
    let generator = mock_generator(&clock);
    let state = Arc::clone(&generator.state);
    let _ = std::thread::spawn(move || {
        let _guard = state.lock().unwrap();
        panic!("poison the generator lock");
    })
    .join();
    assert_eq!(generator.try_next_id(), Err(Error::LockPoisoned));
}
