use crate::{Error, SnowflakeGenerator, SnowflakeId, TimeSource};
use crate::time::EPOCH_MILLIS;
use std::collections::HashSet;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI64, Ordering},
};
use std::thread::scope;

/// A settable clock shared between the test body and the generator.
#[derive(Clone)]
struct MockClock {
    millis: Arc<AtomicI64>,
}

impl MockClock {
    fn at(unix_millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(unix_millis)),
        }
    }

    fn set(&self, unix_millis: i64) {
        self.millis.store(unix_millis, Ordering::Relaxed);
    }
}

impl TimeSource for MockClock {
    fn current_millis(&self) -> i64 {
        self.millis.load(Ordering::Relaxed)
    }
}

/// A clock that advances one millisecond per `reads_per_milli` readings.
///
/// This lets a single-threaded test drive the sequence-overflow spin loop:
/// the spin keeps re-reading the clock, and after enough reads the reported
/// millisecond ticks over.
struct AutoAdvanceClock {
    start: i64,
    reads: AtomicI64,
    reads_per_milli: i64,
}

impl AutoAdvanceClock {
    fn new(start: i64, reads_per_milli: i64) -> Self {
        Self {
            start,
            reads: AtomicI64::new(0),
            reads_per_milli,
        }
    }
}

impl TimeSource for AutoAdvanceClock {
    fn current_millis(&self) -> i64 {
        let read = self.reads.fetch_add(1, Ordering::Relaxed);
        self.start + read / self.reads_per_milli
    }
}

#[test]
fn machine_id_boundaries() {
    assert!(SnowflakeGenerator::new(0).is_ok());
    assert!(SnowflakeGenerator::new(SnowflakeId::max_machine_id()).is_ok());

    assert_eq!(
        SnowflakeGenerator::new(1024).err(),
        Some(Error::InvalidMachineId { machine_id: 1024 })
    );
    assert_eq!(
        SnowflakeGenerator::new(-1).err(),
        Some(Error::InvalidMachineId { machine_id: -1 })
    );
}

#[test]
fn encodes_expected_bit_layout() {
    let clock = MockClock::at(EPOCH_MILLIS + 1_000);
    let generator = SnowflakeGenerator::with_clock(5, clock).unwrap();

    let first = generator.generate_id().unwrap();
    assert_eq!(first.to_raw(), (1_000 << 22) | (5 << 12));

    let second = generator.generate_id().unwrap();
    assert_eq!(second.to_raw(), (1_000 << 22) | (5 << 12) | 1);
}

#[test]
fn sequence_increments_within_same_tick() {
    let clock = MockClock::at(EPOCH_MILLIS + 42);
    let generator = SnowflakeGenerator::with_clock(0, clock).unwrap();

    let id1 = generator.generate_id().unwrap();
    let id2 = generator.generate_id().unwrap();
    let id3 = generator.generate_id().unwrap();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn sequence_resets_on_new_tick() {
    let clock = MockClock::at(EPOCH_MILLIS + 42);
    let generator = SnowflakeGenerator::with_clock(1, clock.clone()).unwrap();

    let id1 = generator.generate_id().unwrap();
    let id2 = generator.generate_id().unwrap();
    assert_eq!((id1.sequence(), id2.sequence()), (0, 1));

    clock.set(EPOCH_MILLIS + 43);

    let id3 = generator.generate_id().unwrap();
    assert_eq!(id3.timestamp(), 43);
    assert_eq!(id3.sequence(), 0);
}

#[test]
fn sequence_overflow_spins_to_next_tick() {
    // Plenty of slack: 4097 generation reads plus the spin's re-reads all
    // land before the tick, then the clock rolls over mid-spin.
    let reads_per_milli = 5_000;
    let clock = AutoAdvanceClock::new(EPOCH_MILLIS + 1_000, reads_per_milli);
    let generator = SnowflakeGenerator::with_clock(3, clock).unwrap();

    let first = generator.generate_id().unwrap();
    assert_eq!(first.timestamp(), 1_000);
    assert_eq!(first.sequence(), 0);

    for expected in 1..=SnowflakeId::max_sequence() {
        let id = generator.generate_id().unwrap();
        assert_eq!(id.timestamp(), 1_000);
        assert_eq!(id.sequence(), expected);
    }

    // 4097th call: the sequence wraps to 0 and the call must not return
    // until the clock has advanced strictly past the exhausted tick.
    let wrapped = generator.generate_id().unwrap();
    assert_eq!(wrapped.sequence(), 0);
    assert!(wrapped.timestamp() > first.timestamp());
    assert_eq!(wrapped.timestamp(), 1_001);
}

#[test]
fn clock_regression_fails_without_mutating_state() {
    let clock = MockClock::at(EPOCH_MILLIS + 50);
    let generator = SnowflakeGenerator::with_clock(9, clock.clone()).unwrap();

    let before = generator.generate_id().unwrap();
    assert_eq!((before.timestamp(), before.sequence()), (50, 0));

    clock.set(EPOCH_MILLIS + 10);
    assert_eq!(
        generator.generate_id(),
        Err(Error::TimestampIsInvalid {
            last_seen: EPOCH_MILLIS + 50,
            now: EPOCH_MILLIS + 10,
        })
    );

    // The failed call committed nothing: back at the original tick, the
    // sequence continues exactly where it left off.
    clock.set(EPOCH_MILLIS + 50);
    let after = generator.generate_id().unwrap();
    assert_eq!((after.timestamp(), after.sequence()), (50, 1));
}

#[test]
fn system_clock_ids_strictly_increase() {
    let generator = SnowflakeGenerator::new(1).unwrap();

    let mut last = generator.generate_id().unwrap();
    for _ in 0..100_000 {
        let id = generator.generate_id().unwrap();
        assert!(id > last);
        assert_eq!(id.machine_id(), 1);
        last = id;
    }
}

#[test]
fn threaded_generation_is_pairwise_unique() {
    let threads = num_cpus::get().clamp(2, 8);
    let ids_per_thread = 16_384;
    let total = threads * ids_per_thread;

    let generator = Arc::new(SnowflakeGenerator::new(0).unwrap());
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(total)));

    scope(|s| {
        for _ in 0..threads {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let mut ids = Vec::with_capacity(ids_per_thread);
                for _ in 0..ids_per_thread {
                    ids.push(generator.generate_id().unwrap());
                }
                let mut seen = seen_ids.lock().unwrap();
                for id in ids {
                    assert!(seen.insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, total, "Expected {total} unique IDs");
}

#[test]
fn independent_generators_do_not_share_state() {
    let clock = MockClock::at(EPOCH_MILLIS + 7);
    let a = SnowflakeGenerator::with_clock(1, clock.clone()).unwrap();
    let b = SnowflakeGenerator::with_clock(2, clock).unwrap();

    let id_a = a.generate_id().unwrap();
    let id_b = b.generate_id().unwrap();

    // Same tick, both start their own sequence at zero.
    assert_eq!(id_a.sequence(), 0);
    assert_eq!(id_b.sequence(), 0);
    assert_ne!(id_a, id_b);
    assert_eq!(id_a.machine_id(), 1);
    assert_eq!(id_b.machine_id(), 2);
}

#[test]
fn error_messages_name_the_fault() {
    let err = SnowflakeGenerator::new(4096).unwrap_err();
    assert!(err.to_string().contains("invalid machine id 4096"));

    let clock = MockClock::at(EPOCH_MILLIS + 2);
    let generator = SnowflakeGenerator::with_clock(0, clock.clone()).unwrap();
    generator.generate_id().unwrap();
    clock.set(EPOCH_MILLIS + 1);
    let err = generator.generate_id().unwrap_err();
    assert!(err.to_string().contains("timestamp is invalid"));
}
