use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    id::SnowflakeId,
    time::{EPOCH_MILLIS, SystemClock, TimeSource},
};

#[cfg(test)]
mod tests;

/// Mutable generator state, guarded as a unit.
///
/// `last_timestamp` is milliseconds since the Unix epoch and never moves
/// backward; `sequence` counts IDs minted within `last_timestamp`'s
/// millisecond.
struct State {
    last_timestamp: i64,
    sequence: i64,
}

/// A lock-based Snowflake ID generator safe for concurrent use.
///
/// Each instance owns the state for one producer: a fixed machine ID plus
/// the `(last_timestamp, sequence)` pair behind a [`Mutex`]. The entire
/// read-check-update-encode cycle of [`generate_id`] runs under that lock,
/// so any number of threads may share one instance (typically via
/// [`Arc`]) and every ID they receive is unique.
///
/// Instances are independent: a process may hold several generators with
/// distinct machine IDs, each with its own lock. Avoid a process-wide
/// singleton; hand each logical producer its own owned instance.
///
/// # Example
///
/// ```
/// use rimeid::SnowflakeGenerator;
/// use std::sync::Arc;
///
/// let generator = Arc::new(SnowflakeGenerator::new(7).unwrap());
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let generator = Arc::clone(&generator);
///         std::thread::spawn(move || generator.generate_id().unwrap())
///     })
///     .collect();
///
/// for handle in handles {
///     let id = handle.join().unwrap();
///     assert_eq!(id.machine_id(), 7);
/// }
/// ```
///
/// [`generate_id`]: Self::generate_id
/// [`Arc`]: std::sync::Arc
pub struct SnowflakeGenerator<C = SystemClock>
where
    C: TimeSource,
{
    state: Mutex<State>,
    machine_id: i64,
    clock: C,
}

impl SnowflakeGenerator<SystemClock> {
    /// Creates a generator that reads the system wall clock.
    ///
    /// # Parameters
    ///
    /// - `machine_id`: identifier for this producer within the deployment,
    ///   in `0..=1023`. Generators sharing an ID space must never run
    ///   concurrently with the same machine ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] if `machine_id` does not fit the
    /// 10-bit machine field (negative or above 1023).
    ///
    /// # Example
    ///
    /// ```
    /// use rimeid::{Error, SnowflakeGenerator};
    ///
    /// assert!(SnowflakeGenerator::new(1023).is_ok());
    /// assert_eq!(
    ///     SnowflakeGenerator::new(1024).err(),
    ///     Some(Error::InvalidMachineId { machine_id: 1024 })
    /// );
    /// ```
    pub fn new(machine_id: i64) -> Result<Self> {
        Self::with_clock(machine_id, SystemClock)
    }
}

impl<C> SnowflakeGenerator<C>
where
    C: TimeSource,
{
    /// Creates a generator with a caller-supplied [`TimeSource`].
    ///
    /// Useful for deterministic tests or environments with a specialized
    /// clock. The source must report milliseconds since the Unix epoch;
    /// [`DEFAULT_EPOCH`] is subtracted only when an ID is encoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] if `machine_id` does not fit the
    /// 10-bit machine field.
    ///
    /// [`DEFAULT_EPOCH`]: crate::time::DEFAULT_EPOCH
    pub fn with_clock(machine_id: i64, clock: C) -> Result<Self> {
        if !(0..=SnowflakeId::max_machine_id()).contains(&machine_id) {
            return Err(Error::InvalidMachineId { machine_id });
        }

        Ok(Self {
            state: Mutex::new(State {
                last_timestamp: 0,
                sequence: 0,
            }),
            machine_id,
            clock,
        })
    }

    /// Returns the machine ID this generator encodes into every ID.
    pub fn machine_id(&self) -> i64 {
        self.machine_id
    }

    /// Generates the next unique, time-ordered ID.
    ///
    /// The call acquires the generator's lock, reads the clock, and then:
    ///
    /// - **Clock regression** (`now < last_timestamp`): fails with
    ///   [`Error::TimestampIsInvalid`] without mutating any state. There is
    ///   no internal retry; the caller chooses the recovery policy.
    /// - **Same millisecond**: increments the sequence with 12-bit
    ///   wraparound. If the sequence wraps to zero (4096 IDs already minted
    ///   this millisecond), the call busy-waits on repeated clock reads
    ///   until the next millisecond and encodes with the wrapped sequence.
    ///   The wait is bounded by the millisecond boundary, but it does hold
    ///   the lock, so other callers queue behind it.
    /// - **New millisecond**: resets the sequence to zero.
    ///
    /// Successive successful calls return strictly increasing IDs as long
    /// as the clock does not regress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampIsInvalid`] if the clock reports a time
    /// earlier than the last recorded timestamp.
    ///
    /// # Example
    ///
    /// ```
    /// use rimeid::{Error, SnowflakeGenerator};
    ///
    /// # fn main() -> Result<(), Error> {
    /// let generator = SnowflakeGenerator::new(0)?;
    /// let id = generator.generate_id()?;
    /// assert!(id.to_raw() > 0);
    /// # Ok(())
    /// # }
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_id(&self) -> Result<SnowflakeId> {
        let mut state = self.state.lock();

        let mut now = self.clock.current_millis();
        if now < state.last_timestamp {
            return Err(Error::TimestampIsInvalid {
                last_seen: state.last_timestamp,
                now,
            });
        }

        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
            if state.sequence == 0 {
                // Sequence exhausted for this tick: spin until the clock
                // advances strictly past it. Wall time always advances, so
                // the wait is bounded to the next millisecond boundary.
                now = self.wait_for_next_millis(state.last_timestamp);
            }
        } else {
            state.sequence = 0;
        }

        state.last_timestamp = now;

        Ok(SnowflakeId::from_components(
            now - EPOCH_MILLIS,
            self.machine_id,
            state.sequence,
        ))
    }

    #[cold]
    #[inline(never)]
    fn wait_for_next_millis(&self, last_timestamp: i64) -> i64 {
        let mut now = self.clock.current_millis();
        while now <= last_timestamp {
            core::hint::spin_loop();
            now = self.clock.current_millis();
        }
        now
    }
}

impl<C> core::fmt::Debug for SnowflakeGenerator<C>
where
    C: TimeSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("machine_id", &self.machine_id)
            .finish_non_exhaustive()
    }
}
