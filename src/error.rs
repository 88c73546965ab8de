use crate::id::SnowflakeId;

/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `rimeid` can emit.
///
/// Both variants are terminal for the call that raised them: no generator
/// state is committed on either path.
#[derive(Clone, Copy, thiserror::Error, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The supplied machine ID does not fit the 10-bit machine field.
    ///
    /// Raised only at construction time, for values above
    /// [`SnowflakeId::max_machine_id`] or below zero. A generator is never
    /// returned alongside this error.
    #[error("invalid machine id {machine_id}: must be in 0..={max}", max = SnowflakeId::MACHINE_ID_MASK)]
    InvalidMachineId {
        /// The rejected machine ID.
        machine_id: i64,
    },

    /// The wall clock reported a time earlier than the last recorded
    /// timestamp, indicating clock regression (e.g. an NTP step).
    ///
    /// The generator performs no internal retry: regression may persist for
    /// an undefined duration, and silently retrying would mask a serious
    /// clock fault. The caller decides whether to back off, retry, or
    /// escalate.
    #[error("timestamp is invalid: clock moved back to {now}ms, last seen {last_seen}ms")]
    TimestampIsInvalid {
        /// The last timestamp recorded by the generator, in milliseconds
        /// since the Unix epoch.
        last_seen: i64,
        /// The regressed clock reading, in milliseconds since the Unix
        /// epoch.
        now: i64,
    },
}
