use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default epoch: Sunday, February 23, 2025 10:00:58.525 UTC
///
/// All timestamp fields are measured in milliseconds elapsed since this
/// instant. The constant is part of the interoperability contract: every
/// generator sharing an ID space must encode against the same epoch, or the
/// resulting IDs will not sort together.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_740_304_858_525);

/// [`DEFAULT_EPOCH`] as signed Unix milliseconds, matching the arithmetic
/// used during encoding.
pub(crate) const EPOCH_MILLIS: i64 = DEFAULT_EPOCH.as_millis() as i64;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// This abstraction allows plugging in the real system clock or a mocked
/// time source in tests. Note that the generator measures readings against
/// the standard Unix reference, not against [`DEFAULT_EPOCH`]; the epoch is
/// only subtracted when an ID is encoded.
///
/// # Example
///
/// ```
/// use rimeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

/// The system wall clock.
///
/// Each reading performs a [`SystemTime::now`] query. Wall-clock time is
/// deliberate here: interoperating producers on different machines must
/// agree on absolute time, which a process-local monotonic timer cannot
/// provide. The generator's backward-clock check compensates for the one
/// hazard this introduces (readings moving backward under NTP correction).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before the Unix epoch")
            .as_millis() as i64
    }
}
