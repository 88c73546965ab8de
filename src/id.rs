use crate::time::DEFAULT_EPOCH;
use core::time::Duration;

/// A packed Snowflake-style 64-bit identifier.
///
/// The backing integer is an `i64` whose sign bit is reserved and always
/// zero for IDs produced within the 41-bit time range, so every generated
/// ID is non-negative and the raw values sort in generation order.
///
/// Fields are laid out from **most significant bit (MSB)** to **least
/// significant bit (LSB)**:
///
/// ```text
///  Bit Index:  63 62             22 21             12 11             0
///              +--+----------------+-----------------+---------------+
///  Field:      | 0| timestamp (41) | machine id (10) | sequence (12) |
///              +--+----------------+-----------------+---------------+
///              |<------ MSB ------- 64 bits -------- LSB ----------->|
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SnowflakeId {
    id: i64,
}

const _: () = {
    // Compile-time check: the three fields plus the reserved sign bit must
    // cover the backing type exactly.
    assert!(
        1 + SnowflakeId::TIMESTAMP_BITS + SnowflakeId::MACHINE_ID_BITS + SnowflakeId::SEQUENCE_BITS
            == i64::BITS,
        "layout must match underlying type width"
    );
};

impl SnowflakeId {
    pub const TIMESTAMP_BITS: u32 = 41;
    pub const MACHINE_ID_BITS: u32 = 10;
    pub const SEQUENCE_BITS: u32 = 12;

    pub const SEQUENCE_SHIFT: u32 = 0;
    pub const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_BITS;
    pub const TIMESTAMP_SHIFT: u32 = Self::SEQUENCE_BITS + Self::MACHINE_ID_BITS;

    pub const TIMESTAMP_MASK: i64 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const MACHINE_ID_MASK: i64 = (1 << Self::MACHINE_ID_BITS) - 1;
    pub const SEQUENCE_MASK: i64 = (1 << Self::SEQUENCE_BITS) - 1;

    const fn valid_mask() -> i64 {
        (Self::TIMESTAMP_MASK << Self::TIMESTAMP_SHIFT)
            | (Self::MACHINE_ID_MASK << Self::MACHINE_ID_SHIFT)
            | (Self::SEQUENCE_MASK << Self::SEQUENCE_SHIFT)
    }

    /// Packs an ID from its components.
    ///
    /// Components are masked to their field widths. The timestamp must fit
    /// its 41 bits; overflow (about 69 years past the epoch) would alias
    /// into the sign bit and is caught by a debug assertion.
    #[must_use]
    pub const fn from_components(timestamp: i64, machine_id: i64, sequence: i64) -> Self {
        debug_assert!(
            timestamp >= 0 && timestamp <= Self::TIMESTAMP_MASK,
            "timestamp overflow"
        );
        let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let m = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let s = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self { id: t | m | s }
    }

    /// Extracts the timestamp field: milliseconds elapsed since
    /// [`DEFAULT_EPOCH`].
    ///
    /// [`DEFAULT_EPOCH`]: crate::time::DEFAULT_EPOCH
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID field.
    #[must_use]
    pub const fn machine_id(&self) -> i64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the sequence field.
    #[must_use]
    pub const fn sequence(&self) -> i64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum representable timestamp value.
    #[must_use]
    pub const fn max_timestamp() -> i64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum representable machine ID.
    #[must_use]
    pub const fn max_machine_id() -> i64 {
        Self::MACHINE_ID_MASK
    }

    /// Returns the maximum representable sequence value.
    #[must_use]
    pub const fn max_sequence() -> i64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this ID into its raw integer representation.
    #[must_use]
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Converts a raw integer into this type.
    ///
    /// No validation is performed; see [`Self::is_valid`].
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    /// Returns `true` if the reserved sign bit is unset, i.e. the raw value
    /// is one this crate could have produced.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        (self.id & !Self::valid_mask()) == 0
    }

    /// Returns this ID's timestamp as a [`std::time::SystemTime`].
    ///
    /// Precision is limited to whole milliseconds.
    #[must_use]
    pub fn datetime(&self) -> std::time::SystemTime {
        std::time::SystemTime::UNIX_EPOCH
            + DEFAULT_EPOCH
            + Duration::from_millis(self.timestamp() as u64)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl core::fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.id.fmt(f)
    }
}

impl core::fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut dbg = f.debug_struct("SnowflakeId");
        dbg.field("id", &format_args!("{} (0x{:x})", self.id, self.id));
        dbg.field(
            "timestamp",
            &format_args!("{} (0x{:x})", self.timestamp(), self.timestamp()),
        );
        dbg.field(
            "machine_id",
            &format_args!("{} (0x{:x})", self.machine_id(), self.machine_id()),
        );
        dbg.field(
            "sequence",
            &format_args!("{} (0x{:x})", self.sequence(), self.sequence()),
        );
        dbg.finish()
    }
}
