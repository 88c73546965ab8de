//! Snowflake-style 64-bit ID generation.
//!
//! `rimeid` mints compact, time-ordered, globally-unique identifiers for
//! distributed systems in which many independent producers must create IDs
//! without coordinating through a central service. Every ID packs three
//! fields into a single non-negative `i64`:
//!
//! ```text
//!  Bit Index:  63 62             22 21             12 11             0
//!              +--+----------------+-----------------+---------------+
//!  Field:      | 0| timestamp (41) | machine id (10) | sequence (12) |
//!              +--+----------------+-----------------+---------------+
//!              |<------ MSB ------- 64 bits -------- LSB ----------->|
//! ```
//!
//! - **timestamp**: milliseconds elapsed since [`DEFAULT_EPOCH`], giving
//!   roughly 69 years of range.
//! - **machine id**: caller-assigned producer identifier in `0..=1023`. Two
//!   generators may share an ID space only if their machine IDs differ.
//! - **sequence**: per-millisecond counter in `0..=4095`, disambiguating IDs
//!   minted within the same clock tick.
//!
//! # Example
//!
//! ```
//! use rimeid::{Error, SnowflakeGenerator};
//!
//! # fn main() -> Result<(), Error> {
//! let generator = SnowflakeGenerator::new(42)?;
//!
//! let a = generator.generate_id()?;
//! let b = generator.generate_id()?;
//!
//! assert!(b > a);
//! assert_eq!(a.machine_id(), 42);
//! # Ok(())
//! # }
//! ```
//!
//! A generator is safe to share across threads: the whole
//! read-check-update-encode cycle runs under one internal lock. See
//! [`SnowflakeGenerator::generate_id`] for the clock-safety rules.
//!
//! # Feature flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`SnowflakeId`] as its native
//!   integer, with layout validation on decode.
//! - `tracing`: trace-level instrumentation of the generation path.

mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
