//! Serde integration for [`SnowflakeId`].
//!
//! IDs serialize as their native `i64` representation, which keeps them
//! compact and sortable in JSON and binary formats alike. Deserialization
//! validates the layout: a raw value with the reserved sign bit set can
//! never have been produced by a generator and is rejected.

use crate::id::SnowflakeId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for SnowflakeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        let id = SnowflakeId::from_raw(raw);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(format_args!(
                "{raw} is not a valid snowflake id: reserved sign bit is set"
            )));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::id::SnowflakeId;

    #[test]
    fn serializes_as_native_integer() {
        let id = SnowflakeId::from_components(1_000, 5, 1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
    }

    #[test]
    fn round_trips() {
        let id = SnowflakeId::from_components(123_456, 1023, 4095);
        let json = serde_json::to_string(&id).unwrap();
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn rejects_negative_raw_values() {
        let err = serde_json::from_str::<SnowflakeId>("-1").unwrap_err();
        assert!(err.to_string().contains("not a valid snowflake id"));
    }
}
