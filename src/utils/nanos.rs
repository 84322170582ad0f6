//! Serde helpers that store `Duration` values as integer nanoseconds.
//!
//! Use with `#[serde(with = "crate::utils::nanos")]`.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // u64 nanoseconds covers ~584 years
    serializer.serialize_u64(duration.as_nanos().min(u64::MAX as u128) as u64)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let nanos = u64::deserialize(deserializer)?;
    Ok(Duration::from_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Sample {
        #[serde(with = "super")]
        total: Duration,
    }

    #[test]
    fn test_nanos_encoding() {
        let sample = Sample {
            total: Duration::from_micros(3),
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"total":3000}"#);

        let parsed: Sample = serde_json::from_str(r#"{"total":42}"#).unwrap();
        assert_eq!(parsed.total, Duration::from_nanos(42));
        assert!(serde_json::from_str::<Sample>(r#"{"total":-1}"#).is_err());
    }
}
