use serde::{Deserialize, Deserializer};

/// Wraps any present value (including `null`) in `Some`, so that together with
/// `#[serde(default)]` an `Option<Option<T>>` field tells "absent" from "null".
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
