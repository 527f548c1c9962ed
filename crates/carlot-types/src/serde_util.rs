//! Serde helpers shared by request payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` as the type's default.
///
/// Pair with `#[serde(default)]` so absent and `null` fields behave alike.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
