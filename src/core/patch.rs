//! Serde helpers for partial updates.
//!
//! A nullable column in a change set is an `Option<Option<T>>`:
//! an absent key is `None` (leave the column alone), an explicit `null` is
//! `Some(None)` (clear it) and a value is `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

/// Deserializes a present key, `null` included, into `Some(..)`.
///
/// Pair with `#[serde(default)]` so an absent key stays `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
