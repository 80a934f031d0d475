/*!
 * Serde utilities for partial-update payloads.
 *
 * A PATCH body needs to tell three states apart for nullable fields:
 * the key is absent (leave the field alone), the key is `null` (clear it),
 * or the key carries a value (set it). Plain `Option<T>` collapses the first
 * two, so those fields are declared as `Option<Option<T>>` and routed through
 * [`deserialize_some`].
 */

use serde::{Deserialize, Deserializer};

/// Deserialize a present key into `Some(..)`, including an explicit `null`.
///
/// # Usage with serde
///
/// ```rust
/// use serde::Deserialize;
/// use taskboard::utils::serde::deserialize_some;
///
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default, deserialize_with = "deserialize_some")]
///     description: Option<Option<String>>,
/// }
///
/// let cleared: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
/// assert_eq!(cleared.description, Some(None));
///
/// let untouched: Patch = serde_json::from_str("{}").unwrap();
/// assert_eq!(untouched.description, None);
/// ```
pub fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
