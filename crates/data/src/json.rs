use serde::{Deserialize, Deserializer};


/// Decodes an explicit `null` the same way as a missing field.
pub fn null_as_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where D: Deserializer<'de>,
      T: Deserialize<'de> + Default
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
