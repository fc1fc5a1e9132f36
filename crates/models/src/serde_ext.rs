//! Serde helpers for update payloads.

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
///
/// Use together with `#[serde(default)]` so a missing key stays `None`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        at: Option<Option<i64>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"at": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"at": 5}"#).unwrap();
        assert_eq!(absent.at, None);
        assert_eq!(null.at, Some(None));
        assert_eq!(value.at, Some(Some(5)));
    }
}
