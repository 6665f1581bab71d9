use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single updatable field in a partial-update request.
///
/// Presence is tracked separately from the value, so an empty string or a
/// zero is a real update and never means "leave it alone".
///
/// | wire form          | variant        | effect on merge |
/// |--------------------|----------------|-----------------|
/// | key omitted        | `Missing`      | keep current    |
/// | `"key": null`      | `Null`         | keep current    |
/// | `"key": <value>`   | `Value(value)` | replace         |
///
/// Struct fields of this type must carry `#[serde(default)]`, otherwise an
/// omitted key is a decode error instead of `Missing`.
#[derive(Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns `true` only when the caller supplied a concrete value.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Missing => Patch::Missing,
            Self::Null => Patch::Null,
            Self::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Merge against the stored value: the patch wins only when present.
    pub fn apply(self, current: T) -> T {
        match self {
            Self::Value(v) => v,
            Self::Missing | Self::Null => current,
        }
    }

    /// In-place form of [`Self::apply`].
    pub fn apply_to(self, slot: &mut T) {
        if let Self::Value(v) = self {
            *slot = v;
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Patch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("Missing"),
            Self::Null => f.write_str("Null"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Missing | Self::Null => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    struct Sample {
        #[serde(default, skip_serializing_if = "Patch::is_missing")]
        text: Patch<String>,
        #[serde(default, skip_serializing_if = "Patch::is_missing")]
        count: Patch<i64>,
    }

    #[test]
    fn omitted_key_is_missing() {
        let p: Sample = serde_json::from_str("{}").unwrap();
        assert!(p.text.is_missing());
        assert!(p.count.is_missing());
    }

    #[test]
    fn explicit_null_is_null() {
        let p: Sample = serde_json::from_str(r#"{"text": null}"#).unwrap();
        assert_eq!(p.text, Patch::Null);
        assert!(!p.text.is_present());
    }

    #[test]
    fn empty_string_and_zero_are_values() {
        let p: Sample = serde_json::from_str(r#"{"text": "", "count": 0}"#).unwrap();
        assert_eq!(p.text, Patch::Value(String::new()));
        assert_eq!(p.count, Patch::Value(0));
    }

    #[test]
    fn wrong_type_is_a_decode_error() {
        assert!(serde_json::from_str::<Sample>(r#"{"count": "seven"}"#).is_err());
    }

    #[test]
    fn apply_keeps_current_unless_value() {
        assert_eq!(Patch::<i64>::Missing.apply(4), 4);
        assert_eq!(Patch::<i64>::Null.apply(4), 4);
        assert_eq!(Patch::Value(0).apply(4), 0);

        let mut slot = String::from("old");
        Patch::Value(String::new()).apply_to(&mut slot);
        assert_eq!(slot, "");
    }

    #[test]
    fn missing_fields_are_skipped_on_serialize() {
        let p = Sample {
            text: Patch::Value("x".into()),
            count: Patch::Missing,
        };
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"text":"x"}"#);
    }

    #[test]
    fn map_preserves_state() {
        assert_eq!(Patch::Value(3).map(Some), Patch::Value(Some(3)));
        assert_eq!(Patch::<i64>::Null.map(Some), Patch::Null);
        assert!(Patch::<i64>::Missing.map(|v| v + 1).is_missing());
    }
}
