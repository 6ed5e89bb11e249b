use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Attribute value as seen by the plugin host.
///
/// Configuration can leave an attribute unset (`Null`) or depend on values
/// that are only known after apply (`Unknown`). On the wire `Null` is JSON
/// `null`, `Unknown` is `{"unknown": true}` and `Known` is the plain value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TfValue<T> {
    /// Attribute is not set.
    #[default]
    Null,
    /// Attribute will be known after apply.
    Unknown,
    /// Attribute holds a concrete value.
    Known(T),
}

impl<T> TfValue<T> {
    /// Returns true for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for `Unknown`.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns the concrete value, if any.
    #[must_use]
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Converts into an option holding the concrete value, if any.
    #[must_use]
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }
}

impl<T: Clone + Default> TfValue<T> {
    /// Returns the concrete value or the type default for `Null`/`Unknown`.
    #[must_use]
    pub fn value_or_default(&self) -> T {
        self.known().cloned().unwrap_or_default()
    }
}

impl<T> From<T> for TfValue<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnknownMarker {
    unknown: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue<T> {
    Unknown(UnknownMarker),
    Known(T),
}

impl<T: Serialize> Serialize for TfValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Unknown => UnknownMarker { unknown: true }.serialize(serializer),
            Self::Known(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for TfValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Option::<WireValue<T>>::deserialize(deserializer)?;
        Ok(match wire {
            None => Self::Null,
            Some(WireValue::Unknown(marker)) if marker.unknown => Self::Unknown,
            Some(WireValue::Unknown(_)) => Self::Null,
            Some(WireValue::Known(value)) => Self::Known(value),
        })
    }
}
