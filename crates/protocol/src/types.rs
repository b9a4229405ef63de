use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A 24-bit RGB color as the watchface configuration spells it: `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);

    /// Build a color from a `0xRRGGBB` literal. Bits above 24 are dropped.
    pub const fn hex(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}: expected 0xRRGGBB")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .or_else(|| s.strip_prefix('#'))
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        if digits.is_empty() || digits.len() > 6 {
            return Err(ParseColorError(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| ParseColorError(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A per-sample field that uploaders may omit entirely or send as `null`.
///
/// Both states are legal input for the watchface and render as "no data",
/// but they are different JSON documents, so scenarios need to express
/// either one. Pair with `#[serde(default, skip_serializing_if = "Slot::is_missing")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot<T> {
    /// The key is absent from the record.
    Missing,
    /// The key is present with a JSON `null`.
    Null,
    Present(T),
}

impl<T> Slot<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Null,
        }
    }
}

impl<T: Serialize> Serialize for Slot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(v) => v.serialize(serializer),
            Self::Missing | Self::Null => serializer.serialize_none(),
        }
    }
}

// Only reached when the key exists; `#[serde(default)]` covers `Missing`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Slot<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}
