use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Slot;

/// Highest sensor value that is a CGM error code rather than a reading.
/// Error codes are shown as `???` and never graphed.
pub const ERROR_CODE_MAX: i64 = 12;

/// Rate-of-change arrow reported alongside each reading.
///
/// Declaration order is the trend code order, rising to falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    DoubleUp,
    SingleUp,
    FortyFiveUp,
    Flat,
    FortyFiveDown,
    SingleDown,
    DoubleDown,
}

impl Direction {
    pub const ALL: [Direction; 7] = [
        Direction::DoubleUp,
        Direction::SingleUp,
        Direction::FortyFiveUp,
        Direction::Flat,
        Direction::FortyFiveDown,
        Direction::SingleDown,
        Direction::DoubleDown,
    ];

    /// Numeric trend code uploaded next to the direction label (1..=7).
    pub const fn trend(self) -> u8 {
        match self {
            Self::DoubleUp => 1,
            Self::SingleUp => 2,
            Self::FortyFiveUp => 3,
            Self::Flat => 4,
            Self::FortyFiveDown => 5,
            Self::SingleDown => 6,
            Self::DoubleDown => 7,
        }
    }

    pub fn from_trend(trend: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.trend() == trend)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DoubleUp => "DoubleUp",
            Self::SingleUp => "SingleUp",
            Self::FortyFiveUp => "FortyFiveUp",
            Self::Flat => "Flat",
            Self::FortyFiveDown => "FortyFiveDown",
            Self::SingleDown => "SingleDown",
            Self::DoubleDown => "DoubleDown",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction label {0:?}")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.label() == s)
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Sgv,
}

/// One sensor glucose reading, as the data endpoint serves it.
///
/// `date` is epoch milliseconds. `sgv` is absent for raw-only uploads, and
/// the direction/trend pair may be missing or null; all of these render as
/// "no data" rather than being rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SgvEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sgv: Option<i64>,
    pub date: i64,
    #[serde(default, skip_serializing_if = "Slot::is_missing")]
    pub direction: Slot<Direction>,
    #[serde(default, skip_serializing_if = "Slot::is_missing")]
    pub trend: Slot<u8>,
}

impl SgvEntry {
    /// A bare reading with no type tag and no direction.
    pub fn new(sgv: i64, date: i64) -> Self {
        Self {
            kind: None,
            sgv: Some(sgv),
            date,
            direction: Slot::Missing,
            trend: Slot::Missing,
        }
    }

    /// Tag the entry as `type: "sgv"`.
    pub fn tagged(mut self) -> Self {
        self.kind = Some(EntryKind::Sgv);
        self
    }

    /// Set the direction and its matching trend code together.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Slot::Present(direction);
        self.trend = Slot::Present(direction.trend());
        self
    }

    /// Drop both direction and trend keys.
    pub fn clear_trend(&mut self) {
        self.direction = Slot::Missing;
        self.trend = Slot::Missing;
    }

    /// Send both direction and trend as explicit `null`s.
    pub fn null_trend(&mut self) {
        self.direction = Slot::Null;
        self.trend = Slot::Null;
    }

    pub fn is_error_code(&self) -> bool {
        self.sgv.is_some_and(|v| v <= ERROR_CODE_MAX)
    }

    /// Whether the watchface should draw a point for this entry.
    pub fn is_plottable(&self) -> bool {
        self.sgv.is_some_and(|v| v > ERROR_CODE_MAX)
    }

    /// Direction and trend are either both absent, both null, or both
    /// present with the trend matching the direction's code.
    pub fn has_consistent_trend(&self) -> bool {
        match (&self.direction, &self.trend) {
            (Slot::Missing, Slot::Missing) | (Slot::Null, Slot::Null) => true,
            (Slot::Present(d), Slot::Present(t)) => d.trend() == *t,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_codes_follow_declaration_order() {
        let codes: Vec<u8> = Direction::ALL.iter().map(|d| d.trend()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(Direction::Flat.trend(), 4);
    }

    #[test]
    fn trend_mapping_inverts() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_trend(d.trend()), Some(d));
        }
        assert_eq!(Direction::from_trend(0), None);
        assert_eq!(Direction::from_trend(8), None);
    }

    #[test]
    fn labels_parse_back() {
        for d in Direction::ALL {
            assert_eq!(d.label().parse::<Direction>(), Ok(d));
        }
        assert!("Sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&Direction::FortyFiveDown).unwrap_or_default();
        assert_eq!(json, "\"FortyFiveDown\"");
    }

    #[test]
    fn full_entry_json_shape() {
        let e = SgvEntry::new(120, 1_000).tagged().with_direction(Direction::SingleUp);
        let v = serde_json::to_value(&e).unwrap_or_default();
        assert_eq!(
            v,
            serde_json::json!({
                "type": "sgv",
                "sgv": 120,
                "date": 1000,
                "direction": "SingleUp",
                "trend": 2,
            })
        );
    }

    #[test]
    fn degenerate_entries_serialize() {
        let mut cleared = SgvEntry::new(100, 5).with_direction(Direction::Flat);
        cleared.clear_trend();
        cleared.sgv = None;
        assert_eq!(
            serde_json::to_value(&cleared).unwrap_or_default(),
            serde_json::json!({ "date": 5 })
        );

        let mut nulled = SgvEntry::new(100, 5).with_direction(Direction::Flat);
        nulled.null_trend();
        assert_eq!(
            serde_json::to_value(&nulled).unwrap_or_default(),
            serde_json::json!({ "sgv": 100, "date": 5, "direction": null, "trend": null })
        );
        assert!(nulled.has_consistent_trend());
        assert!(cleared.has_consistent_trend());
    }

    #[test]
    fn half_set_pair_is_inconsistent() {
        let mut e = SgvEntry::new(100, 5).with_direction(Direction::Flat);
        e.trend = Slot::Missing;
        assert!(!e.has_consistent_trend());
        e.trend = Slot::Present(5);
        assert!(!e.has_consistent_trend());
    }

    #[test]
    fn error_codes_are_not_plottable() {
        assert!(SgvEntry::new(10, 0).is_error_code());
        assert!(!SgvEntry::new(10, 0).is_plottable());
        assert!(!SgvEntry::new(0, 0).is_plottable());
        assert!(SgvEntry::new(39, 0).is_plottable());
        let mut raw_only = SgvEntry::new(39, 0);
        raw_only.sgv = None;
        assert!(!raw_only.is_plottable());
        assert!(!raw_only.is_error_code());
    }
}
