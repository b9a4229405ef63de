//! Glucose reading series.

use std::f64::consts::PI;

use watchface_protocol::{Direction, SgvEntry};

use crate::anchor::{DEFAULT_STEP_SECONDS, TimeAnchor};

/// Readings in a default series: a little over four hours.
pub const DEFAULT_COUNT: usize = 50;

/// About nine hours of real sensor data, most recent first.
pub const RECORDED_TRACE: [i64; 108] = [
    190, 188, 180, 184, 184, 177, 174, 163, 152, 141, 134, 127, 124, 121, 117, 109, 103, 97, 94,
    88, 79, 79, 75, 79, 84, 87, 88, 91, 91, 91, 94, 99, 102, 107, 106, 108, 107, 108, 115, 111,
    114, 113, 115, 118, 120, 119, 120, 122, 123, 126, 122, 125, 125, 126, 125, 122, 122, 122,
    119, 118, 118, 118, 117, 116, 115, 114, 114, 115, 114, 113, 114, 115, 111, 114, 115, 114,
    114, 116, 117, 117, 118, 119, 121, 124, 125, 128, 126, 128, 131, 133, 135, 136, 135, 134,
    132, 130, 132, 130, 129, 131, 129, 128, 128, 127, 125, 124, 125, 126,
];

/// A slowly falling, gently oscillating curve: `start - slope*i +
/// amplitude*sin(2i/π)`, truncated toward zero and clamped at `floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SgvCurve {
    pub start: f64,
    pub slope: f64,
    pub amplitude: f64,
    pub floor: i64,
}

impl Default for SgvCurve {
    fn default() -> Self {
        Self {
            start: 200.0,
            slope: 3.0,
            amplitude: 10.0,
            floor: 30,
        }
    }
}

impl SgvCurve {
    pub fn value(&self, index: usize) -> i64 {
        let i = index as f64;
        let raw = self.start - self.slope * i + self.amplitude * (2.0 * i / PI).sin();
        (raw.trunc() as i64).max(self.floor)
    }

    pub fn series(&self, count: usize) -> Vec<i64> {
        (0..count).map(|i| self.value(i)).collect()
    }
}

pub fn default_sgv_series(count: usize) -> Vec<i64> {
    SgvCurve::default().series(count)
}

/// Epoch-millisecond timestamps five minutes apart, newest first.
pub fn default_dates(anchor: &TimeAnchor, count: usize, offset_seconds: i64) -> Vec<i64> {
    let anchor = anchor.shifted(offset_seconds);
    (0..count)
        .map(|i| anchor.epoch_millis(i, DEFAULT_STEP_SECONDS))
        .collect()
}

/// The same instants as [`default_dates`], as ISO-8601 strings.
pub fn default_dates_as_iso(anchor: &TimeAnchor, count: usize, offset_seconds: i64) -> Vec<String> {
    let anchor = anchor.shifted(offset_seconds);
    (0..count)
        .map(|i| anchor.iso(i, DEFAULT_STEP_SECONDS))
        .collect()
}

/// Pair values with dates. The shorter input decides the length, which
/// scenarios use on purpose to cut a series short.
pub fn zip_entries(values: &[i64], dates: &[i64], direction: Option<Direction>) -> Vec<SgvEntry> {
    values
        .iter()
        .zip(dates)
        .map(|(&sgv, &date)| {
            let entry = SgvEntry::new(sgv, date);
            match direction {
                Some(d) => entry.with_direction(d),
                None => entry,
            }
        })
        .collect()
}

/// `count` fully populated entries of the default curve, all with the same
/// direction.
pub fn default_entries(anchor: &TimeAnchor, direction: Direction, count: usize) -> Vec<SgvEntry> {
    let values = default_sgv_series(count);
    let dates = default_dates(anchor, count, 0);
    zip_entries(&values, &dates, Some(direction))
        .into_iter()
        .map(SgvEntry::tagged)
        .collect()
}

/// Replay a literal series against fresh dates, `Flat` throughout.
/// Zeros are kept as-is; the watchface treats them as missing points.
pub fn entries_from_values(anchor: &TimeAnchor, values: &[i64], offset_seconds: i64) -> Vec<SgvEntry> {
    let dates = default_dates(anchor, values.len(), offset_seconds);
    zip_entries(values, &dates, Some(Direction::Flat))
}

/// The recorded trace, with the newest reading `minutes_old` minutes ago.
pub fn real_life_entries(anchor: &TimeAnchor, minutes_old: i64) -> Vec<SgvEntry> {
    let dates = default_dates(anchor, RECORDED_TRACE.len(), -60 * minutes_old);
    zip_entries(&RECORDED_TRACE, &dates, Some(Direction::Flat))
        .into_iter()
        .map(SgvEntry::tagged)
        .collect()
}
