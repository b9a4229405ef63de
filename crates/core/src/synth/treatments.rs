//! Bolus, temp basal and scheduled basal generators.
//!
//! Temp basals sit half a reading step before the reading they belong to,
//! so a 30-minute segment is centered under its points on the graph.

use watchface_protocol::{BasalProfile, BasalRate, Treatment};

use crate::anchor::{DEFAULT_STEP_SECONDS, TimeAnchor, iso_date};
use crate::synth::sgv::{DEFAULT_COUNT, default_dates_as_iso};

/// Offset that centers a basal segment between two readings.
pub const BASAL_CENTER_OFFSET_SECONDS: i64 = -DEFAULT_STEP_SECONDS / 2;

/// Default length of a temp basal, in minutes.
pub const TEMP_BASAL_MINUTES: u32 = 30;

const FAKE_BASAL_RATES: [f64; 10] = [2.0, 1.0, 0.0, 0.1, 0.4, 0.0, 0.5, 1.5, 0.8, 0.0];

const FAKE_BOLUS_INDICES: [usize; 6] = [0, 2, 5, 6, 11, 40];

/// One bolus per listed sample index. Indices are sparse; an index past the
/// default window still gets a timestamp.
pub fn boluses_at(anchor: &TimeAnchor, indices: &[usize], insulin: f64) -> Vec<Treatment> {
    indices
        .iter()
        .map(|&i| Treatment::bolus(anchor.iso(i, DEFAULT_STEP_SECONDS), insulin))
        .collect()
}

/// Temp basals at sample indices, centered between readings.
pub fn basals_at(anchor: &TimeAnchor, segments: &[(usize, u32, f64)]) -> Vec<Treatment> {
    let centered = anchor.shifted(BASAL_CENTER_OFFSET_SECONDS);
    segments
        .iter()
        .map(|&(i, duration, rate)| {
            Treatment::temp_basal(centered.iso(i, DEFAULT_STEP_SECONDS), duration, rate)
        })
        .collect()
}

/// Ten consecutive 30-minute temp basals starting at the newest reading.
pub fn fake_temp_basals(anchor: &TimeAnchor) -> Vec<Treatment> {
    let dates = default_dates_as_iso(anchor, DEFAULT_COUNT, BASAL_CENTER_OFFSET_SECONDS);
    FAKE_BASAL_RATES
        .iter()
        .zip(dates)
        .map(|(&rate, date)| Treatment::temp_basal(date, TEMP_BASAL_MINUTES, rate))
        .collect()
}

/// Six 1 U boluses, some on adjacent readings.
pub fn fake_boluses(anchor: &TimeAnchor) -> Vec<Treatment> {
    boluses_at(anchor, &FAKE_BOLUS_INDICES, 1.0)
}

/// Boluses from literal `(seconds, insulin)` pairs. Pair `i` is placed at
/// `now + offset + seconds - 300*i`.
pub fn boluses_from_offsets(
    anchor: &TimeAnchor,
    pairs: &[(i64, f64)],
    offset_seconds: i64,
) -> Vec<Treatment> {
    let anchor = anchor.shifted(offset_seconds);
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(seconds, insulin))| {
            Treatment::bolus(iso_date(anchor.shifted(seconds).sample_time(i)), insulin)
        })
        .collect()
}

/// Temp basals from literal `(seconds, duration, rate)` triples, placed like
/// [`boluses_from_offsets`]. Overlapping or zero-length segments are passed
/// through untouched; the watchface has to resolve them.
pub fn basals_from_offsets(
    anchor: &TimeAnchor,
    triples: &[(i64, u32, f64)],
    offset_seconds: i64,
) -> Vec<Treatment> {
    let anchor = anchor.shifted(offset_seconds);
    triples
        .iter()
        .enumerate()
        .map(|(i, &(seconds, duration, rate))| {
            Treatment::temp_basal(
                iso_date(anchor.shifted(seconds).sample_time(i)),
                duration,
                rate,
            )
        })
        .collect()
}

/// A profile with one flat scheduled basal rate all day.
pub fn profile_with_one_basal(rate: f64) -> Vec<BasalProfile> {
    vec![BasalProfile {
        basal: vec![BasalRate {
            time: "00:00".to_string(),
            value: rate,
        }],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn anchor() -> TimeAnchor {
        TimeAnchor::at(DateTime::parse_from_rfc3339("2026-10-19T12:00:00+00:00").unwrap())
    }

    fn millis(t: &Treatment) -> i64 {
        DateTime::parse_from_rfc3339(t.created_at())
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn fake_temp_basals_truncate_to_rate_list() {
        let basals = fake_temp_basals(&anchor());
        assert_eq!(basals.len(), FAKE_BASAL_RATES.len());
        assert_eq!(basals[0].created_at(), "2026-10-19T11:57:30+00:00");
        assert_eq!(
            basals[1],
            Treatment::temp_basal("2026-10-19T11:52:30+00:00", 30, 1.0)
        );
    }

    #[test]
    fn basals_are_centered_between_readings() {
        let a = anchor();
        let basals = basals_at(&a, &[(0, 30, 1.0), (9, 30, 1.0)]);
        let reading_0 = a.epoch_millis(0, DEFAULT_STEP_SECONDS);
        let reading_1 = a.epoch_millis(1, DEFAULT_STEP_SECONDS);
        assert_eq!(millis(&basals[0]), (reading_0 + reading_1) / 2);
        assert_eq!(
            millis(&basals[1]),
            a.epoch_millis(9, DEFAULT_STEP_SECONDS) - 150_000
        );
    }

    #[test]
    fn fake_boluses_land_on_readings() {
        let a = anchor();
        let boluses = fake_boluses(&a);
        assert_eq!(boluses.len(), 6);
        assert!(boluses.iter().all(Treatment::is_bolus));
        assert_eq!(millis(&boluses[4]), a.epoch_millis(11, DEFAULT_STEP_SECONDS));
        assert_eq!(millis(&boluses[5]), a.epoch_millis(40, DEFAULT_STEP_SECONDS));
    }

    #[test]
    fn literal_offsets_step_back_per_tuple() {
        let a = anchor();
        let boluses = boluses_from_offsets(&a, &[(-1558, 5.0), (-3683, 3.5)], 0);
        assert_eq!(millis(&boluses[0]), a.now().timestamp_millis() - 1_558_000);
        assert_eq!(
            millis(&boluses[1]),
            a.now().timestamp_millis() - 3_683_000 - 300_000
        );
    }

    #[test]
    fn overlapping_basal_segments_pass_through() {
        let basals = basals_from_offsets(
            &anchor(),
            &[(-11602, 30, 1.45), (-11628, 0, 0.0), (-11928, 30, 1.4)],
            0,
        );
        assert_eq!(basals.len(), 3);
        assert!(matches!(basals[1], Treatment::TempBasal { duration: 0, .. }));
    }

    #[test]
    fn literal_offset_shifts_everything() {
        let a = anchor();
        let base = basals_from_offsets(&a, &[(-190, 30, 3.575)], 0);
        let moved = basals_from_offsets(&a, &[(-190, 30, 3.575)], -600);
        assert_eq!(millis(&base[0]) - millis(&moved[0]), 600_000);
    }

    #[test]
    fn one_basal_profile() {
        let profile = profile_with_one_basal(0.65);
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            serde_json::json!([{ "basal": [{ "time": "00:00", "value": 0.65 }] }])
        );
    }
}
