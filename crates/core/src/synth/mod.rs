//! Parametric generators for every data channel the watchface reads.
//!
//! Every generator takes the scenario's [`TimeAnchor`](crate::anchor::TimeAnchor)
//! so that independently generated streams line up. Generators never fail:
//! a zero count gives an empty series and zipped inputs truncate to the
//! shorter side.

pub mod devicestatus;
pub mod sgv;
pub mod treatments;

pub use devicestatus::{loop_devicestatus, openaps_devicestatus, uploader_battery_devicestatus};
pub use sgv::{
    DEFAULT_COUNT, RECORDED_TRACE, SgvCurve, default_dates, default_dates_as_iso,
    default_entries, default_sgv_series, entries_from_values, real_life_entries, zip_entries,
};
pub use treatments::{
    BASAL_CENTER_OFFSET_SECONDS, TEMP_BASAL_MINUTES, basals_at, basals_from_offsets, boluses_at,
    boluses_from_offsets, fake_boluses, fake_temp_basals, profile_with_one_basal,
};
