//! Uploader and loop status records.

use watchface_protocol::{
    DeviceStatus, LoopPrediction, LoopStatus, OpenApsStatus, OpenApsSuggestion, PredictionCurves,
};

use crate::anchor::{TimeAnchor, iso_date};

/// A Loop status whose prediction starts at the status timestamp,
/// `minutes_ago` before the anchor. Negative values put it in the future.
pub fn loop_devicestatus(
    anchor: &TimeAnchor,
    predictions: &[i64],
    minutes_ago: f64,
) -> Vec<DeviceStatus> {
    let start = iso_date(anchor.minutes_ago(minutes_ago));
    vec![DeviceStatus {
        created_at: start.clone(),
        loop_status: Some(LoopStatus {
            predicted: LoopPrediction {
                values: predictions.to_vec(),
                start_date: start,
            },
        }),
        ..DeviceStatus::default()
    }]
}

/// A phone uploader battery report.
pub fn uploader_battery_devicestatus(
    anchor: &TimeAnchor,
    battery: u8,
    minutes_ago: f64,
) -> Vec<DeviceStatus> {
    vec![DeviceStatus {
        created_at: iso_date(anchor.minutes_ago(minutes_ago)),
        uploader_battery: Some(battery),
        ..DeviceStatus::default()
    }]
}

/// An OpenAPS rig's latest suggestion with named prediction curves, followed
/// by the previous cycle's status five minutes earlier, which predicted
/// nothing.
pub fn openaps_devicestatus(
    anchor: &TimeAnchor,
    device: &str,
    pred_bgs: &[(&str, &[i64])],
) -> Vec<DeviceStatus> {
    let curves: PredictionCurves = pred_bgs
        .iter()
        .map(|(name, values)| (*name, values.to_vec()))
        .collect();
    vec![
        DeviceStatus {
            created_at: iso_date(anchor.minutes_ago(0.0)),
            device: Some(device.to_string()),
            openaps: Some(OpenApsStatus {
                suggested: OpenApsSuggestion {
                    pred_bgs: Some(curves),
                },
            }),
            ..DeviceStatus::default()
        },
        DeviceStatus {
            created_at: iso_date(anchor.minutes_ago(5.0)),
            device: Some(device.to_string()),
            openaps: Some(OpenApsStatus::default()),
            ..DeviceStatus::default()
        },
    ]
}
