//! Predicted glucose curves from Loop and OpenAPS.

use watchface_protocol::{
    BatteryLoc, Color, ConfigTree, ElementKind, ElementPatch, LayoutPatch, RecencyLoc,
    RecencyStyle, TimeAlign, opt,
};

use super::{Fixture, custom};
use crate::compose::LayoutEdit;
use crate::error::Result;
use crate::scenario::{ScenarioBuilder, ScenarioDescriptor};
use crate::synth::{
    basals_from_offsets, boluses_from_offsets, entries_from_values, loop_devicestatus,
    openaps_devicestatus, profile_with_one_basal,
};

const SGV_SERIES: [i64; 6] = [150, 175, 150, 175, 150, 125];
const PREDICTIONS: [i64; 6] = [150, 125, 100, 75, 100, 125];

const TREATED_SGVS: [i64; 84] = [
    102, 97, 94, 93, 94, 96, 97, 96, 98, 101, 104, 106, 104, 105, 106, 108, 112, 113, 115, 116,
    117, 119, 121, 122, 126, 129, 131, 133, 135, 136, 138, 141, 143, 145, 146, 148, 149, 152, 153,
    152, 153, 153, 153, 152, 152, 150, 147, 148, 146, 148, 129, 137, 137, 129, 127, 126, 98, 104,
    87, 85, 85, 83, 90, 108, 110, 117, 123, 129, 139, 130, 145, 142, 147, 148, 151, 150, 152, 156,
    163, 167, 165, 182, 171, 185,
];

const TREATED_PREDICTION: [i64; 48] = [
    102, 102, 106, 109, 111, 111, 111, 110, 108, 107, 106, 105, 105, 106, 107, 109, 110, 112, 114,
    116, 118, 120, 123, 126, 128, 131, 132, 134, 135, 136, 137, 137, 137, 137, 137, 138, 139, 140,
    140, 140, 141, 140, 141, 143, 144, 144, 144, 144,
];

/// `(seconds from now, units)`
const TREATED_BOLUSES: [(i64, f64); 3] = [(-1558, 5.0), (-3683, 3.5), (-21357, 1.5)];

/// `(seconds from now, minutes, U/hr)`
const TREATED_BASALS: [(i64, u32, f64); 16] = [
    (-190, 30, 3.575),
    (-462, 30, 2.85),
    (-1058, 0, 0.0),
    (-1987, 30, 0.0),
    (-3159, 30, 0.0),
    (-4060, 0, 0.0),
    (-4360, 30, 0.0),
    (-10726, 0, 0.0),
    (-11028, 30, 1.375),
    (-11602, 30, 1.45),
    (-11628, 0, 0.0),
    (-11928, 30, 1.4),
    (-12828, 0, 0.0),
    (-13125, 30, 1.55),
    (-13685, 30, 1.775),
    (-14286, 0, 0.0),
];

const OPENAPS_SGVS: [i64; 19] = [
    77, 77, 78, 79, 80, 82, 83, 84, 84, 84, 83, 85, 84, 84, 86, 87, 89, 91, 92,
];

const OPENAPS_COB: [i64; 42] = [
    77, 76, 75, 75, 76, 77, 79, 82, 85, 89, 92, 96, 99, 103, 107, 110, 114, 117, 120, 124, 126,
    129, 132, 134, 136, 138, 139, 141, 142, 143, 144, 145, 146, 147, 147, 148, 148, 149, 149, 150,
    150, 151,
];

const OPENAPS_ACOB: [i64; 30] = [
    77, 83, 88, 93, 98, 102, 106, 110, 112, 114, 116, 119, 121, 124, 126, 128, 131, 133, 135, 137,
    139, 140, 142, 143, 144, 145, 146, 147, 147, 148,
];

const OPENAPS_IOB: [i64; 30] = [
    77, 75, 75, 74, 75, 76, 77, 79, 81, 84, 86, 89, 91, 93, 96, 98, 101, 103, 105, 107, 109, 110,
    112, 113, 114, 115, 116, 117, 117, 118,
];

fn predictions_config() -> ConfigTree {
    ConfigTree::new()
        .with(opt::PREDICT_ENABLED, true)
        .with(opt::PREDICT_SOURCE, "loop")
        .with(opt::PREDICT_MAX_LENGTH, 48)
        .with(opt::LAYOUT, "d")
        .with(opt::POINT_WIDTH, 5)
        .with(opt::POINT_RECT_HEIGHT, 5)
}

/// A short SGV series and a Loop prediction, each aged independently.
struct Staleness {
    name: &'static str,
    doc: &'static str,
    sgv_minutes_ago: i64,
    prediction_minutes_ago: f64,
}

const STALENESS: [Staleness; 6] = [
    Staleness {
        name: "TestPredictionsDefault",
        doc: "Test a fresh prediction continuing fresh readings.",
        sgv_minutes_ago: 3,
        prediction_minutes_ago: 2.0,
    },
    Staleness {
        name: "TestPredictionsSGVNotQuiteStale",
        doc: "Test readings and prediction just short of stale.",
        sgv_minutes_ago: 7,
        prediction_minutes_ago: 7.0,
    },
    Staleness {
        name: "TestPredictionsSGVBarelyStale",
        doc: "Test readings and prediction just past stale.",
        sgv_minutes_ago: 9,
        prediction_minutes_ago: 9.0,
    },
    Staleness {
        name: "TestPredictionsSGVStalePredictionFresh",
        doc: "Test a fresh prediction after stale readings.",
        sgv_minutes_ago: 18,
        prediction_minutes_ago: 1.0,
    },
    Staleness {
        name: "TestPredictionsSGVFreshPredictionStale",
        doc: "Test a stale prediction behind fresh readings.",
        sgv_minutes_ago: 2,
        prediction_minutes_ago: 12.0,
    },
    Staleness {
        name: "TestPredictionsWithAGap",
        doc: "Test a prediction that starts in the future, leaving a gap after the last reading.",
        sgv_minutes_ago: 2,
        prediction_minutes_ago: -10.0,
    },
];

fn loop_prediction(
    fx: &Fixture<'_>,
    name: &str,
    sgv_minutes_ago: i64,
    predictions: &[i64],
    prediction_minutes_ago: f64,
) -> ScenarioBuilder {
    ScenarioDescriptor::builder(name)
        .config(predictions_config())
        .sgvs(entries_from_values(
            &fx.anchor,
            &SGV_SERIES,
            -60 * sgv_minutes_ago,
        ))
        .devicestatus(loop_devicestatus(
            &fx.anchor,
            predictions,
            prediction_minutes_ago,
        ))
}

fn treated(fx: &Fixture<'_>, name: &str, doc: &str, max_length: i64) -> Result<ScenarioBuilder> {
    let layout = LayoutEdit::preset(fx.registry, "d")?
        .patch(
            LayoutPatch::default()
                .recency_style(RecencyStyle::MediumRing)
                .recency_color_text(Color::BLACK)
                .recency_color_circle(Color::hex(0x005555)),
        )
        .element(
            ElementKind::TimeArea,
            ElementPatch::default().enabled(true).height(27),
        )?
        .finish();
    let config = custom(layout)
        .with(opt::BASAL_GRAPH, true)
        .with(opt::BASAL_HEIGHT, 20)
        .with(opt::BOLUS_TICKS, true)
        .with(opt::POINT_COLOR_DEFAULT, Color::hex(0x0000FF))
        .with(opt::PREDICT_ENABLED, true)
        .with(opt::PREDICT_MAX_LENGTH, max_length)
        .with(opt::POINT_WIDTH, 3)
        .with(opt::POINT_MARGIN, -1);
    Ok(ScenarioDescriptor::builder(name)
        .doc(doc)
        .config(config)
        .sgvs(entries_from_values(&fx.anchor, &TREATED_SGVS, -3 * 60))
        .devicestatus(loop_devicestatus(&fx.anchor, &TREATED_PREDICTION, 1.0))
        .treatments(boluses_from_offsets(&fx.anchor, &TREATED_BOLUSES, 0))
        .treatments(basals_from_offsets(&fx.anchor, &TREATED_BASALS, 0))
        .profile(profile_with_one_basal(0.65)))
}

fn openaps_series(fx: &Fixture<'_>) -> Result<ScenarioBuilder> {
    let layout = LayoutEdit::preset(fx.registry, "d")?
        .patch(
            LayoutPatch::default()
                .recency_color_text(Color::BLACK)
                .recency_color_circle(Color::hex(0xAAFFAA))
                .recency_loc(RecencyLoc::TimeTopLeft)
                .battery_loc(BatteryLoc::TimeBottomLeft)
                .time_align(TimeAlign::Right),
        )
        .element(
            ElementKind::TimeArea,
            ElementPatch::default().enabled(true).bottom(false),
        )?
        .element(ElementKind::BgRow, ElementPatch::default().bottom(true))?
        .select(&[ElementKind::BgRow, ElementKind::Graph, ElementKind::TimeArea])?
        .finish();
    let config = custom(layout)
        .with(opt::POINT_COLOR_DEFAULT, Color::hex(0x0000FF))
        .with(opt::POINT_COLOR_LOW, Color::hex(0x0000FF))
        .with(opt::PREDICT_ENABLED, true)
        .with(opt::PREDICT_SOURCE, "openaps")
        .with(opt::PREDICT_MAX_LENGTH, 30)
        .with(opt::H_GRIDLINES, 0)
        .with(opt::BOTTOM_OF_GRAPH, 50)
        .with(opt::TOP_OF_GRAPH, 225)
        .with(opt::BOTTOM_OF_RANGE, 80)
        .with(opt::TOP_OF_RANGE, 160);
    Ok(ScenarioDescriptor::builder("TestPredictionsWithMultipleSeries")
        .doc("Test several named OpenAPS prediction curves at once.")
        .config(config)
        .sgvs(entries_from_values(&fx.anchor, &OPENAPS_SGVS, -3 * 60))
        .devicestatus(openaps_devicestatus(
            &fx.anchor,
            "openaps://indy-e1",
            &[
                ("COB", &OPENAPS_COB[..]),
                ("aCOB", &OPENAPS_ACOB[..]),
                ("IOB", &OPENAPS_IOB[..]),
            ],
        )))
}

pub(super) fn scenarios(fx: &Fixture<'_>) -> Result<Vec<ScenarioDescriptor>> {
    let mut builders: Vec<ScenarioBuilder> = STALENESS
        .iter()
        .map(|s| {
            loop_prediction(
                fx,
                s.name,
                s.sgv_minutes_ago,
                &PREDICTIONS,
                s.prediction_minutes_ago,
            )
            .doc(s.doc)
        })
        .collect();

    builders.push(
        loop_prediction(fx, "TestPredictionsNegativeMargin", 2, &PREDICTIONS, 2.0)
            .doc("Test predictions drawn with overlapping points.")
            .config(
                ConfigTree::new()
                    .with(opt::POINT_RECT_HEIGHT, 5)
                    .with(opt::POINT_WIDTH, 5)
                    .with(opt::POINT_MARGIN, -2),
            ),
    );

    let falling: Vec<i64> = (50..=300).rev().step_by(25).collect();
    builders.push(
        loop_prediction(fx, "TestPredictionsColors", 2, &falling, 2.0)
            .doc("Test high, low and in-range prediction colors.")
            .config(
                ConfigTree::new()
                    .with(opt::PREDICT_COLOR_DEFAULT, Color::hex(0x00AA00))
                    .with(opt::PREDICT_COLOR_HIGH, Color::hex(0xFFAA00))
                    .with(opt::PREDICT_COLOR_LOW, Color::hex(0xFF0055)),
            ),
    );

    builders.push(treated(
        fx,
        "TestPredictionsWithBolusesAndBasals",
        "Test a Loop prediction over a day of boluses and temp basals.",
        48,
    )?);
    builders.push(treated(
        fx,
        "TestPredictionsMaxLength",
        "Test that the prediction is cut at predictMaxLength.",
        18,
    )?);
    builders.push(openaps_series(fx)?);

    builders
        .into_iter()
        .map(|b| b.build(fx.registry))
        .collect()
}
