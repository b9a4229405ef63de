//! Point shapes, margins, colors, and the treatments drawn under them.

use watchface_protocol::{Color, ConfigTree, opt};

use super::Fixture;
use crate::error::Result;
use crate::scenario::ScenarioDescriptor;
use crate::synth::{
    basals_at, entries_from_values, fake_boluses, fake_temp_basals, profile_with_one_basal,
    real_life_entries,
};

const POINT_STYLE_PRESETS: [&str; 4] = ["a", "b", "c", "d"];

fn on_layout_d() -> ConfigTree {
    ConfigTree::new().with(opt::LAYOUT, "d")
}

fn barely_on_screen(right_margin: i64) -> ConfigTree {
    on_layout_d()
        .with(opt::POINT_SHAPE, "rectangle")
        .with(opt::POINT_WIDTH, 9)
        .with(opt::POINT_RECT_HEIGHT, 9)
        .with(opt::POINT_MARGIN, 6)
        .with(opt::POINT_RIGHT_MARGIN, right_margin)
        .with(opt::PLOT_LINE, true)
        .with(opt::PLOT_LINE_WIDTH, 1)
}

fn colored_points() -> ConfigTree {
    on_layout_d()
        .with(opt::TOP_OF_GRAPH, 200)
        .with(opt::TOP_OF_RANGE, 150)
        .with(opt::BOTTOM_OF_RANGE, 100)
        .with(opt::BOTTOM_OF_GRAPH, 80)
        .with(opt::POINT_SHAPE, "circle")
        .with(opt::POINT_WIDTH, 7)
        .with(opt::POINT_MARGIN, 4)
        .with(opt::POINT_RIGHT_MARGIN, 0)
        .with(opt::PLOT_LINE, true)
        .with(opt::PLOT_LINE_WIDTH, 3)
        .with(opt::POINT_COLOR_DEFAULT, Color::hex(0x00AA00))
        .with(opt::POINT_COLOR_HIGH, Color::hex(0xFFAA00))
        .with(opt::POINT_COLOR_LOW, Color::hex(0xFF0000))
        .with(opt::PLOT_LINE_IS_CUSTOM_COLOR, false)
        .with(opt::PLOT_LINE_COLOR, Color::BLACK)
}

pub(super) fn scenarios(fx: &Fixture<'_>) -> Result<Vec<ScenarioDescriptor>> {
    let anchor = &fx.anchor;
    let values = |v: &[i64]| entries_from_values(anchor, v, 0);
    let trace = || real_life_entries(anchor, 0);

    let barely: Vec<i64> = (0..10).map(|i| 200 - 12 * i + i * i).collect();
    let negative_margin: Vec<i64> = (65..=230).rev().step_by(15).collect();
    let with_treatments: Vec<i64> = (120..=200).rev().step_by(10).collect();

    let mut builders = vec![
        ScenarioDescriptor::builder("TestBasalGraph")
            .doc("Test temp basals drawn over a flat scheduled rate.")
            .config(
                on_layout_d()
                    .with(opt::BASAL_GRAPH, true)
                    .with(opt::BASAL_HEIGHT, 20),
            )
            .sgvs(trace())
            .profile(profile_with_one_basal(0.5))
            .treatments(basals_at(
                anchor,
                &[
                    (0, 30, 1.0),
                    (9, 30, 1.0),
                    (16, 30, 1.0),
                    (18, 30, 0.8),
                    (25, 30, 0.0),
                    (35, 30, 0.2),
                    (48, 30, 0.05),
                ],
            )),
        ScenarioDescriptor::builder("TestPointsCircleAlignment")
            .doc("Test the vertical alignment of circular points, including trimmed values.")
            .config(
                on_layout_d()
                    .with(opt::TOP_OF_GRAPH, 250)
                    .with(opt::TOP_OF_RANGE, 180)
                    .with(opt::BOTTOM_OF_RANGE, 80)
                    .with(opt::BOTTOM_OF_GRAPH, 40)
                    .with(opt::H_GRIDLINES, 50)
                    .with(opt::POINT_SHAPE, "circle")
                    .with(opt::POINT_WIDTH, 11)
                    .with(opt::POINT_MARGIN, 4)
                    .with(opt::POINT_RIGHT_MARGIN, 5)
                    .with(opt::PLOT_LINE, true)
                    .with(opt::PLOT_LINE_WIDTH, 3),
            )
            .sgvs(values(&[300, 250, 200, 180, 150, 100, 80, 50, 30])),
        ScenarioDescriptor::builder("TestPointsMissingWithLine")
            .doc("Test that the line is drawn as expected when SGV values are missing.")
            .config(
                on_layout_d()
                    .with(opt::POINT_SHAPE, "circle")
                    .with(opt::POINT_WIDTH, 9)
                    .with(opt::POINT_MARGIN, 3)
                    .with(opt::POINT_RIGHT_MARGIN, 0)
                    .with(opt::PLOT_LINE, true)
                    .with(opt::PLOT_LINE_WIDTH, 1),
            )
            .sgvs(values(&[100, 150, 0, 0, 85, 0, 85, 0, 30, 85, 0, 230])),
        ScenarioDescriptor::builder("TestPointsBarelyOnScreen")
            .doc("Test that the oldest point is still drawn when it just fits.")
            .config(barely_on_screen(0))
            .sgvs(values(&barely)),
        ScenarioDescriptor::builder("TestPointsBarelyOffScreen")
            .doc("Test that one more pixel of right margin pushes the oldest point off.")
            .config(barely_on_screen(1))
            .sgvs(values(&barely)),
        ScenarioDescriptor::builder("TestPointsNegativeMargin")
            .doc("Test overlapping points from a negative margin.")
            .config(
                on_layout_d()
                    .with(opt::POINT_SHAPE, "rectangle")
                    .with(opt::POINT_WIDTH, 19)
                    .with(opt::POINT_RECT_HEIGHT, 19)
                    .with(opt::POINT_MARGIN, -9)
                    .with(opt::POINT_RIGHT_MARGIN, 0)
                    .with(opt::PLOT_LINE, false),
            )
            .sgvs(values(&negative_margin)),
        ScenarioDescriptor::builder("TestPointsMarginsWithTreatments")
            .doc("Test that boluses and basals shift left with the point margin, and the leftmost basal reaches the edge.")
            .config(
                on_layout_d()
                    .with(opt::POINT_SHAPE, "rectangle")
                    .with(opt::POINT_WIDTH, 9)
                    .with(opt::POINT_RECT_HEIGHT, 13)
                    .with(opt::POINT_MARGIN, 5)
                    .with(opt::POINT_RIGHT_MARGIN, 15)
                    .with(opt::PLOT_LINE, false)
                    .with(opt::BOLUS_TICKS, true)
                    .with(opt::BASAL_GRAPH, true)
                    .with(opt::BASAL_HEIGHT, 20),
            )
            .sgvs(values(&with_treatments))
            .profile(profile_with_one_basal(0.5))
            .treatments(fake_temp_basals(anchor))
            .treatments(fake_boluses(anchor)),
        ScenarioDescriptor::builder("TestPointsBolusesDefault")
            .doc("Test that bolus ticks are left-aligned with width 2 by default.")
            .config(on_layout_d().with(opt::BOLUS_TICKS, true))
            .sgvs(trace())
            .treatments(fake_boluses(anchor)),
        ScenarioDescriptor::builder("TestPointsBolusesCenteredEven")
            .doc("Test that bolus ticks are center-aligned with width 2 for even-width points.")
            .config(
                on_layout_d()
                    .with(opt::BOLUS_TICKS, true)
                    .with(opt::POINT_WIDTH, 6),
            )
            .sgvs(trace())
            .treatments(fake_boluses(anchor)),
        ScenarioDescriptor::builder("TestPointsBolusesCenteredOdd")
            .doc("Test that bolus ticks are center-aligned with width 3 for odd-width points.")
            .config(
                ConfigTree::new()
                    .with(opt::LAYOUT, "a")
                    .with(opt::BOLUS_TICKS, true)
                    .with(opt::POINT_SHAPE, "circle")
                    .with(opt::POINT_WIDTH, 7)
                    .with(opt::POINT_RIGHT_MARGIN, 1),
            )
            .sgvs(trace())
            .treatments(fake_boluses(anchor)),
    ];

    for preset in POINT_STYLE_PRESETS {
        let style = fx
            .registry
            .point_style(preset)?
            .with(opt::LAYOUT, "d")
            .with(opt::BOTTOM_OF_RANGE, 20)
            .with(opt::TOP_OF_RANGE, 400)
            .with(opt::H_GRIDLINES, 0);
        builders.push(
            ScenarioDescriptor::builder(format!("TestPointsPreset{}", preset.to_uppercase()))
                .doc(format!("Test point style preset {preset} without range lines."))
                .config(style)
                .sgvs(trace()),
        );
    }

    builders.extend([
        ScenarioDescriptor::builder("TestPointsColor")
            .doc("Test high, low and in-range point colors with the line following them.")
            .config(colored_points())
            .sgvs(values(&[163, 162, 160, 155, 150, 145, 125, 110, 102, 100, 95, 90, 88])),
        ScenarioDescriptor::builder("TestPointsColorLineWithMissingPoints")
            .doc("Test line coloring across missing points.")
            .config(colored_points())
            .sgvs(values(&[130, 160, 0, 140, 0, 0, 120, 0, 180, 0, 90, 0, 120])),
        ScenarioDescriptor::builder("TestPointsColorCustomLine")
            .doc("Test a custom plot line color.")
            .config(
                colored_points()
                    .with(opt::PLOT_LINE_IS_CUSTOM_COLOR, true)
                    .with(opt::PLOT_LINE_COLOR, Color::hex(0x5555FF)),
            )
            .sgvs(values(&[163, 162, 160, 155, 150, 145, 125, 110, 102, 100, 95, 90, 88])),
    ]);

    builders
        .into_iter()
        .map(|b| b.build(fx.registry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::TimeAnchor;
    use crate::registry::LayoutRegistry;
    use chrono::DateTime;
    use watchface_protocol::Treatment;

    fn all() -> Vec<ScenarioDescriptor> {
        let fx = Fixture {
            anchor: TimeAnchor::at(DateTime::parse_from_rfc3339("2026-10-19T22:10:00+05:30").unwrap()),
            registry: LayoutRegistry::builtin().unwrap(),
        };
        scenarios(&fx).unwrap()
    }

    fn named<'a>(all: &'a [ScenarioDescriptor], name: &str) -> &'a ScenarioDescriptor {
        all.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn generated_series() {
        let all = all();
        let sgvs = |name: &str| -> Vec<i64> {
            named(&all, name).sgvs.iter().filter_map(|e| e.sgv).collect()
        };
        assert_eq!(sgvs("TestPointsBarelyOnScreen"), [200, 189, 180, 173, 168, 165, 164, 165, 168, 173]);
        assert_eq!(sgvs("TestPointsNegativeMargin").first(), Some(&230));
        assert_eq!(sgvs("TestPointsNegativeMargin").last(), Some(&65));
        assert_eq!(sgvs("TestPointsMarginsWithTreatments"), [200, 190, 180, 170, 160, 150, 140, 130, 120]);
    }

    #[test]
    fn off_screen_differs_by_one_margin_pixel() {
        let all = all();
        let on = &named(&all, "TestPointsBarelyOnScreen").config;
        let off = &named(&all, "TestPointsBarelyOffScreen").config;
        assert_eq!(on.get(opt::POINT_RIGHT_MARGIN).map(|m| m + 1), off.get(opt::POINT_RIGHT_MARGIN));
        assert_eq!(on.get(opt::POINT_WIDTH), off.get(opt::POINT_WIDTH));
    }

    #[test]
    fn margins_scenario_mixes_basals_and_boluses() {
        let all = all();
        let s = named(&all, "TestPointsMarginsWithTreatments");
        assert_eq!(s.treatments.iter().filter(|t| t.is_bolus()).count(), 6);
        assert_eq!(s.treatments.iter().filter(|t| !t.is_bolus()).count(), 10);
        assert_eq!(s.profile.len(), 1);
    }

    #[test]
    fn presets_come_from_the_registry() {
        let all = all();
        let registry = LayoutRegistry::builtin().unwrap();
        for preset in POINT_STYLE_PRESETS {
            let name = format!("TestPointsPreset{}", preset.to_uppercase());
            let s = named(&all, &name);
            let style = registry.point_style(preset).unwrap();
            assert_eq!(s.config.get(opt::POINT_SHAPE), style.get(opt::POINT_SHAPE));
            assert_eq!(s.config.get(opt::H_GRIDLINES), Some(0));
        }
    }

    #[test]
    fn basal_graph_rates() {
        let all = all();
        let s = named(&all, "TestBasalGraph");
        let rates: Vec<f64> = s
            .treatments
            .iter()
            .filter_map(|t| match t {
                Treatment::TempBasal { absolute, .. } => Some(*absolute),
                Treatment::Bolus { .. } => None,
            })
            .collect();
        assert_eq!(rates, [1.0, 1.0, 1.0, 0.8, 0.0, 0.2, 0.05]);
    }

    #[test]
    fn custom_line_color() {
        let all = all();
        let s = named(&all, "TestPointsColorCustomLine");
        assert_eq!(s.config.get(opt::PLOT_LINE_IS_CUSTOM_COLOR), Some(true));
        assert_eq!(s.config.get(opt::PLOT_LINE_COLOR), Some(Color::hex(0x5555FF)));
    }
}
