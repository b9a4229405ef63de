//! Layout presets and custom arrangements of the dashboard elements.

use watchface_protocol::{
    BatteryLoc, Color, ConfigTree, ConnStatusLoc, Direction, ElementKind, ElementPatch,
    ElementSpec, LayoutPatch, LayoutPreset, RecencyLoc, RecencyStyle, TimeAlign, opt,
};

use super::{Fixture, custom};
use crate::compose::LayoutEdit;
use crate::error::{Result, ScenarioError};
use crate::scenario::{ScenarioBuilder, ScenarioDescriptor};
use crate::synth::{DEFAULT_COUNT, default_entries, real_life_entries};

const TIME_FONT_HEIGHTS: [u16; 4] = [18, 14, 10, 6];

fn layout_colors(layout: &str) -> ConfigTree {
    ConfigTree::new()
        .with(opt::POINT_COLOR_LOW, Color::hex(0xFF0000))
        .with(opt::POINT_COLOR_HIGH, Color::hex(0xFFAA00))
        .with(opt::POINT_COLOR_DEFAULT, Color::hex(0x0000FF))
        .with(opt::TOP_OF_RANGE, 160)
        .with(opt::BOTTOM_OF_RANGE, 80)
        .with(opt::LAYOUT, layout)
}

fn status_text(text: impl Into<String>) -> ConfigTree {
    ConfigTree::new()
        .with(opt::STATUS_CONTENT, "customtext")
        .with(opt::STATUS_TEXT, text)
}

/// Layout E with the battery moved into a resized status bar.
fn battery_in_status(
    fx: &Fixture<'_>,
    name: &str,
    doc: &str,
    status: ElementPatch,
    text: &str,
) -> Result<ScenarioBuilder> {
    let layout = LayoutEdit::preset(fx.registry, "e")?
        .patch(
            LayoutPatch::default()
                .battery_loc(BatteryLoc::StatusRight)
                .recency_loc(RecencyLoc::None),
        )
        .element(ElementKind::StatusBar, status)?
        .finish();
    Ok(ScenarioDescriptor::builder(name)
        .doc(doc)
        .config(custom(layout))
        .config(status_text(text))
        .sgvs(default_entries(&fx.anchor, Direction::FortyFiveDown, DEFAULT_COUNT)))
}

/// Layout E with a black time area of the given height.
fn dynamic_time_font(fx: &Fixture<'_>, height: u16) -> Result<ScenarioBuilder> {
    let layout = LayoutEdit::preset(fx.registry, "e")?
        .element(
            ElementKind::TimeArea,
            ElementPatch::default().black(true).height(height),
        )?
        .finish();
    Ok(ScenarioDescriptor::builder(format!("TestDynamicTimeFont{height}"))
        .doc(format!("Test that the time font shrinks to fit a {height}% time area."))
        .config(custom(layout))
        .config(status_text(format!("time height: {height}%")))
        .sgvs(default_entries(&fx.anchor, Direction::Flat, DEFAULT_COUNT)))
}

fn nice_layout(fx: &Fixture<'_>) -> Result<LayoutPreset> {
    let spec = |kind, enabled, height, black, bottom| -> Result<ElementSpec> {
        Ok(ElementSpec {
            el: fx.registry.ordinal(kind)?,
            enabled,
            width: 100,
            height,
            black,
            bottom,
            right: false,
        })
    };
    Ok(LayoutPreset {
        elements: vec![
            spec(ElementKind::TimeArea, true, 23, false, true)?,
            spec(ElementKind::Graph, true, 0, false, true)?,
            spec(ElementKind::Sidebar, false, 0, false, false)?,
            spec(ElementKind::StatusBar, true, 16, true, false)?,
            spec(ElementKind::BgRow, true, 23, false, false)?,
        ],
        battery_loc: BatteryLoc::TimeTopRight,
        time_align: TimeAlign::Left,
        conn_status_loc: ConnStatusLoc::GraphBottomLeft,
        recency_loc: RecencyLoc::StatusTopRight,
        recency_style: RecencyStyle::MediumPie,
        recency_color_circle: Color::hex(0xAA55FF),
        recency_color_text: Color::WHITE,
    })
}

pub(super) fn scenarios(fx: &Fixture<'_>) -> Result<Vec<ScenarioDescriptor>> {
    let anchor = &fx.anchor;
    let recent = || real_life_entries(anchor, 3);

    let black = LayoutEdit::preset(fx.registry, "a")?
        .require(&[
            ElementKind::TimeArea,
            ElementKind::StatusBar,
            ElementKind::Sidebar,
            ElementKind::Graph,
        ])?
        .all_elements(ElementPatch::default().black(true))
        .patch(LayoutPatch::default().recency_color_text(Color::hex(0x00FFFF)))
        .finish();

    let default_custom = fx
        .registry
        .base_config()
        .get(opt::CUSTOM_LAYOUT)
        .ok_or_else(|| ScenarioError::malformed("base config has no customLayout"))?;

    let mut builders = vec![
        ScenarioDescriptor::builder("TestBlackBackground")
            .doc("Test that the time, status bar, sidebar, and graph elements can be set to a black background.")
            .config(
                custom(black)
                    .with(opt::STATUS_CONTENT, "customtext")
                    .with(opt::STATUS_TEXT, "black as coal")
                    .with(opt::BOTTOM_OF_RANGE, 120)
                    .with(opt::TOP_OF_RANGE, 180)
                    .with(opt::POINT_COLOR_DEFAULT, Color::hex(0x5555FF))
                    .with(opt::POINT_COLOR_HIGH, Color::hex(0xFFAAAA))
                    .with(opt::POINT_COLOR_LOW, Color::hex(0xAAFFFF)),
            )
            .sgvs(default_entries(anchor, Direction::Flat, DEFAULT_COUNT)),
        ScenarioDescriptor::builder("TestLayoutA")
            .doc("Test layout A.")
            .config(layout_colors("a"))
            .config(status_text("3.1 U 16 g"))
            .sgvs(recent()),
        ScenarioDescriptor::builder("TestLayoutB")
            .doc("Test layout B.")
            .config(layout_colors("b"))
            .config(
                status_text("Cln 179 186 187")
                    .with(opt::POINT_SHAPE, "rectangle")
                    .with(opt::POINT_COLOR_LOW, Color::hex(0xFF00AA))
                    .with(opt::POINT_COLOR_HIGH, Color::hex(0x0000AA))
                    .with(opt::POINT_COLOR_DEFAULT, Color::hex(0x00AAAA)),
            )
            .sgvs(recent()),
        ScenarioDescriptor::builder("TestLayoutC")
            .doc("Test layout C.")
            .config(layout_colors("c"))
            .config(status_text("Sat Nov 5").with(opt::BATTERY_AS_NUMBER, true))
            .sgvs(recent()),
        ScenarioDescriptor::builder("TestLayoutD")
            .doc("Test layout D.")
            .config(
                layout_colors("d")
                    .with(opt::POINT_SHAPE, "circle")
                    .with(opt::POINT_WIDTH, 5)
                    .with(opt::POINT_RIGHT_MARGIN, 2),
            )
            .sgvs(recent()),
        ScenarioDescriptor::builder("TestLayoutE")
            .doc("Test layout E.")
            .config(
                layout_colors("e")
                    .with(opt::POINT_WIDTH, 2)
                    .with(opt::POINT_MARGIN, -1),
            )
            .config(status_text(
                "Extra long text. This example uses point width 2 and margin -1 to view 9 hrs.",
            ))
            .sgvs(recent()),
        ScenarioDescriptor::builder("TestLayoutCustom")
            .doc("Test the default custom layout.")
            .config(layout_colors("custom").with(opt::CUSTOM_LAYOUT, default_custom))
            .config(status_text(
                "You are marvelous. The gods wait to delight in you.",
            ))
            .sgvs(real_life_entries(anchor, 0)),
        battery_in_status(
            fx,
            "TestBatteryLocInStatusAlignedWithLastLineOfText",
            "Test that the battery is aligned to the bottom line of text in the status bar.",
            ElementPatch::default().height(28),
            "Battery is level with last completely visible line of text",
        )?,
        battery_in_status(
            fx,
            "TestBatteryLocInStatusMinimumPadding",
            "Test that the battery has a minimum bottom padding.",
            ElementPatch::default().height(21).bottom(true),
            "Should not be flush against the bottom",
        )?,
        ScenarioDescriptor::builder("TestBatteryAsNumber")
            .doc("Test the battery level drawn as a number.")
            .config(
                status_text("battery ------>")
                    .with(opt::LAYOUT, "a")
                    .with(opt::BATTERY_AS_NUMBER, true),
            )
            .sgvs(default_entries(anchor, Direction::FortyFiveUp, DEFAULT_COUNT)),
    ];
    for height in TIME_FONT_HEIGHTS {
        builders.push(dynamic_time_font(fx, height)?);
    }
    builders.push(
        ScenarioDescriptor::builder("TestNiceLayout")
            .doc("Test a hand-built layout with every element but the sidebar.")
            .config(
                custom(nice_layout(fx)?)
                    .with(opt::TOP_OF_GRAPH, 251)
                    .with(opt::TOP_OF_RANGE, 160)
                    .with(opt::BOTTOM_OF_RANGE, 80)
                    .with(opt::BOTTOM_OF_GRAPH, 51)
                    .with(opt::POINT_COLOR_LOW, Color::hex(0xFF0000))
                    .with(opt::POINT_COLOR_HIGH, Color::hex(0xFFAA00))
                    .with(opt::POINT_COLOR_DEFAULT, Color::hex(0x0000FF)),
            )
            .config(status_text("3.1 U 16 g"))
            .sgvs(recent()),
    );

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

    fn fixture() -> Fixture<'static> {
        Fixture {
            anchor: TimeAnchor::at(DateTime::parse_from_rfc3339("2026-10-19T07:45:00-07:00").unwrap()),
            registry: LayoutRegistry::builtin().unwrap(),
        }
    }

    fn named(name: &str) -> ScenarioDescriptor {
        scenarios(&fixture())
            .unwrap()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap()
    }

    #[test]
    fn black_background_blackens_every_element() {
        let s = named("TestBlackBackground");
        let layout = s.config.get(opt::CUSTOM_LAYOUT).unwrap();
        assert!(layout.elements.iter().all(|el| el.black));
        assert_eq!(layout.recency_color_text, Color::hex(0x00FFFF));
        assert_eq!(s.config.get(opt::LAYOUT).as_deref(), Some("custom"));
    }

    #[test]
    fn layout_b_overrides_shared_colors() {
        let s = named("TestLayoutB");
        assert_eq!(s.config.get(opt::POINT_COLOR_LOW), Some(Color::hex(0xFF00AA)));
        assert_eq!(s.config.get(opt::TOP_OF_RANGE), Some(160));
    }

    #[test]
    fn battery_in_status_variants() {
        let fx = fixture();
        let s = named("TestBatteryLocInStatusMinimumPadding");
        let layout = s.config.get(opt::CUSTOM_LAYOUT).unwrap();
        assert_eq!(layout.battery_loc, BatteryLoc::StatusRight);
        assert_eq!(layout.recency_loc, RecencyLoc::None);
        let status = fx.registry.find_element(&layout, ElementKind::StatusBar).unwrap();
        assert_eq!((status.height, status.bottom), (21, true));
        // Preset E itself is untouched.
        assert_ne!(fx.registry.layout("e").unwrap().battery_loc, BatteryLoc::StatusRight);
    }

    #[test]
    fn time_font_family() {
        let fx = fixture();
        for height in TIME_FONT_HEIGHTS {
            let s = named(&format!("TestDynamicTimeFont{height}"));
            let layout = s.config.get(opt::CUSTOM_LAYOUT).unwrap();
            let time = fx.registry.find_element(&layout, ElementKind::TimeArea).unwrap();
            assert_eq!(time.height, height);
            assert!(time.black);
            assert_eq!(
                s.config.get(opt::STATUS_TEXT),
                Some(format!("time height: {height}%"))
            );
        }
    }

    #[test]
    fn nice_layout_has_no_sidebar() {
        let fx = fixture();
        let s = named("TestNiceLayout");
        let layout = s.config.get(opt::CUSTOM_LAYOUT).unwrap();
        assert_eq!(layout.elements.len(), 5);
        assert!(!fx.registry.find_element(&layout, ElementKind::Sidebar).unwrap().enabled);
    }
}
