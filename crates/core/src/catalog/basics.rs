//! Graph bounds, units, and how odd readings render.

use watchface_protocol::{ConfigTree, Direction, opt};

use super::Fixture;
use crate::error::Result;
use crate::scenario::ScenarioDescriptor;
use crate::synth::{DEFAULT_COUNT, default_entries};

pub(super) fn scenarios(fx: &Fixture<'_>) -> Result<Vec<ScenarioDescriptor>> {
    let anchor = &fx.anchor;
    let entries = |direction| default_entries(anchor, direction, DEFAULT_COUNT);

    let top = fx.base_int(opt::TOP_OF_RANGE)?;
    let grid = fx.base_int(opt::H_GRIDLINES)?;
    let bottom = fx.base_int(opt::BOTTOM_OF_RANGE)?;
    let mut at_bounds = entries(Direction::Flat);
    for (i, e) in at_bounds.iter_mut().enumerate() {
        e.sgv = Some(match i {
            0..9 => top,
            9..18 => top - grid,
            18..27 => top - 2 * grid,
            _ => bottom,
        });
    }

    let mut error_codes = entries(Direction::SingleDown);
    for i in (0..19).step_by(3) {
        error_codes[i].sgv = Some(10);
        error_codes[i + 1].sgv = Some(10);
    }
    error_codes[0].clear_trend();

    let mut positive_delta = entries(Direction::SingleUp);
    positive_delta[1].sgv = positive_delta[0].sgv.map(|v| v - 10);

    let mut trimmed = entries(Direction::DoubleDown);
    for (i, e) in trimmed.iter_mut().enumerate() {
        let i = i as i64;
        e.sgv = Some(match i {
            0..12 => 20 + 4 * i,
            12..24 => 64 + 15 * (i - 12),
            _ => 229 + 9 * (i - 24),
        });
    }

    let mut degenerate = entries(Direction::DoubleDown);
    for e in &mut degenerate[6..12] {
        e.sgv = None;
    }
    degenerate[0].null_trend();

    [
        ScenarioDescriptor::builder("TestBasicIntegration")
            .doc("Test that the graph, delta, trend, etc. all work.")
            .sgvs(entries(Direction::FortyFiveDown)),
        ScenarioDescriptor::builder("TestMmol")
            .doc("Test mmol.")
            .config(ConfigTree::new().with(opt::MMOL, true))
            .sgvs(entries(Direction::Flat)),
        ScenarioDescriptor::builder("TestGraphBoundsAndGridlines")
            .doc("Test adjusting the graph bounds and gridlines.")
            .config(
                ConfigTree::new()
                    .with(opt::TOP_OF_GRAPH, 400)
                    .with(opt::TOP_OF_RANGE, 280)
                    .with(opt::BOTTOM_OF_RANGE, 120)
                    .with(opt::BOTTOM_OF_GRAPH, 20)
                    .with(opt::H_GRIDLINES, 20),
            )
            .sgvs(entries(Direction::DoubleUp)),
        ScenarioDescriptor::builder("TestSGVsAtBoundsAndGridlines")
            .doc("Test that target range bounds and gridlines line up with SGV points at the same values.")
            .sgvs(at_bounds),
        ScenarioDescriptor::builder("TestStaleServerData")
            .doc("Test that stale server data shows an icon and hides trend and delta in the sidebar.")
            // The stale icon is off by a pixel on some runs.
            .disabled()
            .sgvs(entries(Direction::SingleDown).split_off(7)),
        ScenarioDescriptor::builder("TestNotRecentButNotYetStaleBGRow")
            .doc("Test that trend and delta are not shown in the BG row when data is not recent.")
            .config(ConfigTree::new().with(opt::LAYOUT, "c"))
            .sgvs(entries(Direction::SingleDown).split_off(2)),
        ScenarioDescriptor::builder("TestErrorCodes")
            .doc("Test that error codes appear as ??? and are not graphed.")
            .sgvs(error_codes),
        ScenarioDescriptor::builder("TestPositiveDelta")
            .doc("Test that positive deltas have \"+\" prepended and are not treated as error codes.")
            .sgvs(positive_delta),
        ScenarioDescriptor::builder("TestTrimmingValues")
            .doc("Test that values outside the graph bounds are trimmed.")
            .config(
                ConfigTree::new()
                    .with(opt::TOP_OF_GRAPH, 250)
                    .with(opt::TOP_OF_RANGE, 200)
                    .with(opt::BOTTOM_OF_RANGE, 80)
                    .with(opt::BOTTOM_OF_GRAPH, 40)
                    .with(opt::H_GRIDLINES, 50),
            )
            .sgvs(trimmed),
        ScenarioDescriptor::builder("TestDegenerateEntries")
            .doc("Test that raw-only entries and null trends don't crash the watchface.")
            .sgvs(degenerate),
        ScenarioDescriptor::builder("TestStatusTextTooLong")
            .doc("Test that the watchface doesn't crash when the status text is too long.")
            .config(
                ConfigTree::new()
                    .with(opt::STATUS_CONTENT, "customtext")
                    .with(opt::STATUS_TEXT, "^_^ ".repeat(100)),
            )
            .sgvs(entries(Direction::Flat)),
    ]
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
    use watchface_protocol::Slot;

    fn built() -> Vec<ScenarioDescriptor> {
        let fx = Fixture {
            anchor: TimeAnchor::at(DateTime::parse_from_rfc3339("2026-10-19T12:00:00+00:00").unwrap()),
            registry: LayoutRegistry::builtin().unwrap(),
        };
        scenarios(&fx).unwrap()
    }

    fn named<'a>(all: &'a [ScenarioDescriptor], name: &str) -> &'a ScenarioDescriptor {
        all.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn error_codes_pair_up() {
        let all = built();
        let s = named(&all, "TestErrorCodes");
        let codes: Vec<_> = s.sgvs.iter().map(|e| e.is_error_code()).collect();
        assert_eq!(codes.iter().filter(|c| **c).count(), 14);
        assert!(codes[0] && codes[1] && !codes[2] && codes[18] && codes[19] && !codes[20]);
        assert!(s.sgvs[0].direction.is_missing());
        assert!(matches!(s.sgvs[1].direction, Slot::Present(_)));
    }

    #[test]
    fn bounds_track_base_config() {
        let all = built();
        let s = named(&all, "TestSGVsAtBoundsAndGridlines");
        assert_eq!(s.sgvs[0].sgv, Some(200));
        assert_eq!(s.sgvs[9].sgv, Some(150));
        assert_eq!(s.sgvs[18].sgv, Some(100));
        assert_eq!(s.sgvs[27].sgv, Some(70));
    }

    #[test]
    fn stale_data_is_disabled_and_shifted() {
        let all = built();
        let s = named(&all, "TestStaleServerData");
        assert!(!s.enabled);
        assert_eq!(s.sgvs.len(), DEFAULT_COUNT - 7);
        assert_eq!(
            all[0].sgvs[0].date - s.sgvs[0].date,
            7 * 300_000
        );
    }

    #[test]
    fn degenerate_entries() {
        let all = built();
        let s = named(&all, "TestDegenerateEntries");
        assert_eq!(s.sgvs[0].trend, Slot::Null);
        assert!(s.sgvs[6..12].iter().all(|e| e.sgv.is_none()));
        assert!(s.sgvs[12].sgv.is_some());
    }

    #[test]
    fn trimming_ramps() {
        let all = built();
        let s = named(&all, "TestTrimmingValues");
        assert_eq!(s.sgvs[0].sgv, Some(20));
        assert_eq!(s.sgvs[12].sgv, Some(64));
        assert_eq!(s.sgvs[24].sgv, Some(229));
        assert_eq!(s.config.get(opt::BOTTOM_OF_RANGE), Some(80));
    }
}
