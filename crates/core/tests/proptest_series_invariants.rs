//! Property-based tests for the time anchor, the series generators and
//! config layering.
//!
//! 1. ISO-8601 and epoch-millisecond encodings name the same instant
//! 2. Default dates step back exactly five minutes, newest first
//! 3. Zipping truncates to the shorter input
//! 4. Later config layers win key by key; untouched keys survive
//! 5. Layering is associative
//! 6. Editing a layout copy never changes the registry
//! 7. A single-key layer changes that key and nothing else in the base

use chrono::{DateTime, FixedOffset, TimeZone};
use proptest::prelude::*;
use watchface_core::synth::{default_dates, default_dates_as_iso, zip_entries};
use watchface_core::{DEFAULT_STEP_SECONDS, LayoutRegistry, TimeAnchor, compose, mutate_element};
use watchface_protocol::{ConfigTree, Direction, ElementKind, ElementPatch, Key, opt};

// ── Strategies ──────────────────────────────────────────────────────────

const INT_KEYS: [Key<i64>; 6] = [
    opt::TOP_OF_GRAPH,
    opt::TOP_OF_RANGE,
    opt::BOTTOM_OF_RANGE,
    opt::BOTTOM_OF_GRAPH,
    opt::H_GRIDLINES,
    opt::POINT_WIDTH,
];

fn instant_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    // 2001..2100, any quarter-hour UTC offset from -12:00 to +14:00.
    (1_000_000_000i64..4_100_000_000, -48i32..=56, 0u32..1_000_000_000).prop_map(
        |(secs, quarters, nanos)| {
            let tz = FixedOffset::east_opt(quarters * 900).unwrap();
            tz.timestamp_opt(secs, nanos).unwrap()
        },
    )
}

fn layer_strategy() -> impl Strategy<Value = ConfigTree> {
    prop::collection::vec((0..INT_KEYS.len(), -500i64..500), 0..8).prop_map(|pairs| {
        let mut tree = ConfigTree::new();
        for (k, v) in pairs {
            tree.set(INT_KEYS[k], v);
        }
        tree
    })
}

fn kind_strategy() -> impl Strategy<Value = ElementKind> {
    prop::sample::select(ElementKind::ALL.to_vec())
}

// ═══════════════════════════════════════════════════════════════════════
// 1–3. Time anchor and generators
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn iso_and_millis_agree(
        now in instant_strategy(),
        offset in -86_400i64..86_400,
        index in 0usize..300,
    ) {
        let anchor = TimeAnchor::new(now, offset);
        let iso = anchor.iso(index, DEFAULT_STEP_SECONDS);
        let parsed = DateTime::parse_from_rfc3339(&iso).unwrap();
        prop_assert_eq!(parsed.timestamp_millis(), anchor.epoch_millis(index, DEFAULT_STEP_SECONDS));
        prop_assert_eq!(parsed.offset(), now.offset());
        prop_assert_eq!(parsed.timestamp_millis() % 1000, 0);
    }

    #[test]
    fn default_dates_step_back(
        now in instant_strategy(),
        count in 0usize..120,
        offset in -3_600i64..3_600,
    ) {
        let anchor = TimeAnchor::at(now);
        let millis = default_dates(&anchor, count, offset);
        prop_assert_eq!(millis.len(), count);
        for pair in millis.windows(2) {
            prop_assert_eq!(pair[0] - pair[1], DEFAULT_STEP_SECONDS * 1000);
        }
        let iso = default_dates_as_iso(&anchor, count, offset);
        for (m, s) in millis.iter().zip(&iso) {
            prop_assert_eq!(DateTime::parse_from_rfc3339(s).unwrap().timestamp_millis(), *m);
        }
    }

    #[test]
    fn zip_takes_the_shorter_side(
        values in prop::collection::vec(0i64..400, 0..60),
        dates in prop::collection::vec(any::<i64>(), 0..60),
        direction in prop::sample::select(Direction::ALL.to_vec()),
    ) {
        let entries = zip_entries(&values, &dates, Some(direction));
        prop_assert_eq!(entries.len(), values.len().min(dates.len()));
        for (i, e) in entries.iter().enumerate() {
            prop_assert_eq!(e.sgv, Some(values[i]));
            prop_assert_eq!(e.date, dates[i]);
            prop_assert!(e.has_consistent_trend());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4–5. Config layering
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn later_layers_win(first in layer_strategy(), second in layer_strategy()) {
        let base = LayoutRegistry::builtin().unwrap().base_config();
        let merged = compose(base, [&first, &second]);
        for key in INT_KEYS {
            let expected = second.get(key).or(first.get(key)).or(base.get(key));
            prop_assert_eq!(merged.get(key), expected);
        }
        prop_assert_eq!(merged.get(opt::LAYOUT), base.get(opt::LAYOUT));
        prop_assert_eq!(merged.passthrough("nightscout_url"), base.passthrough("nightscout_url"));
    }

    #[test]
    fn layering_is_associative(
        a in layer_strategy(),
        b in layer_strategy(),
        c in layer_strategy(),
    ) {
        let base = LayoutRegistry::builtin().unwrap().base_config();
        let stepwise = compose(&compose(&compose(base, [&a]), [&b]), [&c]);
        let at_once = compose(base, [&a, &b, &c]);
        prop_assert_eq!(stepwise, at_once);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Registry stays pristine
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edits_never_reach_the_registry(
        name in prop::sample::select(vec!["a", "b", "c", "d", "e"]),
        kind in kind_strategy(),
        height in 0u16..200,
        black in any::<bool>(),
    ) {
        let registry = LayoutRegistry::builtin().unwrap();
        let before = registry.layout(name).unwrap().clone();
        let mut copy = registry.get_layout(name).unwrap();
        let patch = ElementPatch::default().height(height).black(black);
        if mutate_element(registry, &mut copy, kind, &patch).is_ok() {
            let el = registry.find_element(&copy, kind).unwrap();
            prop_assert_eq!(el.height, height);
            prop_assert_eq!(el.black, black);
        }
        prop_assert_eq!(registry.layout(name).unwrap(), &before);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 7. Single-key override
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_override_touches_one_key(k in 0..INT_KEYS.len(), value in -500i64..500) {
        let base = LayoutRegistry::builtin().unwrap().base_config();
        let key = INT_KEYS[k];
        let merged = compose(base, [&ConfigTree::new().with(key, value)]);

        prop_assert_eq!(merged.get(key), Some(value));
        prop_assert_eq!(merged.len(), base.len() + usize::from(base.get(key).is_none()));
        let untouched = |tree: &ConfigTree| {
            tree.options()
                .filter(|(other, _)| *other != key.key())
                .map(|(other, v)| (other, v.clone()))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(untouched(&merged), untouched(base));
        prop_assert_eq!(merged.get(opt::CUSTOM_LAYOUT), base.get(opt::CUSTOM_LAYOUT));
        prop_assert_eq!(
            merged.passthrough_entries().collect::<Vec<_>>(),
            base.passthrough_entries().collect::<Vec<_>>()
        );
    }
}
