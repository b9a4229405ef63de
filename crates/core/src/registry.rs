//! The constants table: element ordinals, layout presets, point styles and
//! the base configuration every scenario starts from.
//!
//! The built-in table is embedded at compile time and parsed once. It is
//! read-only afterwards; callers that want to change a layout get an owned
//! copy from [`LayoutRegistry::get_layout`] and mutate that.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use watchface_protocol::{
    CUSTOM_LAYOUT_NAME, ConfigTree, ElementKind, ElementSpec, LayoutPreset, opt,
};

use crate::error::{NotFound, Result, ScenarioError};

const BUILTIN_CONSTANTS: &str = include_str!("../data/constants.json");

static BUILTIN: LazyLock<std::result::Result<LayoutRegistry, String>> =
    LazyLock::new(|| LayoutRegistry::from_json(BUILTIN_CONSTANTS).map_err(|e| e.to_string()));

/// The constants table. Serializes back to its on-disk shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Constants {
    /// Position in this list is the ordinal layouts use in `el`.
    pub elements: Vec<ElementKind>,
    pub layouts: BTreeMap<String, LayoutPreset>,
    pub point_styles: BTreeMap<String, ConfigTree>,
    pub base_config: ConfigTree,
}

// Config groups stay raw JSON until each key is checked against its kind.
#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawConstants {
    elements: Vec<ElementKind>,
    layouts: BTreeMap<String, LayoutPreset>,
    point_styles: BTreeMap<String, Map<String, Value>>,
    base_config: Map<String, Value>,
}

impl Constants {
    /// Parse a table. A recognized option holding the wrong kind of value
    /// fails with [`ScenarioError::InvalidOption`].
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawConstants = serde_json::from_str(json)?;
        let point_styles = raw
            .point_styles
            .into_iter()
            .map(|(name, group)| -> Result<(String, ConfigTree)> {
                Ok((name, config_from_json(group)?))
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            elements: raw.elements,
            layouts: raw.layouts,
            point_styles,
            base_config: config_from_json(raw.base_config)?,
        })
    }
}

fn config_from_json(group: Map<String, Value>) -> Result<ConfigTree> {
    let mut tree = ConfigTree::new();
    for (name, value) in group {
        tree.set_json(&name, value)?;
    }
    Ok(tree)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRegistry {
    constants: Constants,
}

impl LayoutRegistry {
    /// Wrap a parsed table. Every preset's element ordinals must resolve.
    pub fn from_constants(constants: Constants) -> Result<Self> {
        let registry = Self { constants };
        for (name, layout) in &registry.constants.layouts {
            for el in &layout.elements {
                registry.element_kind(el.el).map_err(|e| {
                    ScenarioError::malformed(format!("layout {name:?}: {e}"))
                })?;
            }
        }
        tracing::debug!(
            elements = registry.constants.elements.len(),
            layouts = registry.constants.layouts.len(),
            point_styles = registry.constants.point_styles.len(),
            base_keys = registry.constants.base_config.len(),
            "loaded constants table"
        );
        Ok(registry)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_constants(Constants::from_json(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading constants table");
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// The embedded table shared by the whole process.
    pub fn builtin() -> Result<&'static LayoutRegistry> {
        BUILTIN
            .as_ref()
            .map_err(|reason| ScenarioError::BuiltinConstants(reason.clone()))
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn base_config(&self) -> &ConfigTree {
        &self.constants.base_config
    }

    pub fn layout_names(&self) -> impl Iterator<Item = &str> {
        self.constants.layouts.keys().map(String::as_str)
    }

    pub fn layout(&self, name: &str) -> Result<&LayoutPreset> {
        self.constants
            .layouts
            .get(name)
            .ok_or_else(|| NotFound::Layout(name.to_string()).into())
    }

    /// An independent copy of a preset, safe to mutate.
    pub fn get_layout(&self, name: &str) -> Result<LayoutPreset> {
        self.layout(name).cloned()
    }

    pub fn point_style(&self, name: &str) -> Result<ConfigTree> {
        self.constants
            .point_styles
            .get(name)
            .cloned()
            .ok_or_else(|| NotFound::PointStyle(name.to_string()).into())
    }

    pub fn element_kind(&self, ordinal: u8) -> std::result::Result<ElementKind, NotFound> {
        self.constants
            .elements
            .get(usize::from(ordinal))
            .copied()
            .ok_or(NotFound::ElementOrdinal(ordinal))
    }

    pub fn ordinal(&self, kind: ElementKind) -> std::result::Result<u8, NotFound> {
        self.constants
            .elements
            .iter()
            .position(|k| *k == kind)
            .and_then(|i| u8::try_from(i).ok())
            .ok_or(NotFound::Element(kind))
    }

    fn is_kind(&self, el: &ElementSpec, kind: ElementKind) -> bool {
        self.element_kind(el.el).is_ok_and(|k| k == kind)
    }

    /// First element of `kind`, in stacking order.
    pub fn find_element<'a>(
        &self,
        layout: &'a LayoutPreset,
        kind: ElementKind,
    ) -> std::result::Result<&'a ElementSpec, NotFound> {
        layout
            .elements
            .iter()
            .find(|el| self.is_kind(el, kind))
            .ok_or(NotFound::Element(kind))
    }

    pub fn find_element_mut<'a>(
        &self,
        layout: &'a mut LayoutPreset,
        kind: ElementKind,
    ) -> std::result::Result<&'a mut ElementSpec, NotFound> {
        layout
            .elements
            .iter_mut()
            .find(|el| self.is_kind(el, kind))
            .ok_or(NotFound::Element(kind))
    }

    /// Fail on the first of `kinds` the layout lacks.
    pub fn require_elements(
        &self,
        layout: &LayoutPreset,
        kinds: &[ElementKind],
    ) -> std::result::Result<(), NotFound> {
        for &kind in kinds {
            self.find_element(layout, kind)?;
        }
        Ok(())
    }

    /// The layout a configuration actually renders with: `customLayout` when
    /// `layout` is `"custom"`, otherwise the named preset.
    pub fn resolve_layout(&self, config: &ConfigTree) -> Result<LayoutPreset> {
        let name = config
            .get(opt::LAYOUT)
            .ok_or_else(|| ScenarioError::malformed("no layout selected"))?;
        if name == CUSTOM_LAYOUT_NAME {
            return config
                .get(opt::CUSTOM_LAYOUT)
                .ok_or_else(|| ScenarioError::malformed("layout is custom but customLayout is missing"));
        }
        self.get_layout(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchface_protocol::{BatteryLoc, ElementPatch, ValueKind};

    fn registry() -> &'static LayoutRegistry {
        LayoutRegistry::builtin().unwrap()
    }

    #[test]
    fn builtin_table_loads() {
        let r = registry();
        assert_eq!(r.constants().elements, ElementKind::ALL.to_vec());
        assert_eq!(r.layout_names().collect::<Vec<_>>(), ["a", "b", "c", "d", "e"]);
        assert_eq!(r.base_config().get(opt::LAYOUT).as_deref(), Some("a"));
        assert!(r.base_config().passthrough("nightscout_url").is_some());
    }

    #[test]
    fn unknown_names_are_not_found() {
        let r = registry();
        assert!(r.get_layout("z").unwrap_err().is_not_found());
        assert!(r.point_style("z").unwrap_err().is_not_found());
        assert_eq!(r.element_kind(5), Err(NotFound::ElementOrdinal(5)));
    }

    #[test]
    fn get_layout_hands_out_copies() {
        let r = registry();
        let mut copy = r.get_layout("a").unwrap();
        copy.battery_loc = BatteryLoc::None;
        ElementPatch::default()
            .height(99)
            .apply(r.find_element_mut(&mut copy, ElementKind::StatusBar).unwrap());
        let pristine = r.layout("a").unwrap();
        assert_eq!(pristine.battery_loc, BatteryLoc::StatusRight);
        assert_eq!(r.find_element(pristine, ElementKind::StatusBar).unwrap().height, 25);
    }

    #[test]
    fn element_lookup_uses_ordinals() {
        let r = registry();
        let d = r.layout("d").unwrap();
        let bg = r.find_element(d, ElementKind::BgRow).unwrap();
        assert_eq!(bg.el, r.ordinal(ElementKind::BgRow).unwrap());
        assert!(!r.find_element(d, ElementKind::StatusBar).unwrap().enabled);
    }

    #[test]
    fn require_elements_reports_the_missing_kind() {
        let r = registry();
        let mut layout = r.get_layout("a").unwrap();
        layout.elements.retain(|el| el.el != 1);
        assert_eq!(
            r.require_elements(&layout, &[ElementKind::Graph, ElementKind::Sidebar]),
            Err(NotFound::Element(ElementKind::Sidebar))
        );
    }

    #[test]
    fn resolve_preset_and_custom() {
        let r = registry();
        let base = r.base_config().clone();
        assert_eq!(&r.resolve_layout(&base).unwrap(), r.layout("a").unwrap());

        let e = r.get_layout("e").unwrap();
        let custom = base.clone().with_custom_layout(e.clone());
        assert_eq!(r.resolve_layout(&custom).unwrap(), e);

        let mut broken = ConfigTree::new().with(opt::LAYOUT, CUSTOM_LAYOUT_NAME);
        assert!(matches!(
            r.resolve_layout(&broken),
            Err(ScenarioError::Malformed { .. })
        ));
        broken.set(opt::LAYOUT, "q");
        assert!(r.resolve_layout(&broken).unwrap_err().is_not_found());
    }

    #[test]
    fn bad_ordinal_in_a_preset_is_rejected() {
        let mut constants = registry().constants().clone();
        constants.elements.truncate(2);
        assert!(matches!(
            LayoutRegistry::from_constants(constants),
            Err(ScenarioError::Malformed { .. })
        ));
    }

    #[test]
    fn wrong_kind_in_base_config_is_an_invalid_option() {
        let json = r#"{"ELEMENTS": [], "LAYOUTS": {}, "POINT_STYLES": {},
                       "BASE_CONFIG": {"topOfRange": "high", "nightscout_url": ""}}"#;
        assert!(matches!(
            LayoutRegistry::from_json(json),
            Err(ScenarioError::InvalidOption(ref e))
                if e.key == "topOfRange" && e.expected == ValueKind::Int
        ));
    }

    #[test]
    fn wrong_kind_in_point_style_is_an_invalid_option() {
        let json = r#"{"ELEMENTS": [], "LAYOUTS": {}, "BASE_CONFIG": {},
                       "POINT_STYLES": {"a": {"pointRectHeight": 5, "plotLineColor": 7}}}"#;
        assert!(matches!(
            LayoutRegistry::from_json(json),
            Err(ScenarioError::InvalidOption(ref e)) if e.key == "plotLineColor"
        ));
    }

    #[test]
    fn broken_json_is_a_constants_error() {
        assert!(matches!(
            LayoutRegistry::from_json(r#"{"ELEMENTS": ["#),
            Err(ScenarioError::Constants(_))
        ));
    }

    #[test]
    fn constants_serialize_back_to_the_table_shape() {
        let r = registry();
        let json = serde_json::to_string(r.constants()).unwrap();
        assert_eq!(LayoutRegistry::from_json(&json).unwrap(), *r);
    }
}
