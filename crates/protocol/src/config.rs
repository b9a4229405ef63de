use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::layout::LayoutPreset;
use crate::types::Color;

/// `layout` value that selects the `customLayout` option instead of a preset.
pub const CUSTOM_LAYOUT_NAME: &str = "custom";

/// The shape a recognized option's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Text,
    Color,
    Layout,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "a boolean",
            Self::Int => "an integer",
            Self::Text => "a string",
            Self::Color => "a 0xRRGGBB color",
            Self::Layout => "a layout object",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("option `{key}` expects {expected}")]
pub struct InvalidOption {
    pub key: String,
    pub expected: ValueKind,
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Color(Color),
    Layout(Box<LayoutPreset>),
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Text(_) => ValueKind::Text,
            Self::Color(_) => ValueKind::Color,
            Self::Layout(_) => ValueKind::Layout,
        }
    }

    /// Interpret a JSON value as `kind`. Returns `None` on a shape mismatch.
    pub fn from_json(kind: ValueKind, value: Value) -> Option<Self> {
        match (kind, value) {
            (ValueKind::Bool, Value::Bool(b)) => Some(Self::Bool(b)),
            (ValueKind::Int, Value::Number(n)) => n.as_i64().map(Self::Int),
            (ValueKind::Text, Value::String(s)) => Some(Self::Text(s)),
            (ValueKind::Color, Value::String(s)) => s.parse().ok().map(Self::Color),
            (ValueKind::Layout, v @ Value::Object(_)) => serde_json::from_value(v)
                .ok()
                .map(|l| Self::Layout(Box::new(l))),
            _ => None,
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Text(v) => serializer.serialize_str(v),
            Self::Color(v) => v.serialize(serializer),
            Self::Layout(v) => v.serialize(serializer),
        }
    }
}

/// Rust types that can be stored under a recognized option.
pub trait OptionValue: Sized {
    const KIND: ValueKind;

    fn into_value(self) -> ConfigValue;

    fn from_value(value: &ConfigValue) -> Option<Self>;
}

impl OptionValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> ConfigValue {
        ConfigValue::Bool(self)
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl OptionValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn into_value(self) -> ConfigValue {
        ConfigValue::Int(self)
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl OptionValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> ConfigValue {
        ConfigValue::Text(self)
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl OptionValue for Color {
    const KIND: ValueKind = ValueKind::Color;

    fn into_value(self) -> ConfigValue {
        ConfigValue::Color(self)
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Color(v) => Some(*v),
            _ => None,
        }
    }
}

impl OptionValue for LayoutPreset {
    const KIND: ValueKind = ValueKind::Layout;

    fn into_value(self) -> ConfigValue {
        ConfigValue::Layout(Box::new(self))
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Layout(v) => Some(v.as_ref().clone()),
            _ => None,
        }
    }
}

/// A recognized option carrying its value type, so that
/// `tree.with(opt::TOP_OF_RANGE, "high")` does not compile.
pub struct Key<T> {
    key: ConfigKey,
    _value: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    const fn new(key: ConfigKey) -> Self {
        Self {
            key,
            _value: PhantomData,
        }
    }

    pub const fn key(&self) -> ConfigKey {
        self.key
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.key.name())
    }
}

macro_rules! config_keys {
    ($( $(#[$doc:meta])* $variant:ident / $konst:ident : $ty:ty = $name:literal; )*) => {
        /// The recognized option vocabulary. Anything else is passthrough.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ConfigKey {
            $( $(#[$doc])* $variant, )*
        }

        impl ConfigKey {
            pub const ALL: &'static [ConfigKey] = &[$(ConfigKey::$variant,)*];

            /// Wire name, as the watchface's config page spells it.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            pub const fn kind(self) -> ValueKind {
                match self {
                    $( Self::$variant => <$ty as OptionValue>::KIND, )*
                }
            }
        }

        /// Typed handles for every [`ConfigKey`].
        pub mod opt {
            use super::{ConfigKey, Key};
            use crate::layout::LayoutPreset;
            use crate::types::Color;

            $( pub const $konst: Key<$ty> = Key::new(ConfigKey::$variant); )*
        }
    };
}

config_keys! {
    /// Display values in mmol/L instead of mg/dL.
    Mmol / MMOL: bool = "mmol";
    TopOfGraph / TOP_OF_GRAPH: i64 = "topOfGraph";
    TopOfRange / TOP_OF_RANGE: i64 = "topOfRange";
    BottomOfRange / BOTTOM_OF_RANGE: i64 = "bottomOfRange";
    BottomOfGraph / BOTTOM_OF_GRAPH: i64 = "bottomOfGraph";
    /// Spacing of horizontal gridlines in mg/dL; 0 disables them.
    HGridlines / H_GRIDLINES: i64 = "hGridlines";
    /// `rectangle` or `circle`.
    PointShape / POINT_SHAPE: String = "pointShape";
    PointWidth / POINT_WIDTH: i64 = "pointWidth";
    PointRectHeight / POINT_RECT_HEIGHT: i64 = "pointRectHeight";
    /// May be negative to overlap points.
    PointMargin / POINT_MARGIN: i64 = "pointMargin";
    PointRightMargin / POINT_RIGHT_MARGIN: i64 = "pointRightMargin";
    PointColorDefault / POINT_COLOR_DEFAULT: Color = "pointColorDefault";
    PointColorHigh / POINT_COLOR_HIGH: Color = "pointColorHigh";
    PointColorLow / POINT_COLOR_LOW: Color = "pointColorLow";
    PlotLine / PLOT_LINE: bool = "plotLine";
    PlotLineWidth / PLOT_LINE_WIDTH: i64 = "plotLineWidth";
    PlotLineIsCustomColor / PLOT_LINE_IS_CUSTOM_COLOR: bool = "plotLineIsCustomColor";
    PlotLineColor / PLOT_LINE_COLOR: Color = "plotLineColor";
    /// What the status bar shows, e.g. `customtext` or `rigbattery`.
    StatusContent / STATUS_CONTENT: String = "statusContent";
    StatusText / STATUS_TEXT: String = "statusText";
    StatusMinRecencyToShowMinutes / STATUS_MIN_RECENCY_TO_SHOW_MINUTES: i64 = "statusMinRecencyToShowMinutes";
    StatusMaxAgeMinutes / STATUS_MAX_AGE_MINUTES: i64 = "statusMaxAgeMinutes";
    /// e.g. `superscript`, `colonLeft`, `bracketRight`.
    StatusRecencyFormat / STATUS_RECENCY_FORMAT: String = "statusRecencyFormat";
    BatteryAsNumber / BATTERY_AS_NUMBER: bool = "batteryAsNumber";
    BasalGraph / BASAL_GRAPH: bool = "basalGraph";
    BasalHeight / BASAL_HEIGHT: i64 = "basalHeight";
    BolusTicks / BOLUS_TICKS: bool = "bolusTicks";
    PredictEnabled / PREDICT_ENABLED: bool = "predictEnabled";
    /// `loop` or `openaps`.
    PredictSource / PREDICT_SOURCE: String = "predictSource";
    PredictMaxLength / PREDICT_MAX_LENGTH: i64 = "predictMaxLength";
    PredictColorDefault / PREDICT_COLOR_DEFAULT: Color = "predictColorDefault";
    PredictColorHigh / PREDICT_COLOR_HIGH: Color = "predictColorHigh";
    PredictColorLow / PREDICT_COLOR_LOW: Color = "predictColorLow";
    /// Preset name (`a`..`e`) or `custom`.
    Layout / LAYOUT: String = "layout";
    CustomLayout / CUSTOM_LAYOUT: LayoutPreset = "customLayout";
}

impl ConfigKey {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A flat watchface configuration: recognized options with typed values,
/// plus unrecognized keys carried verbatim for forward compatibility.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    options: BTreeMap<ConfigKey, ConfigValue>,
    passthrough: BTreeMap<String, Value>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: OptionValue>(mut self, key: Key<T>, value: impl Into<T>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set<T: OptionValue>(&mut self, key: Key<T>, value: impl Into<T>) -> &mut Self {
        self.options.insert(key.key, value.into().into_value());
        self
    }

    /// Select a custom layout: sets `layout = "custom"` and `customLayout`.
    pub fn with_custom_layout(self, layout: LayoutPreset) -> Self {
        self.with(opt::LAYOUT, CUSTOM_LAYOUT_NAME)
            .with(opt::CUSTOM_LAYOUT, layout)
    }

    pub fn get<T: OptionValue>(&self, key: Key<T>) -> Option<T> {
        self.options.get(&key.key).and_then(T::from_value)
    }

    /// Set an option by wire name. Recognized names are checked against
    /// their kind; anything else lands in the passthrough map.
    pub fn set_json(&mut self, name: &str, value: Value) -> Result<(), InvalidOption> {
        match ConfigKey::from_name(name) {
            Some(key) => {
                let parsed =
                    ConfigValue::from_json(key.kind(), value).ok_or_else(|| InvalidOption {
                        key: name.to_string(),
                        expected: key.kind(),
                    })?;
                self.options.insert(key, parsed);
            }
            None => {
                self.passthrough.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    pub fn with_json(mut self, name: &str, value: Value) -> Result<Self, InvalidOption> {
        self.set_json(name, value)?;
        Ok(self)
    }

    pub fn passthrough(&self, name: &str) -> Option<&Value> {
        self.passthrough.get(name)
    }

    pub fn options(&self) -> impl Iterator<Item = (ConfigKey, &ConfigValue)> {
        self.options.iter().map(|(k, v)| (*k, v))
    }

    pub fn passthrough_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.passthrough.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys, recognized and passthrough.
    pub fn len(&self) -> usize {
        self.options.len() + self.passthrough.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.passthrough.is_empty()
    }

    /// Replace, key by key, every value present in `layer`. Values are
    /// swapped wholesale; nested structures are never merged. Returns the
    /// wire names of keys that already had a value.
    pub fn overlay(&mut self, layer: &ConfigTree) -> Vec<String> {
        let mut replaced = Vec::new();
        for (key, value) in &layer.options {
            if self.options.insert(*key, value.clone()).is_some() {
                replaced.push(key.name().to_string());
            }
        }
        for (name, value) in &layer.passthrough {
            if self.passthrough.insert(name.clone(), value.clone()).is_some() {
                replaced.push(name.clone());
            }
        }
        replaced
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in &self.options {
            map.serialize_entry(key.name(), value)?;
        }
        for (name, value) in &self.passthrough {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let mut tree = ConfigTree::new();
        for (name, value) in raw {
            tree.set_json(&name, value)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(tree)
    }
}
