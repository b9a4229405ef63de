use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Color;

/// Symbolic dashboard region. Layouts refer to elements by ordinal; the
/// constants table's `ELEMENTS` list maps ordinals to these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    #[serde(rename = "GRAPH_ELEMENT")]
    Graph,
    #[serde(rename = "SIDEBAR_ELEMENT")]
    Sidebar,
    #[serde(rename = "STATUS_BAR_ELEMENT")]
    StatusBar,
    #[serde(rename = "TIME_AREA_ELEMENT")]
    TimeArea,
    #[serde(rename = "BG_ROW_ELEMENT")]
    BgRow,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Graph,
        ElementKind::Sidebar,
        ElementKind::StatusBar,
        ElementKind::TimeArea,
        ElementKind::BgRow,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Graph => "GRAPH_ELEMENT",
            Self::Sidebar => "SIDEBAR_ELEMENT",
            Self::StatusBar => "STATUS_BAR_ELEMENT",
            Self::TimeArea => "TIME_AREA_ELEMENT",
            Self::BgRow => "BG_ROW_ELEMENT",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element kind {0:?}")]
pub struct UnknownElementKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownElementKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownElementKind(s.to_string()))
    }
}

/// One region of a layout, stacked vertically in list order.
///
/// `width` is a percentage of the screen; `height` is in pixels, with 0
/// meaning "take the remaining space".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Ordinal into the `ELEMENTS` table.
    pub el: u8,
    pub enabled: bool,
    pub width: u16,
    pub height: u16,
    pub black: bool,
    pub bottom: bool,
    pub right: bool,
}

/// Shallow update for an [`ElementSpec`]; every `Some` field overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPatch {
    pub enabled: Option<bool>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub black: Option<bool>,
    pub bottom: Option<bool>,
    pub right: Option<bool>,
}

impl ElementPatch {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    pub fn black(mut self, black: bool) -> Self {
        self.black = Some(black);
        self
    }

    pub fn bottom(mut self, bottom: bool) -> Self {
        self.bottom = Some(bottom);
        self
    }

    pub fn right(mut self, right: bool) -> Self {
        self.right = Some(right);
        self
    }

    pub fn apply(&self, el: &mut ElementSpec) {
        if let Some(v) = self.enabled {
            el.enabled = v;
        }
        if let Some(v) = self.width {
            el.width = v;
        }
        if let Some(v) = self.height {
            el.height = v;
        }
        if let Some(v) = self.black {
            el.black = v;
        }
        if let Some(v) = self.bottom {
            el.bottom = v;
        }
        if let Some(v) = self.right {
            el.right = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatteryLoc {
    None,
    StatusRight,
    TimeTopLeft,
    TimeTopRight,
    TimeBottomLeft,
    TimeBottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnStatusLoc {
    None,
    GraphTopLeft,
    GraphBottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecencyLoc {
    None,
    TimeTopLeft,
    TimeTopRight,
    TimeBottomLeft,
    TimeBottomRight,
    StatusTopRight,
    StatusBottomRight,
    GraphTopLeft,
    GraphBottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecencyStyle {
    SmallRing,
    SmallPie,
    SmallNoCircle,
    MediumRing,
    MediumPie,
    MediumNoCircle,
    LargeRing,
    LargePie,
    LargeNoCircle,
}

/// A complete watchface layout: the element stack plus placement of the
/// battery, connection status and recency indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPreset {
    pub elements: Vec<ElementSpec>,
    pub battery_loc: BatteryLoc,
    pub time_align: TimeAlign,
    pub conn_status_loc: ConnStatusLoc,
    pub recency_loc: RecencyLoc,
    pub recency_style: RecencyStyle,
    pub recency_color_circle: Color,
    pub recency_color_text: Color,
}

impl LayoutPreset {
    /// Apply `patch` to every element.
    pub fn patch_all_elements(&mut self, patch: &ElementPatch) {
        for el in &mut self.elements {
            patch.apply(el);
        }
    }
}

/// Shallow update of a layout's top-level fields. Elements are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutPatch {
    pub battery_loc: Option<BatteryLoc>,
    pub time_align: Option<TimeAlign>,
    pub conn_status_loc: Option<ConnStatusLoc>,
    pub recency_loc: Option<RecencyLoc>,
    pub recency_style: Option<RecencyStyle>,
    pub recency_color_circle: Option<Color>,
    pub recency_color_text: Option<Color>,
}

impl LayoutPatch {
    pub fn battery_loc(mut self, v: BatteryLoc) -> Self {
        self.battery_loc = Some(v);
        self
    }

    pub fn time_align(mut self, v: TimeAlign) -> Self {
        self.time_align = Some(v);
        self
    }

    pub fn conn_status_loc(mut self, v: ConnStatusLoc) -> Self {
        self.conn_status_loc = Some(v);
        self
    }

    pub fn recency_loc(mut self, v: RecencyLoc) -> Self {
        self.recency_loc = Some(v);
        self
    }

    pub fn recency_style(mut self, v: RecencyStyle) -> Self {
        self.recency_style = Some(v);
        self
    }

    pub fn recency_color_circle(mut self, v: Color) -> Self {
        self.recency_color_circle = Some(v);
        self
    }

    pub fn recency_color_text(mut self, v: Color) -> Self {
        self.recency_color_text = Some(v);
        self
    }

    pub fn apply(&self, layout: &mut LayoutPreset) {
        if let Some(v) = self.battery_loc {
            layout.battery_loc = v;
        }
        if let Some(v) = self.time_align {
            layout.time_align = v;
        }
        if let Some(v) = self.conn_status_loc {
            layout.conn_status_loc = v;
        }
        if let Some(v) = self.recency_loc {
            layout.recency_loc = v;
        }
        if let Some(v) = self.recency_style {
            layout.recency_style = v;
        }
        if let Some(v) = self.recency_color_circle {
            layout.recency_color_circle = v;
        }
        if let Some(v) = self.recency_color_text {
            layout.recency_color_text = v;
        }
    }
}
