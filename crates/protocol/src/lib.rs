pub mod config;
pub mod entries;
pub mod layout;
pub mod treatments;
pub mod types;

pub use config::{
    CUSTOM_LAYOUT_NAME, ConfigKey, ConfigTree, ConfigValue, InvalidOption, Key, OptionValue,
    ValueKind, opt,
};
pub use entries::{Direction, ERROR_CODE_MAX, EntryKind, SgvEntry, UnknownDirection};
pub use layout::{
    BatteryLoc, ConnStatusLoc, ElementKind, ElementPatch, ElementSpec, LayoutPatch, LayoutPreset,
    RecencyLoc, RecencyStyle, TimeAlign, UnknownElementKind,
};
pub use treatments::{
    BasalProfile, BasalRate, DeviceStatus, LoopPrediction, LoopStatus, OpenApsStatus,
    OpenApsSuggestion, PredictionCurves, Treatment,
};
pub use types::{Color, ParseColorError, Slot};
