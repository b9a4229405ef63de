//! Layering configuration fragments and editing layout copies.

use watchface_protocol::{ConfigTree, ElementKind, ElementPatch, LayoutPatch, LayoutPreset};

use crate::error::{NotFound, Result};
use crate::registry::LayoutRegistry;

/// Apply `layers` over `base`, left to right. Any key a layer sets replaces
/// the accumulated value wholesale; a `customLayout` in a later layer
/// discards the earlier one entirely.
pub fn compose<'a>(base: &ConfigTree, layers: impl IntoIterator<Item = &'a ConfigTree>) -> ConfigTree {
    let mut merged = base.clone();
    for (depth, layer) in layers.into_iter().enumerate() {
        let replaced = merged.overlay(layer);
        if !replaced.is_empty() {
            tracing::debug!(layer = depth, keys = ?replaced, "config layer overrides base values");
        }
    }
    merged
}

/// Shallow-merge `patch` into the first element of `kind`.
pub fn mutate_element(
    registry: &LayoutRegistry,
    layout: &mut LayoutPreset,
    kind: ElementKind,
    patch: &ElementPatch,
) -> std::result::Result<(), NotFound> {
    let el = registry.find_element_mut(layout, kind)?;
    patch.apply(el);
    Ok(())
}

/// Keep only the first element of each of `kinds`, in that order.
pub fn select_elements(
    registry: &LayoutRegistry,
    layout: &mut LayoutPreset,
    kinds: &[ElementKind],
) -> std::result::Result<(), NotFound> {
    let selected = kinds
        .iter()
        .map(|&kind| registry.find_element(layout, kind).cloned())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    layout.elements = selected;
    Ok(())
}

/// An owned copy of a preset being edited into a custom layout.
///
/// ```ignore
/// let layout = LayoutEdit::preset(registry, "d")?
///     .element(ElementKind::TimeArea, ElementPatch::default().height(30))?
///     .patch(LayoutPatch::default().recency_loc(RecencyLoc::TimeBottomRight))
///     .finish();
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEdit<'r> {
    registry: &'r LayoutRegistry,
    layout: LayoutPreset,
}

impl<'r> LayoutEdit<'r> {
    pub fn preset(registry: &'r LayoutRegistry, name: &str) -> Result<Self> {
        Ok(Self {
            registry,
            layout: registry.get_layout(name)?,
        })
    }

    pub fn require(self, kinds: &[ElementKind]) -> Result<Self> {
        self.registry.require_elements(&self.layout, kinds)?;
        Ok(self)
    }

    pub fn element(mut self, kind: ElementKind, patch: ElementPatch) -> Result<Self> {
        mutate_element(self.registry, &mut self.layout, kind, &patch)?;
        Ok(self)
    }

    pub fn all_elements(mut self, patch: ElementPatch) -> Self {
        self.layout.patch_all_elements(&patch);
        self
    }

    pub fn patch(mut self, patch: LayoutPatch) -> Self {
        patch.apply(&mut self.layout);
        self
    }

    pub fn select(mut self, kinds: &[ElementKind]) -> Result<Self> {
        select_elements(self.registry, &mut self.layout, kinds)?;
        Ok(self)
    }

    pub fn finish(self) -> LayoutPreset {
        self.layout
    }
}
