//! The screenshot scenarios, built against one shared time anchor.
//!
//! Each submodule contributes one family. Scenarios that share a shape
//! (battery placement, time font heights, prediction staleness) are built
//! by a parametrized function per family member.

mod basics;
mod layouts;
mod points;
mod predictions;
mod recency;

use watchface_protocol::{ConfigTree, Key, LayoutPreset};

use crate::anchor::TimeAnchor;
use crate::error::{NotFound, Result, ScenarioError};
use crate::registry::LayoutRegistry;
use crate::scenario::ScenarioDescriptor;

/// What every scenario family is built from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fixture<'r> {
    pub anchor: TimeAnchor,
    pub registry: &'r LayoutRegistry,
}

impl Fixture<'_> {
    /// An integer option from the base configuration.
    pub fn base_int(&self, key: Key<i64>) -> Result<i64> {
        self.registry.base_config().get(key).ok_or_else(|| {
            ScenarioError::malformed(format!("base config has no {}", key.key()))
        })
    }
}

/// A config layer selecting `layout` as the custom layout.
pub(crate) fn custom(layout: LayoutPreset) -> ConfigTree {
    ConfigTree::new().with_custom_layout(layout)
}

/// Every scenario, enabled or not, in catalogue order.
pub fn catalog(anchor: &TimeAnchor, registry: &LayoutRegistry) -> Result<Vec<ScenarioDescriptor>> {
    let fx = Fixture {
        anchor: *anchor,
        registry,
    };
    let mut scenarios = Vec::new();
    scenarios.extend(basics::scenarios(&fx)?);
    scenarios.extend(layouts::scenarios(&fx)?);
    scenarios.extend(points::scenarios(&fx)?);
    scenarios.extend(recency::scenarios(&fx)?);
    scenarios.extend(predictions::scenarios(&fx)?);
    tracing::debug!(
        total = scenarios.len(),
        enabled = scenarios.iter().filter(|s| s.enabled).count(),
        "built scenario catalogue"
    );
    Ok(scenarios)
}

pub fn find_scenario(
    anchor: &TimeAnchor,
    registry: &LayoutRegistry,
    name: &str,
) -> Result<ScenarioDescriptor> {
    catalog(anchor, registry)?
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| NotFound::Scenario(name.to_string()).into())
}
