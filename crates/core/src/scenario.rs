//! Scenario records handed to the screenshot harness.

use serde::Serialize;
use watchface_protocol::{BasalProfile, ConfigTree, DeviceStatus, SgvEntry, Treatment};

use crate::compose::compose;
use crate::error::{Result, ScenarioError};
use crate::registry::LayoutRegistry;

/// What the harness needs to run one screenshot: the effective config and
/// the data streams the mock server should return. Streams a scenario does
/// not mention are empty.
pub trait HarnessInput {
    fn config(&self) -> &ConfigTree;

    fn sgvs(&self) -> &[SgvEntry] {
        &[]
    }

    fn treatments(&self) -> &[Treatment] {
        &[]
    }

    fn profile(&self) -> &[BasalProfile] {
        &[]
    }

    fn devicestatus(&self) -> &[DeviceStatus] {
        &[]
    }

    /// Whether the harness should run this scenario.
    fn is_test(&self) -> bool {
        true
    }
}

/// A fully built scenario. `config` is already composed over the base
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    pub enabled: bool,
    pub config: ConfigTree,
    pub sgvs: Vec<SgvEntry>,
    pub treatments: Vec<Treatment>,
    pub profile: Vec<BasalProfile>,
    pub devicestatus: Vec<DeviceStatus>,
}

impl ScenarioDescriptor {
    pub fn builder(name: impl Into<String>) -> ScenarioBuilder {
        ScenarioBuilder::new(name.into())
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl HarnessInput for ScenarioDescriptor {
    fn config(&self) -> &ConfigTree {
        &self.config
    }

    fn sgvs(&self) -> &[SgvEntry] {
        &self.sgvs
    }

    fn treatments(&self) -> &[Treatment] {
        &self.treatments
    }

    fn profile(&self) -> &[BasalProfile] {
        &self.profile
    }

    fn devicestatus(&self) -> &[DeviceStatus] {
        &self.devicestatus
    }

    fn is_test(&self) -> bool {
        self.enabled
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: String,
    doc: String,
    enabled: bool,
    layers: Vec<ConfigTree>,
    sgvs: Vec<SgvEntry>,
    treatments: Vec<Treatment>,
    profile: Vec<BasalProfile>,
    devicestatus: Vec<DeviceStatus>,
}

impl ScenarioBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            doc: String::new(),
            enabled: true,
            layers: Vec::new(),
            sgvs: Vec::new(),
            treatments: Vec::new(),
            profile: Vec::new(),
            devicestatus: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Keep the scenario in the catalogue but tell the harness to skip it.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Add a config layer. Layers apply in call order over the base config.
    pub fn config(mut self, layer: ConfigTree) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn sgvs(mut self, sgvs: Vec<SgvEntry>) -> Self {
        self.sgvs = sgvs;
        self
    }

    /// Appends, so boluses and basals can come from separate generators.
    pub fn treatments(mut self, treatments: Vec<Treatment>) -> Self {
        self.treatments.extend(treatments);
        self
    }

    pub fn profile(mut self, profile: Vec<BasalProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn devicestatus(mut self, devicestatus: Vec<DeviceStatus>) -> Self {
        self.devicestatus = devicestatus;
        self
    }

    /// Compose the config over the registry's base and check that the
    /// selected layout resolves.
    pub fn build(self, registry: &LayoutRegistry) -> Result<ScenarioDescriptor> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::malformed("scenario name is empty"));
        }
        let config = compose(registry.base_config(), &self.layers);
        registry
            .resolve_layout(&config)
            .map_err(|e| e.in_scenario(&self.name))?;
        tracing::debug!(
            scenario = %self.name,
            layers = self.layers.len(),
            sgvs = self.sgvs.len(),
            treatments = self.treatments.len(),
            "built scenario"
        );
        Ok(ScenarioDescriptor {
            name: self.name,
            doc: self.doc,
            enabled: self.enabled,
            config,
            sgvs: self.sgvs,
            treatments: self.treatments,
            profile: self.profile,
            devicestatus: self.devicestatus,
        })
    }
}
