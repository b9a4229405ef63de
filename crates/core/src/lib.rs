pub mod anchor;
pub mod catalog;
pub mod compose;
pub mod error;
pub mod registry;
pub mod scenario;
pub mod synth;

pub use anchor::{DEFAULT_STEP_SECONDS, TimeAnchor, iso_date};
pub use catalog::{catalog, find_scenario};
pub use compose::{LayoutEdit, compose, mutate_element, select_elements};
pub use error::{NotFound, Result, ScenarioError};
pub use registry::{Constants, LayoutRegistry};
pub use scenario::{HarnessInput, ScenarioBuilder, ScenarioDescriptor};
