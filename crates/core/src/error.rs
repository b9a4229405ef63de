use thiserror::Error;
use watchface_protocol::{ElementKind, InvalidOption};

/// A fixture referred to something the constants table does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("no layout named {0:?}")]
    Layout(String),
    #[error("no point style named {0:?}")]
    PointStyle(String),
    #[error("layout has no {0}")]
    Element(ElementKind),
    #[error("element ordinal {0} is not in the ELEMENTS table")]
    ElementOrdinal(u8),
    #[error("no scenario named {0:?}")]
    Scenario(String),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error("malformed scenario{}: {reason}", .scenario.as_deref().map(|s| format!(" {s}")).unwrap_or_default())]
    Malformed {
        scenario: Option<String>,
        reason: String,
    },
    #[error(transparent)]
    InvalidOption(#[from] InvalidOption),
    #[error("constants table: {0}")]
    Constants(#[from] serde_json::Error),
    #[error("embedded constants table is invalid: {0}")]
    BuiltinConstants(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ScenarioError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            scenario: None,
            reason: reason.into(),
        }
    }

    /// Attach the scenario name to a `Malformed` error.
    pub fn in_scenario(self, name: &str) -> Self {
        match self {
            Self::Malformed {
                scenario: None,
                reason,
            } => Self::Malformed {
                scenario: Some(name.to_string()),
                reason,
            },
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
