use std::collections::BTreeMap;

use permspace_core::errors::{ErrorInfo, PermspaceError};
use permspace_core::Value;
use serde::{Deserialize, Serialize};

use crate::builder::SpaceBuilder;

/// Data-only description of a parameter space, loadable from YAML or JSON.
///
/// Dependents and filters carry code and are registered on the builder
/// returned by [`SpaceConfig::into_builder`].
///
/// ```yaml
/// order: [arabic, letter_lower]
/// independents:
///   arabic: [1, 2, 3]
///   letter_lower: [a, b, c]
/// constants:
///   label: constant
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceConfig {
    pub order: Vec<String>,
    #[serde(default)]
    pub independents: BTreeMap<String, Value>,
    #[serde(default)]
    pub constants: BTreeMap<String, Value>,
}

impl SpaceConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, PermspaceError> {
        serde_yaml::from_str(text)
            .map_err(|err| PermspaceError::Serde(ErrorInfo::new("yaml-decode", err.to_string())))
    }

    pub fn from_json_str(text: &str) -> Result<Self, PermspaceError> {
        serde_json::from_str(text)
            .map_err(|err| PermspaceError::Serde(ErrorInfo::new("json-decode", err.to_string())))
    }

    /// Converts the description into an open builder. Domain shapes are
    /// checked when the builder is built.
    pub fn into_builder(self) -> SpaceBuilder {
        let mut builder = SpaceBuilder::new(self.order);
        for (name, source) in self.independents {
            builder = builder.domain(name, source);
        }
        for (name, value) in self.constants {
            builder = builder.constant(name, value);
        }
        builder
    }
}
