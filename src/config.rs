//! Validator settings.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Report config keys outside the node schema as errors instead of
    /// warnings.
    pub strict_unknown_fields: bool,
    pub max_name_length: usize,
    pub max_description_length: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            strict_unknown_fields: false,
            max_name_length: 255,
            max_description_length: 1000,
        }
    }
}

impl ValidatorConfig {
    /// Parse settings from JSON; omitted keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
