use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `#pragma include` resolution limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Includes", inline)]
#[serde(default)]
pub struct IncludeOptions {
    /// Maximum include nesting depth for a single stage.
    #[schemars(title = "Max Depth", range(min = 1, max = 4096))]
    pub max_depth: usize,
}

impl Default for IncludeOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}
