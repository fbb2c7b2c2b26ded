use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fragment precision handling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Precision", inline)]
#[serde(default)]
pub struct PrecisionOptions {
    /// Prepend the `GL_FRAGMENT_PRECISION_HIGH` preamble to fragment stages
    /// that declare no float precision.
    #[schemars(title = "Inject Default Precision")]
    pub inject_default: bool,
}

impl Default for PrecisionOptions {
    fn default() -> Self {
        Self {
            inject_default: true,
        }
    }
}
