//! Module resolution options with TOML support.
//!
//! Options serialize to/from TOML so a host can keep its shader settings next
//! to the rest of its render configuration.

mod includes;
mod precision;

use std::path::Path;

pub use includes::IncludeOptions;
pub use precision::PrecisionOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ShaderModuleError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[includes]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct ModuleOptions {
    /// Fragment precision handling.
    pub precision: PrecisionOptions,
    /// Include resolution limits.
    pub includes: IncludeOptions,
}

impl ModuleOptions {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ModuleOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ShaderModuleError> {
        let content =
            std::fs::read_to_string(path).map_err(ShaderModuleError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, ShaderModuleError> {
        toml::from_str(content)
            .map_err(|e| ShaderModuleError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ShaderModuleError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShaderModuleError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ShaderModuleError::Io)?;
        }
        std::fs::write(path, content).map_err(ShaderModuleError::Io)
    }
}
