//! Shader module registration and `#pragma include` resolution.
//!
//! Callers register named modules (vertex and fragment source plus optional
//! uniform metadata) with a [`ShaderModuleService`] and later resolve them
//! into final GLSL with [`ShaderModuleService::get_module`].

/// Library-provided GLSL modules.
pub mod builtins;
/// Per-stage `#pragma include` expansion.
pub mod include;
/// Default fragment float precision.
pub mod precision;
/// Module registry, resolver and resolution cache.
pub mod service;

pub use include::ShaderStage;
pub use service::{ModuleParams, RawModule, ResolvedModule, ShaderModuleService};
