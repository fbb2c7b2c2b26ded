// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GLSL shader module registry with `#pragma include` resolution.
//!
//! Shader code is organized as named modules, each a vertex-stage body and a
//! fragment-stage body plus uniform metadata. A module pulls in another
//! module's same-stage body with `#pragma include "name"`.
//!
//! # Key entry points
//!
//! - [`shader::ShaderModuleService`] - registers modules and resolves them
//!   into final source, cached per module name
//! - [`uniform::extract::UniformExtractor`] - collects uniform declarations
//!   (with `: default` annotations) from stage source
//! - [`options::ModuleOptions`] - precision and include-depth settings, with
//!   TOML load/save
//!
//! # Resolution
//!
//! Resolving a module inlines its includes depth-first, once per included
//! module per stage, so diamonds and cycles collapse to the first
//! occurrence. The uniforms of every visited module are merged, and the
//! fragment stage gets a `GL_FRAGMENT_PRECISION_HIGH` preamble when it
//! declares no float precision of its own.
//!
//! ```
//! use glsl_modules::shader::{ModuleParams, ShaderModuleService};
//!
//! let mut service = ShaderModuleService::new();
//! service.register_module("base", ModuleParams::new("", "float base();"));
//! service.register_module(
//!     "child",
//!     ModuleParams::new("", "#pragma include \"base\"\nvoid main() {}"),
//! );
//!
//! let child = service.get_module("child")?;
//! assert!(child.fs.contains("float base();\nvoid main() {}"));
//! # Ok::<(), glsl_modules::error::ShaderModuleError>(())
//! ```

pub mod error;
pub mod options;
pub mod shader;
pub mod uniform;
