//! `#pragma include` inlining for a single shader stage.
//!
//! One [`IncludeInliner`] is created per stage per top-level resolution. It
//! walks the include graph depth-first, substituting each directive with the
//! same-stage body of the named module, and records every module it inlined
//! in first-visit order.

use std::sync::OnceLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use super::service::RawModule;
use crate::error::ShaderModuleError;

/// One of the two independently resolved shader program phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage (`vs`).
    Vertex,
    /// Fragment stage (`fs`).
    Fragment,
}

impl ShaderStage {
    /// This stage's source in `module`.
    #[must_use]
    pub fn source(self, module: &RawModule) -> &str {
        match self {
            Self::Vertex => &module.vs,
            Self::Fragment => &module.fs,
        }
    }

    /// Short label used in log output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Vertex => "vs",
            Self::Fragment => "fs",
        }
    }
}

/// `#pragma include name`, `#pragma include "name"`. The directive span runs
/// to the end of the line; trailing text after the name is discarded.
#[allow(clippy::expect_used)]
fn include_directive() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"#pragma include[ \t]+"?([A-Za-z0-9_][^\s"]*)"?[^\n]*"#)
            .expect("include directive pattern is valid")
    })
}

/// Result of inlining one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Inlined {
    /// Stage source with every include directive substituted.
    pub(crate) content: String,
    /// Modules inlined, in first-visit order, excluding the root.
    pub(crate) visited: Vec<String>,
}

/// Depth-first include expander for one stage of one top-level module.
pub(crate) struct IncludeInliner<'a> {
    modules: &'a FxHashMap<String, RawModule>,
    stage: ShaderStage,
    root: &'a str,
    max_depth: usize,
    visited: Vec<String>,
}

impl<'a> IncludeInliner<'a> {
    pub(crate) fn new(
        modules: &'a FxHashMap<String, RawModule>,
        stage: ShaderStage,
        root: &'a str,
        max_depth: usize,
    ) -> Self {
        Self {
            modules,
            stage,
            root,
            max_depth,
            visited: Vec::new(),
        }
    }

    /// Expand every include in `raw`, the root module's stage source.
    pub(crate) fn process(
        mut self,
        raw: &str,
    ) -> Result<Inlined, ShaderModuleError> {
        let content = self.inline(raw, self.root, 0)?;
        Ok(Inlined {
            content,
            visited: self.visited,
        })
    }

    fn is_visited(&self, name: &str) -> bool {
        // The root is already being expanded; an include back to it is a
        // cycle and contributes nothing.
        name == self.root || self.visited.iter().any(|v| v == name)
    }

    fn inline(
        &mut self,
        raw: &str,
        owner: &str,
        depth: usize,
    ) -> Result<String, ShaderModuleError> {
        let mut out = String::with_capacity(raw.len());
        let mut last = 0;

        for caps in include_directive().captures_iter(raw) {
            let (Some(directive), Some(ident)) = (caps.get(0), caps.get(1))
            else {
                continue;
            };
            out.push_str(&raw[last..directive.start()]);
            last = directive.end();

            let name = ident.as_str();
            if self.is_visited(name) {
                continue;
            }

            let module = self.modules.get(name).ok_or_else(|| {
                ShaderModuleError::UnknownModule {
                    name: name.to_owned(),
                    included_by: Some(owner.to_owned()),
                }
            })?;
            if depth >= self.max_depth {
                return Err(ShaderModuleError::IncludeDepthExceeded {
                    name: self.root.to_owned(),
                    limit: self.max_depth,
                });
            }

            self.visited.push(name.to_owned());
            let body = self.inline(self.stage.source(module), name, depth + 1)?;
            out.push_str(&body);
        }

        out.push_str(&raw[last..]);
        Ok(out)
    }
}
