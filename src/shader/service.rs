//! Shader module registry and resolver.
//!
//! Modules are registered as raw per-stage GLSL plus declared uniforms.
//! [`ShaderModuleService::get_module`] resolves a module into compilable
//! source by inlining `#pragma include` directives, merging the uniforms of
//! everything it pulled in and making sure the fragment stage declares a
//! float precision. Resolutions are cached for the lifetime of the service.
//!
//! Register every module before the first resolution: re-registering a
//! module does not invalidate resolutions that already used it.

use std::borrow::Cow;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::builtins::BUILTIN_MODULES;
use super::include::{IncludeInliner, ShaderStage};
use super::precision;
use crate::error::ShaderModuleError;
use crate::options::ModuleOptions;
use crate::uniform::extract::{GlslUniformExtractor, UniformExtractor};
use crate::uniform::{UniformSpec, Uniforms};

/// Registration input for one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleParams {
    /// Vertex-stage source.
    pub vs: String,
    /// Fragment-stage source.
    pub fs: String,
    /// Explicitly declared uniforms. These win over uniforms found in the
    /// stage sources.
    pub uniforms: Uniforms,
}

impl ModuleParams {
    /// Params with the given stage sources and no declared uniforms.
    #[must_use]
    pub fn new(vs: impl Into<String>, fs: impl Into<String>) -> Self {
        Self {
            vs: vs.into(),
            fs: fs.into(),
            uniforms: Uniforms::new(),
        }
    }

    /// Declare a uniform explicitly.
    #[must_use]
    pub fn with_uniform(
        mut self,
        name: impl Into<String>,
        spec: UniformSpec,
    ) -> Self {
        let _ = self.uniforms.insert(name.into(), spec);
        self
    }
}

/// A registered module before include resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawModule {
    /// Vertex-stage source after uniform extraction.
    pub vs: String,
    /// Fragment-stage source after uniform extraction.
    pub fs: String,
    /// Extracted uniforms overlaid with the declared ones.
    pub uniforms: Uniforms,
}

/// A fully resolved module, ready to hand to the shader compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedModule {
    /// Vertex source with includes inlined, trimmed.
    pub vs: String,
    /// Fragment source with includes inlined and precision ensured,
    /// trimmed.
    pub fs: String,
    /// Uniforms of this module and every module it included.
    pub uniforms: Uniforms,
}

/// Owns the raw-module table and the resolved-module cache.
pub struct ShaderModuleService<E = GlslUniformExtractor> {
    options: ModuleOptions,
    extractor: E,
    raw_modules: FxHashMap<String, RawModule>,
    resolved: FxHashMap<String, Arc<ResolvedModule>>,
}

impl Default for ShaderModuleService {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderModuleService {
    /// Empty service with default options and the GLSL uniform extractor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ModuleOptions::default())
    }

    /// Empty service with the given options.
    #[must_use]
    pub fn with_options(options: ModuleOptions) -> Self {
        Self::with_extractor(options, GlslUniformExtractor)
    }
}

impl<E: UniformExtractor> ShaderModuleService<E> {
    /// Empty service using a custom uniform extractor.
    #[must_use]
    pub fn with_extractor(options: ModuleOptions, extractor: E) -> Self {
        Self {
            options,
            extractor,
            raw_modules: FxHashMap::default(),
            resolved: FxHashMap::default(),
        }
    }

    /// Options this service was created with.
    #[must_use]
    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    /// Register (or silently replace) the module `name`.
    ///
    /// Both stages run through the uniform extractor. Uniforms are merged
    /// vertex first, then fragment, then the explicitly declared ones, each
    /// overwriting the previous on a name collision.
    pub fn register_module(
        &mut self,
        name: impl Into<String>,
        params: ModuleParams,
    ) {
        let name = name.into();
        let ModuleParams {
            vs,
            fs,
            uniforms: declared,
        } = params;

        let vs = self.extractor.extract(&vs);
        let fs = self.extractor.extract(&fs);
        let mut uniforms = vs.uniforms;
        uniforms.extend(fs.uniforms);
        uniforms.extend(declared);

        if self.resolved.contains_key(&name) {
            log::warn!(
                "shader module '{name}' re-registered after resolution; \
                 cached result is kept"
            );
        }
        let _ = self.raw_modules.insert(
            name,
            RawModule {
                vs: vs.content,
                fs: fs.content,
                uniforms,
            },
        );
    }

    /// Register every module in [`BUILTIN_MODULES`].
    pub fn register_builtin_modules(&mut self) {
        for m in BUILTIN_MODULES {
            self.register_module(m.name, ModuleParams::new(m.vs, m.fs));
        }
        log::info!("builtin modules compiled");
    }

    /// Whether `name` has been registered.
    #[must_use]
    pub fn has_module(&self, name: &str) -> bool {
        self.raw_modules.contains_key(name)
    }

    /// Whether `name` has a cached resolution.
    #[must_use]
    pub fn is_resolved(&self, name: &str) -> bool {
        self.resolved.contains_key(name)
    }

    /// Registered module names, sorted.
    #[must_use]
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.raw_modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The registered, unresolved form of `name`.
    #[must_use]
    pub fn raw_module(&self, name: &str) -> Option<&RawModule> {
        self.raw_modules.get(name)
    }

    /// Resolve `name`, or return its cached resolution.
    ///
    /// Every call after the first successful one returns the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderModuleError::UnknownModule`] if `name`, or any module
    /// it transitively includes, is not registered, and
    /// [`ShaderModuleError::IncludeDepthExceeded`] if includes nest deeper
    /// than `includes.max_depth`. Nothing is cached on failure.
    pub fn get_module(
        &mut self,
        name: &str,
    ) -> Result<Arc<ResolvedModule>, ShaderModuleError> {
        if let Some(resolved) = self.resolved.get(name) {
            return Ok(Arc::clone(resolved));
        }

        let resolved = Arc::new(self.resolve(name)?);
        let _ = self
            .resolved
            .insert(name.to_owned(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn resolve(&self, name: &str) -> Result<ResolvedModule, ShaderModuleError> {
        let raw = self.raw_modules.get(name).ok_or_else(|| {
            ShaderModuleError::UnknownModule {
                name: name.to_owned(),
                included_by: None,
            }
        })?;

        let max_depth = self.options.includes.max_depth;
        let vs = IncludeInliner::new(
            &self.raw_modules,
            ShaderStage::Vertex,
            name,
            max_depth,
        )
        .process(&raw.vs)?;
        let fs = IncludeInliner::new(
            &self.raw_modules,
            ShaderStage::Fragment,
            name,
            max_depth,
        )
        .process(&raw.fs)?;

        log::debug!(
            "resolved shader module '{name}': {} includes {:?}, {} \
             includes {:?}",
            ShaderStage::Vertex.label(),
            vs.visited,
            ShaderStage::Fragment.label(),
            fs.visited,
        );

        let visit_order = vs
            .visited
            .iter()
            .chain(&fs.visited)
            .map(String::as_str)
            .chain(std::iter::once(name));
        let uniforms = self.merge_uniforms(visit_order);

        let fs_content = if self.options.precision.inject_default {
            precision::ensure_precision(&fs.content)
        } else {
            Cow::Borrowed(fs.content.as_str())
        };

        Ok(ResolvedModule {
            vs: vs.content.trim().to_owned(),
            fs: fs_content.trim().to_owned(),
            uniforms,
        })
    }

    /// Fold the uniforms of each distinct module in `visit_order`, first
    /// occurrence wins the position, later modules win collisions.
    fn merge_uniforms<'n>(
        &self,
        visit_order: impl Iterator<Item = &'n str>,
    ) -> Uniforms {
        let mut seen = FxHashSet::default();
        let mut uniforms = Uniforms::new();
        for module_name in visit_order {
            if !seen.insert(module_name) {
                continue;
            }
            if let Some(raw) = self.raw_modules.get(module_name) {
                uniforms.extend(
                    raw.uniforms
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone())),
                );
            }
        }
        uniforms
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::shader::precision::DEFAULT_PRECISION_PREAMBLE;
    use crate::uniform::extract::Extracted;
    use crate::uniform::{UniformType, UniformValue};

    fn number(ty: UniformType, v: f64) -> UniformSpec {
        UniformSpec::with_default(ty, UniformValue::Number(v))
    }

    #[test]
    fn base_module_gets_precision_preamble() {
        let mut service = ShaderModuleService::new();
        service.register_module("base", ModuleParams::new("", "void main(){}"));

        let base = service.get_module("base").unwrap();
        assert!(base.fs.starts_with(DEFAULT_PRECISION_PREAMBLE));
        assert!(base.fs.ends_with("void main(){}"));
        assert_eq!(base.vs, "");
    }

    #[test]
    fn child_inlines_base_once_after_preamble() {
        let mut service = ShaderModuleService::new();
        service.register_module("base", ModuleParams::new("", "void main(){}"));
        service.register_module(
            "child",
            ModuleParams::new(
                "",
                "#pragma include \"base\"\nvoid main(){ gl_FragColor = \
                 vec4(1.0); }",
            ),
        );

        let child = service.get_module("child").unwrap();
        assert_eq!(
            child.fs,
            format!(
                "{DEFAULT_PRECISION_PREAMBLE}void main(){{}}\nvoid main(){{ \
                 gl_FragColor = vec4(1.0); }}"
            )
        );
        assert_eq!(child.fs.matches("void main(){}").count(), 1);
        assert_eq!(child.fs, child.fs.trim());
    }

    #[test]
    fn declared_precision_is_left_alone() {
        let mut service = ShaderModuleService::new();
        let fs = "\n  precision highp float;\nvoid main(){}\n\n";
        service.register_module("p", ModuleParams::new("", fs));
        assert_eq!(service.get_module("p").unwrap().fs, fs.trim());
    }

    #[test]
    fn precision_injection_can_be_disabled() {
        let mut options = ModuleOptions::default();
        options.precision.inject_default = false;
        let mut service = ShaderModuleService::with_options(options);
        service.register_module("base", ModuleParams::new("", "void main(){}"));
        assert_eq!(service.get_module("base").unwrap().fs, "void main(){}");
    }

    #[test]
    fn repeated_resolution_returns_cached_arc() {
        let mut service = ShaderModuleService::new();
        service.register_module("lib", ModuleParams::new("float f();", ""));
        service.register_module(
            "m",
            ModuleParams::new("#pragma include lib\nvoid main(){}", ""),
        );

        let first = service.get_module("m").unwrap();
        assert!(service.is_resolved("m"));
        let second = service.get_module("m").unwrap();
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn reregistration_keeps_cached_resolution() {
        let mut service = ShaderModuleService::new();
        service.register_module("m", ModuleParams::new("OLD", ""));
        let before = service.get_module("m").unwrap();

        service.register_module("m", ModuleParams::new("NEW", ""));
        assert_eq!(service.raw_module("m").unwrap().vs, "NEW");
        let after = service.get_module("m").unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.vs, "OLD");
    }

    #[test]
    fn include_dedup_across_direct_and_transitive() {
        let mut service = ShaderModuleService::new();
        service.register_module("b", ModuleParams::new("B_BODY", ""));
        service.register_module(
            "c",
            ModuleParams::new("#pragma include b\nC_BODY", ""),
        );
        service.register_module(
            "a",
            ModuleParams::new(
                "#pragma include b\n#pragma include c\nA_BODY",
                "",
            ),
        );
        let a = service.get_module("a").unwrap();
        assert_eq!(a.vs.matches("B_BODY").count(), 1);
        assert_eq!(a.vs, "B_BODY\n\nC_BODY\nA_BODY");
    }

    #[test]
    fn cyclic_includes_terminate() {
        let mut service = ShaderModuleService::new();
        service.register_module(
            "a",
            ModuleParams::new("", "#pragma include b\nA_BODY"),
        );
        service.register_module(
            "b",
            ModuleParams::new("", "#pragma include a\nB_BODY"),
        );
        let a = service.get_module("a").unwrap();
        assert_eq!(a.fs.matches("A_BODY").count(), 1);
        assert_eq!(a.fs.matches("B_BODY").count(), 1);
    }

    #[test]
    fn uniform_merge_follows_visit_order() {
        // a includes b in its vertex stage. Visit order is
        // vs [b] ++ fs [] ++ [a], so a's `x` is applied last and wins.
        let mut service = ShaderModuleService::new();
        service.register_module(
            "b",
            ModuleParams::new("", "")
                .with_uniform("x", number(UniformType::Float, 2.0))
                .with_uniform("y", number(UniformType::Float, 3.0)),
        );
        service.register_module(
            "a",
            ModuleParams::new("#pragma include b", "")
                .with_uniform("x", number(UniformType::Float, 1.0)),
        );

        let a = service.get_module("a").unwrap();
        assert_eq!(a.uniforms["x"], number(UniformType::Float, 1.0));
        assert_eq!(a.uniforms["y"], number(UniformType::Float, 3.0));
    }

    #[test]
    fn uniform_merge_uses_later_included_module() {
        // vs visits [b], fs visits [c]; c comes after b so c's `x` wins.
        let mut service = ShaderModuleService::new();
        service.register_module(
            "b",
            ModuleParams::new("", "")
                .with_uniform("x", number(UniformType::Float, 2.0)),
        );
        service.register_module(
            "c",
            ModuleParams::new("", "")
                .with_uniform("x", number(UniformType::Float, 5.0)),
        );
        service.register_module(
            "a",
            ModuleParams::new("#pragma include b", "#pragma include c"),
        );
        let a = service.get_module("a").unwrap();
        assert_eq!(a.uniforms["x"], number(UniformType::Float, 5.0));
    }

    #[test]
    fn registration_merges_extracted_then_declared_uniforms() {
        let mut service = ShaderModuleService::new();
        service.register_module(
            "m",
            ModuleParams::new(
                "uniform float u_a : 1.0;\nuniform float u_b : 1.0;",
                "uniform float u_b : 2.0;\nuniform float u_c : 2.0;",
            )
            .with_uniform("u_c", number(UniformType::Float, 3.0)),
        );
        let raw = service.raw_module("m").unwrap();
        assert_eq!(raw.vs, "uniform float u_a;\nuniform float u_b;");
        assert_eq!(raw.uniforms["u_a"], number(UniformType::Float, 1.0));
        assert_eq!(raw.uniforms["u_b"], number(UniformType::Float, 2.0));
        assert_eq!(raw.uniforms["u_c"], number(UniformType::Float, 3.0));
    }

    #[test]
    fn unknown_module_is_an_error_and_not_cached() {
        let mut service = ShaderModuleService::new();
        assert!(matches!(
            service.get_module("nope"),
            Err(ShaderModuleError::UnknownModule { included_by: None, .. })
        ));

        service.register_module(
            "a",
            ModuleParams::new("", "#pragma include missing"),
        );
        assert!(matches!(
            service.get_module("a"),
            Err(ShaderModuleError::UnknownModule { .. })
        ));
        assert!(!service.is_resolved("a"));

        service.register_module("missing", ModuleParams::new("", "M"));
        assert!(service.get_module("a").unwrap().fs.ends_with('M'));
    }

    #[test]
    fn depth_limit_comes_from_options() {
        let mut options = ModuleOptions::default();
        options.includes.max_depth = 1;
        let mut service = ShaderModuleService::with_options(options);
        service.register_module("c", ModuleParams::new("C", ""));
        service
            .register_module("b", ModuleParams::new("#pragma include c", ""));
        service
            .register_module("a", ModuleParams::new("#pragma include b", ""));

        assert_eq!(service.get_module("b").unwrap().vs, "C");
        assert!(matches!(
            service.get_module("a"),
            Err(ShaderModuleError::IncludeDepthExceeded { limit: 1, .. })
        ));
    }

    #[derive(Default)]
    struct CountingExtractor {
        calls: Cell<usize>,
    }

    impl UniformExtractor for CountingExtractor {
        fn extract(&self, source: &str) -> Extracted {
            self.calls.set(self.calls.get() + 1);
            GlslUniformExtractor.extract(source)
        }
    }

    #[test]
    fn extractor_runs_only_at_registration() {
        let mut service = ShaderModuleService::with_extractor(
            ModuleOptions::default(),
            CountingExtractor::default(),
        );
        service.register_module("m", ModuleParams::new("V", "F"));
        assert_eq!(service.extractor.calls.get(), 2);

        let _ = service.get_module("m").unwrap();
        let _ = service.get_module("m").unwrap();
        assert_eq!(service.extractor.calls.get(), 2);
    }

    #[test]
    fn builtin_modules_resolve() {
        let mut service = ShaderModuleService::new();
        service.register_builtin_modules();
        assert_eq!(service.module_names(), vec!["circle", "decode", "sdf_2d"]);

        let circle = service.get_module("circle").unwrap();
        assert!(circle.vs.contains("vec4 decode_color(vec2 packed)"));
        assert!(!circle.vs.contains("#pragma include"));
        assert!(circle.fs.starts_with(DEFAULT_PRECISION_PREAMBLE));
        assert!(circle.fs.contains("float sdf_circle(vec2 p, float r)"));

        // decode's uniform comes along through the vertex include.
        assert_eq!(
            circle.uniforms["u_DevicePixelRatio"],
            number(UniformType::Float, 1.0)
        );
        assert_eq!(
            circle.uniforms["u_StrokeColor"].default,
            Some(UniformValue::Vector(vec![0.0, 0.0, 0.0, 1.0]))
        );
        assert!(circle.uniforms.contains_key("u_ModelViewProjection"));

        for name in ["decode", "sdf_2d"] {
            let _ = service.get_module(name).unwrap();
        }
    }
}
