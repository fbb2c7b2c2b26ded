//! Library-provided shader modules, embedded at compile time.

/// A built-in module definition: registry name plus per-stage source.
pub struct BuiltinModule {
    /// Name other modules use in `#pragma include`.
    pub name: &'static str,
    /// Vertex-stage source (may be empty).
    pub vs: &'static str,
    /// Fragment-stage source (may be empty).
    pub fs: &'static str,
}

/// Built-in modules. Registration order does not matter since includes are
/// resolved lazily.
pub const BUILTIN_MODULES: &[BuiltinModule] = &[
    BuiltinModule {
        name: "decode",
        vs: include_str!("../../assets/shaders/modules/decode.glsl"),
        fs: "",
    },
    BuiltinModule {
        name: "sdf_2d",
        vs: "",
        fs: include_str!("../../assets/shaders/modules/sdf_2d.glsl"),
    },
    BuiltinModule {
        name: "circle",
        vs: include_str!("../../assets/shaders/modules/circle_vert.glsl"),
        fs: include_str!("../../assets/shaders/modules/circle_frag.glsl"),
    },
];
