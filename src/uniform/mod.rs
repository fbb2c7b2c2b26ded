//! Uniform metadata declared by shader modules.
//!
//! Uniform declarations are collected from GLSL source by an
//! [`extract::UniformExtractor`] and may also be supplied explicitly when a
//! module is registered. Both end up in a [`Uniforms`] map keyed by uniform
//! name.

pub mod extract;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Uniform name to declared metadata. Merges are last-writer-wins.
pub type Uniforms = BTreeMap<String, UniformSpec>;

/// GLSL uniform types recognized by the default extractor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum UniformType {
    /// `bool`
    #[serde(rename = "bool")]
    Bool,
    /// `float`
    #[serde(rename = "float")]
    Float,
    /// `int`
    #[serde(rename = "int")]
    Int,
    /// `vec2`
    #[serde(rename = "vec2")]
    Vec2,
    /// `vec3`
    #[serde(rename = "vec3")]
    Vec3,
    /// `vec4`
    #[serde(rename = "vec4")]
    Vec4,
    /// `ivec2`
    #[serde(rename = "ivec2")]
    IVec2,
    /// `ivec3`
    #[serde(rename = "ivec3")]
    IVec3,
    /// `ivec4`
    #[serde(rename = "ivec4")]
    IVec4,
    /// `mat2`
    #[serde(rename = "mat2")]
    Mat2,
    /// `mat3`
    #[serde(rename = "mat3")]
    Mat3,
    /// `mat4`
    #[serde(rename = "mat4")]
    Mat4,
    /// `sampler2D`
    #[serde(rename = "sampler2D")]
    Sampler2D,
    /// `samplerCube`
    #[serde(rename = "samplerCube")]
    SamplerCube,
}

impl UniformType {
    /// Every recognized type, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Bool,
        Self::Float,
        Self::Int,
        Self::Vec2,
        Self::Vec3,
        Self::Vec4,
        Self::IVec2,
        Self::IVec3,
        Self::IVec4,
        Self::Mat2,
        Self::Mat3,
        Self::Mat4,
        Self::Sampler2D,
        Self::SamplerCube,
    ];

    /// The GLSL keyword for this type.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Int => "int",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::IVec2 => "ivec2",
            Self::IVec3 => "ivec3",
            Self::IVec4 => "ivec4",
            Self::Mat2 => "mat2",
            Self::Mat3 => "mat3",
            Self::Mat4 => "mat4",
            Self::Sampler2D => "sampler2D",
            Self::SamplerCube => "samplerCube",
        }
    }

    /// Number of scalar components, or `None` for opaque sampler types.
    #[must_use]
    pub fn components(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Float | Self::Int => Some(1),
            Self::Vec2 | Self::IVec2 => Some(2),
            Self::Vec3 | Self::IVec3 => Some(3),
            Self::Vec4 | Self::IVec4 | Self::Mat2 => Some(4),
            Self::Mat3 => Some(9),
            Self::Mat4 => Some(16),
            Self::Sampler2D | Self::SamplerCube => None,
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Returned when a string is not one of the [`UniformType`] keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUniformType(
    /// The rejected keyword.
    pub String,
);

impl fmt::Display for UnknownUniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown uniform type '{}'", self.0)
    }
}

impl std::error::Error for UnknownUniformType {}

impl FromStr for UniformType {
    type Err = UnknownUniformType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.keyword() == s)
            .ok_or_else(|| UnknownUniformType(s.to_owned()))
    }
}

/// A parsed uniform default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniformValue {
    /// `bool` default.
    Bool(bool),
    /// `int` / `float` default.
    Number(f64),
    /// Vector or matrix default, components in source order.
    Vector(Vec<f64>),
}

/// Declared metadata for one uniform: its type and optional default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformSpec {
    /// GLSL type of the uniform.
    #[serde(rename = "type")]
    pub ty: UniformType,
    /// Default value, if one was declared and could be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<UniformValue>,
}

impl UniformSpec {
    /// A uniform of type `ty` with no default.
    #[must_use]
    pub fn new(ty: UniformType) -> Self {
        Self { ty, default: None }
    }

    /// A uniform of type `ty` with the given default.
    #[must_use]
    pub fn with_default(ty: UniformType, default: UniformValue) -> Self {
        Self {
            ty,
            default: Some(default),
        }
    }
}
