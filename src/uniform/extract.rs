//! Uniform declaration extraction from GLSL stage source.
//!
//! Module authors may annotate a uniform with a default value using
//! `uniform float u_opacity : 1.0;`. GLSL has no such syntax, so the
//! extractor strips the annotation back to `uniform float u_opacity;` and
//! reports the parsed default alongside the rewritten source.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::{UniformSpec, UniformType, UniformValue, Uniforms};

/// Output of a [`UniformExtractor`]: the rewritten source and the uniforms
/// it declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    /// Stage source with default annotations removed.
    pub content: String,
    /// Uniforms declared in the source.
    pub uniforms: Uniforms,
}

/// Turns raw stage source into [`Extracted`] content and uniforms.
///
/// Implementations must be pure: the same input always produces the same
/// output and nothing else is observed.
pub trait UniformExtractor {
    /// Extract uniform declarations from `source`.
    fn extract(&self, source: &str) -> Extracted;
}

/// Regex-based extractor for `uniform <type> <name> [: <default>];`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlslUniformExtractor;

#[allow(clippy::expect_used)]
fn uniform_declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let types = UniformType::ALL
            .iter()
            .map(|ty| ty.keyword())
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(
            r"\buniform\s+(?:(lowp|mediump|highp)\s+)?({types})\s+([^;]*?);"
        ))
        .expect("uniform declaration pattern is valid")
    })
}

#[allow(clippy::expect_used)]
fn identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .expect("identifier pattern is valid")
    })
}

impl UniformExtractor for GlslUniformExtractor {
    fn extract(&self, source: &str) -> Extracted {
        let mut uniforms = Uniforms::new();
        let content = uniform_declaration()
            .replace_all(source, |caps: &Captures<'_>| {
                let keyword = &caps[2];
                // The pattern only admits known keywords.
                let (Ok(ty), Some(decl)) = (
                    keyword.parse::<UniformType>(),
                    Declaration::parse(&caps[3]),
                ) else {
                    return caps[0].to_owned();
                };
                let default =
                    decl.default.and_then(|d| parse_default(ty, d));
                for name in &decl.names {
                    let _ = uniforms.insert(
                        (*name).to_owned(),
                        UniformSpec {
                            ty,
                            default: default.clone(),
                        },
                    );
                }
                let qualifier = caps
                    .get(1)
                    .map(|m| format!("{} ", m.as_str()))
                    .unwrap_or_default();
                let names = decl.names.join(", ");
                format!("uniform {qualifier}{keyword} {names};")
            })
            .into_owned();
        Extracted { content, uniforms }
    }
}

/// The part of a declaration after the type: `a, b : default`.
struct Declaration<'s> {
    names: Vec<&'s str>,
    default: Option<&'s str>,
}

impl<'s> Declaration<'s> {
    /// `None` if any listed name is not a plain identifier.
    fn parse(body: &'s str) -> Option<Self> {
        let (names, default) = match body.split_once(':') {
            Some((names, default)) => {
                let default = default.trim();
                (names, (!default.is_empty()).then_some(default))
            }
            None => (body, None),
        };
        let names = names
            .split(',')
            .map(str::trim)
            .map(|n| identifier().is_match(n).then_some(n))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { names, default })
    }
}

/// Parse a textual default for `ty`. Returns `None` when the text does not
/// describe a value of that type.
fn parse_default(ty: UniformType, text: &str) -> Option<UniformValue> {
    match ty {
        UniformType::Bool => match text {
            "true" => Some(UniformValue::Bool(true)),
            "false" => Some(UniformValue::Bool(false)),
            _ => None,
        },
        UniformType::Float | UniformType::Int => {
            text.parse().ok().map(UniformValue::Number)
        }
        UniformType::Sampler2D | UniformType::SamplerCube => None,
        _ => {
            let inner = text.trim_start_matches('[').trim_end_matches(']');
            let components = inner
                .split(',')
                .map(|c| c.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .ok()?;
            (Some(components.len()) == ty.components())
                .then_some(UniformValue::Vector(components))
        }
    }
}
