//! Default float precision for fragment stages.
//!
//! GLSL ES fragment shaders have no default float precision, so a fragment
//! stage that never declares one fails to compile. Resolved fragment sources
//! get [`DEFAULT_PRECISION_PREAMBLE`] prepended unless they already carry a
//! `precision <high|medium|low>p float` qualifier.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Selects `highp` when the platform supports it in fragment shaders,
/// `mediump` otherwise.
pub const DEFAULT_PRECISION_PREAMBLE: &str = concat!(
    "#ifdef GL_FRAGMENT_PRECISION_HIGH\n",
    " precision highp float;\n",
    " #else\n",
    " precision mediump float;\n",
    "#endif\n",
);

#[allow(clippy::expect_used)]
fn precision_qualifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"precision\s+(high|low|medium)p\s+float")
            .expect("precision qualifier pattern is valid")
    })
}

/// Whether `source` declares a float precision anywhere.
#[must_use]
pub fn has_precision_qualifier(source: &str) -> bool {
    precision_qualifier().is_match(source)
}

/// `source` with the default preamble prepended if it has no precision
/// qualifier.
#[must_use]
pub fn ensure_precision(source: &str) -> Cow<'_, str> {
    if has_precision_qualifier(source) {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(format!("{DEFAULT_PRECISION_PREAMBLE}{source}"))
    }
}
