//! Crate-level error types.

use std::fmt;

/// Errors produced while registering or resolving shader modules.
#[derive(Debug)]
pub enum ShaderModuleError {
    /// A module was requested, or included, but never registered.
    UnknownModule {
        /// Name that failed the lookup.
        name: String,
        /// Module whose `#pragma include` referenced `name`, if any.
        included_by: Option<String>,
    },
    /// Include nesting went deeper than `includes.max_depth`.
    IncludeDepthExceeded {
        /// Top-level module being resolved.
        name: String,
        /// Configured depth limit.
        limit: usize,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for ShaderModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModule {
                name,
                included_by: None,
            } => write!(f, "unknown shader module '{name}'"),
            Self::UnknownModule {
                name,
                included_by: Some(parent),
            } => {
                write!(
                    f,
                    "unknown shader module '{name}' included by '{parent}'"
                )
            }
            Self::IncludeDepthExceeded { name, limit } => {
                write!(
                    f,
                    "include depth limit {limit} exceeded while resolving \
                     '{name}'"
                )
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for ShaderModuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ShaderModuleError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_module_message_names_includer() {
        let top = ShaderModuleError::UnknownModule {
            name: "missing".to_owned(),
            included_by: None,
        };
        assert_eq!(top.to_string(), "unknown shader module 'missing'");

        let nested = ShaderModuleError::UnknownModule {
            name: "missing".to_owned(),
            included_by: Some("circle".to_owned()),
        };
        assert_eq!(
            nested.to_string(),
            "unknown shader module 'missing' included by 'circle'"
        );
    }

    #[test]
    fn io_error_is_exposed_as_source() {
        use std::error::Error;

        let err: ShaderModuleError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(ShaderModuleError::OptionsParse("bad".to_owned())
            .source()
            .is_none());
    }
}
