//! Rendering error types.
//!
//! Everything here is a configuration or resource error: fatal, surfaced at
//! material-setup time, never retried. Type-mismatched writes into a typed
//! value store are a programming error and panic at the write site instead
//! (see [`crate::materials::MaterialValues`]).

use std::fmt;

use crate::uniform::UniformType;

/// Errors that can occur in the rendering scaffold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A shader failed to compile.
    ShaderCompile(String),
    /// A shader program failed to link.
    ProgramLink(String),
    /// The compiled program exposes an active uniform with no declared binding.
    UnresolvedUniform(String),
    /// The compiled program exposes an active attribute with no declared binding.
    UnresolvedAttribute(String),
    /// A material uniform binding has no value in the material's store.
    MissingUniformValue(String),
    /// A material attribute binding has no buffer in the material's store.
    MissingAttributeValue(String),
    /// A geometry attribute binding names a buffer the entity's mesh lacks.
    MissingMeshAttribute(String),
    /// A stored uniform value does not match its binding's declared type.
    UniformTypeMismatch {
        /// The shader-facing uniform name.
        name: String,
        /// Type declared by the binding.
        expected: UniformType,
        /// Type currently held by the store.
        actual: UniformType,
    },
    /// Failed to create a backend resource.
    ResourceCreation(String),
    /// An invalid parameter was provided.
    InvalidParameter(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShaderCompile(msg) => write!(f, "shader compilation failed: {msg}"),
            Self::ProgramLink(msg) => write!(f, "program link failed: {msg}"),
            Self::UnresolvedUniform(name) => {
                write!(f, "active uniform `{name}` has no declared binding")
            }
            Self::UnresolvedAttribute(name) => {
                write!(f, "active attribute `{name}` has no declared binding")
            }
            Self::MissingUniformValue(name) => {
                write!(f, "no value for material uniform `{name}`")
            }
            Self::MissingAttributeValue(name) => {
                write!(f, "no buffer for material attribute `{name}`")
            }
            Self::MissingMeshAttribute(name) => {
                write!(f, "mesh has no attribute buffer named `{name}`")
            }
            Self::UniformTypeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "uniform `{name}` declared as {expected:?} but stored as {actual:?}"
            ),
            Self::ResourceCreation(msg) => write!(f, "resource creation failed: {msg}"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::UnresolvedUniform("u_MvpMatrix".to_string());
        assert_eq!(
            err.to_string(),
            "active uniform `u_MvpMatrix` has no declared binding"
        );

        let err = RenderError::ShaderCompile("no main".to_string());
        assert_eq!(err.to_string(), "shader compilation failed: no main");

        let err = RenderError::UniformTypeMismatch {
            name: "u_LightPosition".to_string(),
            expected: UniformType::Vec3,
            actual: UniformType::Float,
        };
        assert!(err.to_string().contains("u_LightPosition"));
    }
}
