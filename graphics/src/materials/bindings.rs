//! Binding declarations.
//!
//! Bindings map shader variable names to semantic data sources. The source
//! set is closed: a uniform comes from the material's own store, from the
//! owning entity, or from the active camera; an attribute comes from the
//! entity's mesh or from the material's store. Entity and camera uniforms
//! use fixed vocabularies with canonical shader names, so materials opt in
//! by declaring the variant rather than spelling names.

use crate::uniform::UniformType;

/// Uniforms computed by the owning entity every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityUniform {
    /// World model matrix of the entity (`u_ModelMatrix`).
    ModelMatrix,
    /// Inverse-transpose of the model matrix (`u_NormalMatrix`).
    NormalMatrix,
    /// Projection × view × model, recomputed each frame (`u_MvpMatrix`).
    MvpMatrix,
}

impl EntityUniform {
    /// The canonical shader variable name.
    pub fn shader_name(&self) -> &'static str {
        match self {
            Self::ModelMatrix => "u_ModelMatrix",
            Self::NormalMatrix => "u_NormalMatrix",
            Self::MvpMatrix => "u_MvpMatrix",
        }
    }

    /// The value type this uniform always carries.
    pub fn value_type(&self) -> UniformType {
        UniformType::Mat4
    }
}

/// Uniforms supplied by the active camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraUniform {
    /// World-space camera position (`u_CameraPosition`).
    Position,
    /// View matrix (`u_ViewMatrix`).
    ViewMatrix,
    /// Projection matrix (`u_ProjMatrix`).
    ProjectionMatrix,
}

impl CameraUniform {
    /// The canonical shader variable name.
    pub fn shader_name(&self) -> &'static str {
        match self {
            Self::Position => "u_CameraPosition",
            Self::ViewMatrix => "u_ViewMatrix",
            Self::ProjectionMatrix => "u_ProjMatrix",
        }
    }

    /// The value type this uniform always carries.
    pub fn value_type(&self) -> UniformType {
        match self {
            Self::Position => UniformType::Vec3,
            Self::ViewMatrix | Self::ProjectionMatrix => UniformType::Mat4,
        }
    }
}

/// Declares where a shader uniform gets its value.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformBinding {
    /// Value lives in the material's own store under this name.
    Material {
        /// The shader variable name, also the store key.
        name: String,
        /// Expected value type.
        ty: UniformType,
    },
    /// Value is computed by the owning entity.
    Entity(EntityUniform),
    /// Value is supplied by the active camera.
    Camera(CameraUniform),
}

impl UniformBinding {
    /// Declare a material-owned uniform.
    pub fn material(name: impl Into<String>, ty: UniformType) -> Self {
        Self::Material {
            name: name.into(),
            ty,
        }
    }

    /// Declare an entity-computed uniform.
    pub fn entity(uniform: EntityUniform) -> Self {
        Self::Entity(uniform)
    }

    /// Declare a camera-supplied uniform.
    pub fn camera(uniform: CameraUniform) -> Self {
        Self::Camera(uniform)
    }

    /// The shader variable name this binding resolves.
    pub fn name(&self) -> &str {
        match self {
            Self::Material { name, .. } => name,
            Self::Entity(u) => u.shader_name(),
            Self::Camera(u) => u.shader_name(),
        }
    }

    /// The value type this binding supplies.
    pub fn value_type(&self) -> UniformType {
        match self {
            Self::Material { ty, .. } => *ty,
            Self::Entity(u) => u.value_type(),
            Self::Camera(u) => u.value_type(),
        }
    }
}

/// Declares where a shader vertex attribute gets its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeBinding {
    /// Buffer comes from the entity's mesh, keyed by this name.
    Geometry(String),
    /// Buffer lives in the material's own store under this name.
    Material(String),
}

impl AttributeBinding {
    /// Declare a mesh-supplied attribute.
    pub fn geometry(name: impl Into<String>) -> Self {
        Self::Geometry(name.into())
    }

    /// Declare a material-owned attribute.
    pub fn material(name: impl Into<String>) -> Self {
        Self::Material(name.into())
    }

    /// The shader variable name this binding resolves.
    pub fn name(&self) -> &str {
        match self {
            Self::Geometry(name) | Self::Material(name) => name,
        }
    }
}
