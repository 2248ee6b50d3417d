//! Material system: declarative bindings and the material contract.
//!
//! A material declares which shader variables it uses and where each value
//! comes from (its own store, the owning entity, or the active camera)
//! and never calls backend functions itself. The scene renderer resolves
//! the declarations against the compiled program once and feeds values
//! every frame.

mod bindings;
mod material;

pub use bindings::{AttributeBinding, CameraUniform, EntityUniform, UniformBinding};
pub use material::{share, Material, MaterialValues, SharedMaterial};
