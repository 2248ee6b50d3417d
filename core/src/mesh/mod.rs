//! CPU-side mesh data.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`IndexFormat`] / [`IndexData`] - Index data formats and storage
//! - [`MeshData`] - CPU-side mesh holding named per-vertex attribute arrays
//! - Generators for common demo shapes (cube, sphere, axes)

mod data;
mod generators;

pub use data::{
    AttributeData, IndexData, IndexFormat, MeshData, PrimitiveTopology, ATTRIBUTE_COLOR,
    ATTRIBUTE_NORMAL, ATTRIBUTE_POSITION,
};
pub use generators::{generate_axes, generate_cube, generate_sphere};
