//! The material contract and its value store.
//!
//! A [`Material`] is a reusable visual style: a shader pair, fixed binding
//! declarations, and a [`MaterialValues`] store holding the current values
//! for its material-owned bindings. UI glue writes into the store by name;
//! the render loop only reads it. One material instance may be attached to
//! many entities: share it with [`share`] and every entity observes the
//! same store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use shadelab_core::mesh::PrimitiveTopology;

use crate::buffer::BufferAttribute;
use crate::scene::FrameState;
use crate::uniform::{UniformType, UniformValue};

use super::bindings::{AttributeBinding, UniformBinding};

/// A material shared between entities and UI glue.
pub type SharedMaterial = Rc<RefCell<dyn Material>>;

/// Wrap a material for attachment to entities.
pub fn share<M: Material + 'static>(material: M) -> SharedMaterial {
    Rc::new(RefCell::new(material))
}

/// The mutable value store backing a material's own bindings.
///
/// Uniform slots are typed at insertion; later writes must keep the shape.
/// The scaffold validates only type shape, never semantic ranges.
#[derive(Debug, Default)]
pub struct MaterialValues {
    uniforms: HashMap<String, UniformValue>,
    attributes: HashMap<String, BufferAttribute>,
}

impl MaterialValues {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a uniform slot with its initial value. The value's type
    /// becomes the slot's type.
    #[must_use]
    pub fn with_uniform(mut self, name: impl Into<String>, value: UniformValue) -> Self {
        self.uniforms.insert(name.into(), value);
        self
    }

    /// Declare an attribute slot.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: BufferAttribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Declare or replace a uniform slot, adopting the value's type.
    pub fn insert_uniform(&mut self, name: impl Into<String>, value: UniformValue) {
        self.uniforms.insert(name.into(), value);
    }

    /// Write into an existing uniform slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not exist or the value's type differs from
    /// the slot's type; both are programming errors, not recoverable
    /// states.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let slot = self
            .uniforms
            .get_mut(name)
            .unwrap_or_else(|| panic!("uniform `{name}` is not declared in this material"));
        assert!(
            slot.ty() == value.ty(),
            "uniform `{name}` holds {:?} but was written with {:?}",
            slot.ty(),
            value.ty()
        );
        *slot = value;
    }

    /// Read a uniform slot.
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// The declared type of a uniform slot.
    pub fn uniform_type(&self, name: &str) -> Option<UniformType> {
        self.uniforms.get(name).map(|v| v.ty())
    }

    /// Declare or replace an attribute slot.
    pub fn insert_attribute(&mut self, name: impl Into<String>, attribute: BufferAttribute) {
        self.attributes.insert(name.into(), attribute);
    }

    /// Read an attribute slot.
    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    /// Number of declared uniform slots.
    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    /// Number of declared attribute slots.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// A reusable visual style: shader pair + binding declarations + value store.
///
/// Shader sources and binding lists are fixed at construction; only the
/// value store changes afterwards, from external setters or from the
/// material's own [`Material::prerender`] hook.
pub trait Material {
    /// Human-readable material name, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Vertex shader source. Opaque to the scaffold.
    fn vertex_source(&self) -> &str;

    /// Fragment shader source. Opaque to the scaffold.
    fn fragment_source(&self) -> &str;

    /// Attribute bindings the shaders rely on.
    fn attribute_bindings(&self) -> Vec<AttributeBinding>;

    /// Uniform bindings the shaders rely on.
    fn uniform_bindings(&self) -> Vec<UniformBinding>;

    /// Primitive topology drawn with this material.
    fn topology(&self) -> PrimitiveTopology {
        PrimitiveTopology::Triangles
    }

    /// The material's value store.
    fn values(&self) -> &MaterialValues;

    /// Mutable access to the value store.
    fn values_mut(&mut self) -> &mut MaterialValues;

    /// Per-frame hook, invoked once per frame before the draw traversal.
    /// Use it to animate material-owned values.
    fn prerender(&mut self, _frame: &FrameState) {}
}
