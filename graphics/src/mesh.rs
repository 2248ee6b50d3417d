//! Backend-facing mesh: named attribute slices over shared buffers.
//!
//! A [`Mesh`] is built once from CPU-side [`MeshData`]: every named
//! attribute array becomes a [`BufferAttribute`] over its own
//! [`BufferDescriptor`], and indices become an INDEX-usage descriptor.
//! Descriptors upload lazily on first draw.

use std::collections::HashMap;
use std::rc::Rc;

use shadelab_core::mesh::{IndexData, IndexFormat, MeshData, PrimitiveTopology};

use crate::buffer::{BufferAttribute, BufferDescriptor, BufferUsage};

/// Index buffer of a mesh.
#[derive(Debug, Clone)]
pub struct IndexBuffer {
    descriptor: Rc<BufferDescriptor>,
    format: IndexFormat,
    count: u32,
}

impl IndexBuffer {
    /// Create an index buffer from index data.
    pub fn from_data(indices: &IndexData) -> Self {
        let descriptor = match indices {
            IndexData::U16(values) => BufferDescriptor::from_u16(values, BufferUsage::INDEX),
            IndexData::U32(values) => BufferDescriptor::from_u32(values, BufferUsage::INDEX),
        };
        Self {
            descriptor: Rc::new(descriptor),
            format: indices.format(),
            count: indices.len() as u32,
        }
    }

    /// The shared descriptor holding the index bytes.
    pub fn descriptor(&self) -> &Rc<BufferDescriptor> {
        &self.descriptor
    }

    /// Index format.
    pub fn format(&self) -> IndexFormat {
        self.format
    }

    /// Number of indices.
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Geometry attached to a render entity.
#[derive(Debug, Default)]
pub struct Mesh {
    attributes: HashMap<String, BufferAttribute>,
    indices: Option<IndexBuffer>,
    vertex_count: u32,
    topology: PrimitiveTopology,
    label: Option<String>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from CPU-side data, creating one buffer descriptor per
    /// named attribute plus one for the indices.
    pub fn from_data(data: &MeshData) -> Self {
        let mut attributes = HashMap::new();
        for (name, attribute) in data.attributes() {
            let descriptor = Rc::new(
                BufferDescriptor::from_f32(&attribute.data, BufferUsage::VERTEX)
                    .with_label(name.to_string()),
            );
            attributes.insert(
                name.to_string(),
                BufferAttribute::new(descriptor, attribute.components),
            );
        }
        Self {
            attributes,
            indices: data.indices().map(IndexBuffer::from_data),
            vertex_count: data.vertex_count(),
            topology: data.topology(),
            label: data.label().map(str::to_string),
        }
    }

    /// Add or replace a named attribute slice.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: BufferAttribute) -> Self {
        let vertex_count = attribute.vertex_count();
        self.attributes.insert(name.into(), attribute);
        if self.vertex_count == 0 {
            self.vertex_count = vertex_count;
        }
        self
    }

    /// Look up an attribute slice by name.
    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    /// Iterate over `(name, attribute)` pairs.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &BufferAttribute)> {
        self.attributes.iter().map(|(n, a)| (n.as_str(), a))
    }

    /// The index buffer, if indexed.
    pub fn indices(&self) -> Option<&IndexBuffer> {
        self.indices.as_ref()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Topology the source geometry was authored for.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Debug label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
