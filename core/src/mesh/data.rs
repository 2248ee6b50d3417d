//! CPU-side mesh data structures.
//!
//! A [`MeshData`] is the GPU-agnostic representation of a mesh: a set of
//! named float attribute arrays plus optional indices. Attribute names are
//! the shader-facing names the rendering scaffold resolves against
//! (`a_Position`, `a_Normal`, ...), so geometry stays an opaque collection
//! of buffers keyed by name.

/// Canonical name of the vertex position attribute.
pub const ATTRIBUTE_POSITION: &str = "a_Position";

/// Canonical name of the vertex normal attribute.
pub const ATTRIBUTE_NORMAL: &str = "a_Normal";

/// Canonical name of the per-vertex color attribute.
pub const ATTRIBUTE_COLOR: &str = "a_Color";

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    Points,
    /// Every two vertices form a line.
    Lines,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Vertices form a closed loop of lines.
    LineLoop,
    /// Every three vertices form a triangle.
    #[default]
    Triangles,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
    /// Vertices form a fan of triangles around the first vertex.
    TriangleFan,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::Points => Some(1),
            Self::Lines => Some(2),
            Self::Triangles => Some(3),
            Self::LineStrip | Self::LineLoop | Self::TriangleStrip | Self::TriangleFan => None,
        }
    }
}

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// Index storage for a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexData {
    /// 16-bit indices.
    U16(Vec<u16>),
    /// 32-bit indices.
    U32(Vec<u32>),
}

impl IndexData {
    /// The format of the stored indices.
    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::Uint16,
            Self::U32(_) => IndexFormat::Uint32,
        }
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    /// Whether the index list is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw index bytes in the stored format.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// One named per-vertex attribute array.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeData {
    /// Flat float data, `components` values per vertex.
    pub data: Vec<f32>,
    /// Number of float components per vertex (1..=4).
    pub components: u32,
}

impl AttributeData {
    /// Create a new attribute array.
    pub fn new(components: u32, data: Vec<f32>) -> Self {
        Self { data, components }
    }

    /// Number of vertices described by this attribute.
    pub fn vertex_count(&self) -> u32 {
        if self.components == 0 {
            0
        } else {
            (self.data.len() / self.components as usize) as u32
        }
    }
}

/// A CPU-side mesh holding named attribute arrays and optional indices.
///
/// # Example
///
/// ```
/// use shadelab_core::mesh::{MeshData, ATTRIBUTE_POSITION};
///
/// let triangle = MeshData::new()
///     .with_attribute(ATTRIBUTE_POSITION, 3, vec![
///         0.0, 0.5, 0.0,
///         -0.5, -0.5, 0.0,
///         0.5, -0.5, 0.0,
///     ]);
/// assert_eq!(triangle.vertex_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    topology: PrimitiveTopology,
    attributes: Vec<(String, AttributeData)>,
    indices: Option<IndexData>,
    label: Option<String>,
}

impl MeshData {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primitive topology.
    #[must_use]
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Add a named attribute array with the given component count.
    ///
    /// All attributes of one mesh must describe the same number of vertices.
    #[must_use]
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        components: u32,
        data: Vec<f32>,
    ) -> Self {
        let name = name.into();
        let attribute = AttributeData::new(components, data);
        debug_assert!(
            self.attributes
                .iter()
                .all(|(_, a)| a.vertex_count() == attribute.vertex_count()),
            "attribute `{name}` disagrees on vertex count"
        );
        self.attributes.push((name, attribute));
        self
    }

    /// Set index data as u16 indices.
    #[must_use]
    pub fn with_indices_u16(mut self, indices: Vec<u16>) -> Self {
        self.indices = Some(IndexData::U16(indices));
        self
    }

    /// Set index data as u32 indices.
    #[must_use]
    pub fn with_indices_u32(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(IndexData::U32(indices));
        self
    }

    /// Set a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Look up an attribute array by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeData> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a)
    }

    /// Iterate over all `(name, attribute)` pairs in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeData)> {
        self.attributes.iter().map(|(n, a)| (n.as_str(), a))
    }

    /// Get the index data, if any.
    pub fn indices(&self) -> Option<&IndexData> {
        self.indices.as_ref()
    }

    /// Whether this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of vertices, taken from the first attribute array.
    pub fn vertex_count(&self) -> u32 {
        self.attributes
            .first()
            .map(|(_, a)| a.vertex_count())
            .unwrap_or(0)
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_vertices() {
        assert_eq!(PrimitiveTopology::Points.vertices_per_primitive(), Some(1));
        assert_eq!(PrimitiveTopology::Lines.vertices_per_primitive(), Some(2));
        assert_eq!(
            PrimitiveTopology::Triangles.vertices_per_primitive(),
            Some(3)
        );
        assert_eq!(PrimitiveTopology::LineLoop.vertices_per_primitive(), None);
        assert_eq!(
            PrimitiveTopology::TriangleFan.vertices_per_primitive(),
            None
        );
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint16.size(), 2);
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }

    #[test]
    fn test_index_data_bytes() {
        let idx = IndexData::U16(vec![0, 1, 2]);
        assert_eq!(idx.format(), IndexFormat::Uint16);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.as_bytes().len(), 6);

        let idx = IndexData::U32(vec![0, 1, 2]);
        assert_eq!(idx.as_bytes().len(), 12);
    }

    #[test]
    fn test_mesh_data_lookup() {
        let mesh = MeshData::new()
            .with_attribute(ATTRIBUTE_POSITION, 3, vec![0.0; 12])
            .with_attribute(ATTRIBUTE_COLOR, 3, vec![1.0; 12])
            .with_indices_u16(vec![0, 1, 2, 2, 3, 0])
            .with_label("quad");

        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.is_indexed());
        assert_eq!(mesh.attribute(ATTRIBUTE_POSITION).unwrap().components, 3);
        assert!(mesh.attribute(ATTRIBUTE_NORMAL).is_none());
        assert_eq!(mesh.label(), Some("quad"));
        assert_eq!(mesh.attributes().count(), 2);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshData::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.topology(), PrimitiveTopology::Triangles);
    }
}
