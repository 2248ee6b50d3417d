//! Shared raw buffers and attribute slices.
//!
//! A [`BufferDescriptor`] owns raw bytes destined for the graphics backend.
//! Descriptors are shared by reference count (`Rc`): several
//! [`BufferAttribute`]s may slice one descriptor (interleaved or repeated
//! layouts). The backend uploads each descriptor lazily, at most once; a
//! re-upload happens only after the owning code explicitly marks the
//! descriptor dirty. The dirty/uploaded state lives on the descriptor, not
//! on the attributes that alias it.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

bitflags! {
    /// Usage flags for buffers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Buffer can be used as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Buffer can be used as an index buffer.
        const INDEX = 1 << 1;
    }
}

impl Default for BufferUsage {
    fn default() -> Self {
        Self::VERTEX
    }
}

/// Unique identity of a buffer descriptor, stable for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

impl BufferId {
    fn allocate() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A shared raw data buffer uploaded to the backend at most once.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use shadelab_graphics::{BufferAttribute, BufferDescriptor, BufferUsage};
///
/// let reflections = Rc::new(BufferDescriptor::from_f32(
///     &[0.4, 0.4, 1.0, 1.0, 0.4, 0.4],
///     BufferUsage::VERTEX,
/// ));
/// let ambient = BufferAttribute::new(Rc::clone(&reflections), 3);
/// let diffuse = BufferAttribute::new(Rc::clone(&reflections), 3);
/// assert_eq!(ambient.descriptor().id(), diffuse.descriptor().id());
/// ```
#[derive(Debug)]
pub struct BufferDescriptor {
    id: BufferId,
    usage: BufferUsage,
    data: RefCell<Vec<u8>>,
    dirty: Cell<bool>,
    label: Option<String>,
}

impl BufferDescriptor {
    /// Create a descriptor owning the given bytes. Starts dirty, so the
    /// first use uploads it.
    pub fn new(data: Vec<u8>, usage: BufferUsage) -> Self {
        Self {
            id: BufferId::allocate(),
            usage,
            data: RefCell::new(data),
            dirty: Cell::new(true),
            label: None,
        }
    }

    /// Create a descriptor from float data.
    pub fn from_f32(values: &[f32], usage: BufferUsage) -> Self {
        Self::new(bytemuck::cast_slice(values).to_vec(), usage)
    }

    /// Create a descriptor from u16 data (index buffers).
    pub fn from_u16(values: &[u16], usage: BufferUsage) -> Self {
        Self::new(bytemuck::cast_slice(values).to_vec(), usage)
    }

    /// Create a descriptor from u32 data (index buffers).
    pub fn from_u32(values: &[u32], usage: BufferUsage) -> Self {
        Self::new(bytemuck::cast_slice(values).to_vec(), usage)
    }

    /// Set a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Unique identity of this descriptor.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Usage flags.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Debug label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Current byte length.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the backend must (re-)upload this descriptor on next use.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Request a re-upload on next use without changing the contents.
    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Called by the backend once the contents have been uploaded.
    pub fn mark_clean(&self) {
        self.dirty.set(false);
    }

    /// Replace the buffer contents and mark it dirty.
    pub fn write(&self, data: Vec<u8>) {
        *self.data.borrow_mut() = data;
        self.dirty.set(true);
    }

    /// Replace the buffer contents with float data and mark it dirty.
    pub fn write_f32(&self, values: &[f32]) {
        self.write(bytemuck::cast_slice(values).to_vec());
    }

    /// Borrow the raw bytes (backend reads during upload).
    pub fn bytes(&self) -> Ref<'_, Vec<u8>> {
        self.data.borrow()
    }
}

/// A per-vertex slice of a shared [`BufferDescriptor`].
///
/// `components` float values are read per vertex, starting `offset` bytes
/// into the buffer and advancing `stride` bytes per vertex (0 = tightly
/// packed).
#[derive(Debug, Clone)]
pub struct BufferAttribute {
    descriptor: Rc<BufferDescriptor>,
    components: u32,
    offset: usize,
    stride: usize,
}

impl BufferAttribute {
    /// Create a tightly packed attribute over the whole descriptor.
    pub fn new(descriptor: Rc<BufferDescriptor>, components: u32) -> Self {
        Self {
            descriptor,
            components,
            offset: 0,
            stride: 0,
        }
    }

    /// Set the byte offset of the first vertex.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Set the byte stride between consecutive vertices.
    #[must_use]
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// The shared descriptor this attribute slices.
    pub fn descriptor(&self) -> &Rc<BufferDescriptor> {
        &self.descriptor
    }

    /// Float components per vertex.
    pub fn components(&self) -> u32 {
        self.components
    }

    /// Byte offset of the first vertex.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte stride between vertices (0 = tightly packed).
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of vertices this slice describes.
    pub fn vertex_count(&self) -> u32 {
        let available = self.descriptor.len().saturating_sub(self.offset);
        let per_vertex = if self.stride > 0 {
            self.stride
        } else {
            self.components as usize * 4
        };
        if per_vertex == 0 {
            0
        } else {
            (available / per_vertex) as u32
        }
    }
}
