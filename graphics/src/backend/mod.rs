//! Rendering backend abstraction.
//!
//! The scaffold pushes resolved binding values through the [`RenderBackend`]
//! trait and never touches a graphics API directly. A backend compiles and
//! links shader programs, reports which uniform/attribute names the linked
//! program actually exposes, uploads shared buffers lazily (tracking the
//! descriptor dirty flag), and issues draw calls.
//!
//! [`HeadlessBackend`] performs no GPU work; it introspects shader source,
//! records uploads and draws, and backs the test suite and benches.

mod headless;

pub use headless::{DrawCall, HeadlessBackend};

use shadelab_core::mesh::{IndexFormat, PrimitiveTopology};

use crate::buffer::{BufferAttribute, BufferDescriptor};
use crate::error::RenderError;
use crate::uniform::UniformValue;

/// Handle to a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub(crate) u32);

/// Resolved location of an active uniform within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub(crate) u32);

/// Resolved slot of an active vertex attribute within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub(crate) u32);

/// Backend boundary the scene renderer drives.
///
/// All failures are fatal: shader and resource errors surface immediately
/// as [`RenderError`] and are never retried.
pub trait RenderBackend {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Compile and link a program from a vertex/fragment source pair.
    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, RenderError>;

    /// Names of uniforms active in the linked program.
    fn active_uniforms(&self, program: ProgramHandle) -> Vec<String>;

    /// Names of vertex attributes active in the linked program.
    fn active_attributes(&self, program: ProgramHandle) -> Vec<String>;

    /// Location of an active uniform, or `None` when the program does not
    /// expose the name.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Slot of an active attribute, or `None` when the program does not
    /// expose the name.
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<AttributeLocation>;

    /// Make a program current for subsequent uniform writes and draws.
    fn use_program(&mut self, program: ProgramHandle);

    /// Upload a shared buffer. No-op when the descriptor is already
    /// uploaded and not dirty; clears the dirty flag after uploading.
    fn upload_buffer(&mut self, descriptor: &BufferDescriptor) -> Result<(), RenderError>;

    /// Point an attribute slot at a slice of an uploaded buffer.
    fn bind_attribute(&mut self, location: AttributeLocation, attribute: &BufferAttribute);

    /// Bind an uploaded buffer as the index buffer.
    fn bind_index_buffer(&mut self, descriptor: &BufferDescriptor);

    /// Write a uniform value into a location of the current program.
    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue);

    /// Clear the color and depth targets.
    fn clear(&mut self, color: [f32; 4]);

    /// Draw non-indexed vertices with the given topology.
    fn draw_arrays(&mut self, topology: PrimitiveTopology, vertex_count: u32);

    /// Draw indexed vertices with the given topology.
    fn draw_indexed(&mut self, topology: PrimitiveTopology, format: IndexFormat, index_count: u32);
}
