//! # Shadelab Graphics
//!
//! A minimal retained-mode scene scaffold with a declarative shader-binding
//! protocol. Materials declare *what* data their shaders need (from the
//! material's own value store, from the owning entity, or from the active
//! camera) without touching the graphics backend. The scene renderer
//! resolves those declarations against compiled program locations once per
//! material and feeds current values every frame.
//!
//! ## Overview
//!
//! - [`Material`] - Shader pair + binding declarations + owned value store
//! - [`RenderEntity`] - Scene-graph node: mesh + transform + attached material
//! - [`Scene`] - Entity tree, frame clock, lifecycle events, render loop
//! - [`RenderBackend`] - Backend boundary; [`HeadlessBackend`] for tests
//!
//! ## Example
//!
//! ```ignore
//! let camera = PerspectiveCamera::shared(eye, target, yfov, aspect, 1.0, 100.0);
//! let mut scene = Scene::new(camera);
//! let cube = RenderEntity::new()
//!     .with_mesh(Mesh::from_data(&generate_cube(2.0)))
//!     .with_material(materials::share(MyMaterial::new()));
//! scene.root_mut().add_child(cube);
//! scene.start_rendering();
//! // per scheduled frame callback:
//! scene.render_frame(&mut backend)?;
//! ```

pub mod backend;
pub mod buffer;
pub mod camera;
pub mod entity;
pub mod error;
pub mod materials;
pub mod mesh;
pub mod scene;
pub mod uniform;

// Re-export main types for convenience
pub use backend::{AttributeLocation, HeadlessBackend, ProgramHandle, RenderBackend,
    UniformLocation};
pub use buffer::{BufferAttribute, BufferDescriptor, BufferId, BufferUsage};
pub use camera::{Camera, PerspectiveCamera, SharedCamera};
pub use entity::RenderEntity;
pub use error::RenderError;
pub use materials::{AttributeBinding, CameraUniform, EntityUniform, Material, MaterialValues,
    SharedMaterial, UniformBinding};
pub use mesh::{IndexBuffer, Mesh};
pub use scene::{FrameState, LoopState, Scene, SceneEvents};
pub use uniform::{UniformType, UniformValue};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// This should be called before using any graphics functionality.
pub fn init() {
    log::info!("Shadelab Graphics v{} initialized", VERSION);
}
