//! # Shadelab Core
//!
//! GPU-agnostic foundation for the shadelab rendering scaffold:
//! math type aliases over `nalgebra`, node transforms, and CPU-side
//! mesh data with a few demo-friendly generators.

pub mod math;
pub mod mesh;
pub mod transform;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the core subsystem.
pub fn init() {
    log::info!("Shadelab Core v{} initialized", VERSION);
}
