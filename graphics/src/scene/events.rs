//! Scene lifecycle events.
//!
//! Listeners are explicit callback registrations, invoked synchronously in
//! registration order within the frame callback, strictly before the draw
//! traversal. Frame state is passed as a parameter; there is no global
//! event bus.

use super::frame::FrameState;

/// Listener lists for the scene lifecycle.
#[derive(Default)]
pub struct SceneEvents {
    pre_render: Vec<Box<dyn FnMut(&FrameState)>>,
    resize: Vec<Box<dyn FnMut(u32, u32)>>,
}

impl SceneEvents {
    /// Create empty listener lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-render listener. Cameras update orbit state here;
    /// UI code can animate values before the draw traversal reads them.
    pub fn on_pre_render(&mut self, listener: impl FnMut(&FrameState) + 'static) {
        self.pre_render.push(Box::new(listener));
    }

    /// Register a resize listener, invoked with the new size in pixels.
    pub fn on_resize(&mut self, listener: impl FnMut(u32, u32) + 'static) {
        self.resize.push(Box::new(listener));
    }

    /// Number of registered pre-render listeners.
    pub fn pre_render_count(&self) -> usize {
        self.pre_render.len()
    }

    /// Number of registered resize listeners.
    pub fn resize_count(&self) -> usize {
        self.resize.len()
    }

    pub(crate) fn emit_pre_render(&mut self, frame: &FrameState) {
        for listener in &mut self.pre_render {
            listener(frame);
        }
    }

    pub(crate) fn emit_resize(&mut self, width: u32, height: u32) {
        for listener in &mut self.resize {
            listener(width, height);
        }
    }
}

impl std::fmt::Debug for SceneEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEvents")
            .field("pre_render", &self.pre_render.len())
            .field("resize", &self.resize.len())
            .finish()
    }
}
