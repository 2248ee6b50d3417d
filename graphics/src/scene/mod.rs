//! Scene and render loop.
//!
//! A [`Scene`] owns the entity tree, the active camera, the frame clock,
//! and the lifecycle listener lists. The loop is cooperative: an external
//! scheduler calls [`Scene::render_frame`] once per display refresh, and a
//! stop request takes effect at the next scheduling point: a frame already
//! in flight completes, a frame not yet started is never drawn.

mod events;
mod frame;
mod renderer;

pub use events::SceneEvents;
pub use frame::{FrameClock, FrameState};

use std::rc::Rc;

use renderer::{CameraState, Renderer};

use crate::backend::RenderBackend;
use crate::camera::SharedCamera;
use crate::entity::RenderEntity;
use crate::error::RenderError;

/// Render loop state.
///
/// Transitions: Idle → Running (start), Running → Stopped (stop or
/// context loss). A Stopped scene never runs again; construct a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not yet started.
    Idle,
    /// Frames are drawn on every scheduled callback.
    Running,
    /// Stopped for good.
    Stopped,
}

/// A scene: entity tree + active camera + frame clock + render loop.
pub struct Scene {
    root: RenderEntity,
    camera: SharedCamera,
    events: SceneEvents,
    clock: FrameClock,
    state: LoopState,
    renderer: Renderer,
    clear_color: [f32; 4],
    frame_count: u64,
    pending_resize: Option<(u32, u32)>,
}

impl Scene {
    /// Create a scene rendered through the given camera.
    pub fn new(camera: SharedCamera) -> Self {
        Self {
            root: RenderEntity::new().with_name("root"),
            camera,
            events: SceneEvents::new(),
            clock: FrameClock::new(),
            state: LoopState::Idle,
            renderer: Renderer::new(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            frame_count: 0,
            pending_resize: None,
        }
    }

    /// Set the clear color.
    #[must_use]
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// The root entity.
    pub fn root(&self) -> &RenderEntity {
        &self.root
    }

    /// Mutable access to the root entity (add children, move things).
    pub fn root_mut(&mut self) -> &mut RenderEntity {
        &mut self.root
    }

    /// The active camera handle.
    pub fn camera(&self) -> &SharedCamera {
        &self.camera
    }

    /// The lifecycle listener lists.
    pub fn events(&self) -> &SceneEvents {
        &self.events
    }

    /// Register lifecycle listeners.
    pub fn events_mut(&mut self) -> &mut SceneEvents {
        &mut self.events
    }

    /// Current loop state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether frames are currently drawn.
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Number of frames drawn so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Transition Idle → Running and zero the frame clock.
    ///
    /// Starting an already-running scene is a no-op; a Stopped scene
    /// cannot be restarted.
    pub fn start_rendering(&mut self) {
        match self.state {
            LoopState::Idle => {
                self.clock.start();
                self.state = LoopState::Running;
                log::info!("render loop started");
            }
            LoopState::Running => log::warn!("render loop is already running"),
            LoopState::Stopped => {
                log::warn!("a stopped scene cannot be restarted; construct a new one")
            }
        }
    }

    /// Stop the loop. Takes effect at the next scheduling point; an
    /// in-flight frame is not interrupted.
    pub fn stop_rendering(&mut self) {
        if self.state != LoopState::Stopped {
            self.state = LoopState::Stopped;
            log::info!("render loop stopped after {} frames", self.frame_count);
        }
    }

    /// Record a canvas resize. Applied between frames: the camera aspect
    /// and resize listeners run at the start of the next frame, never
    /// mid-traversal.
    pub fn notify_resize(&mut self, width: u32, height: u32) {
        self.pending_resize = Some((width, height));
    }

    /// Draw one frame using the internal clock. The scheduled frame
    /// callback: a no-op unless the loop is Running.
    pub fn render_frame(&mut self, backend: &mut dyn RenderBackend) -> Result<(), RenderError> {
        if self.state != LoopState::Running {
            log::trace!("render_frame skipped: loop is {:?}", self.state);
            return Ok(());
        }
        let frame = self.clock.tick();
        self.frame(backend, frame)
    }

    /// Draw one frame with a scheduler-supplied timestamp in milliseconds.
    pub fn render_frame_at(
        &mut self,
        backend: &mut dyn RenderBackend,
        time_ms: f64,
    ) -> Result<(), RenderError> {
        if self.state != LoopState::Running {
            log::trace!("render_frame skipped: loop is {:?}", self.state);
            return Ok(());
        }
        let frame = self.clock.tick_at(time_ms);
        self.frame(backend, frame)
    }

    fn frame(
        &mut self,
        backend: &mut dyn RenderBackend,
        frame: FrameState,
    ) -> Result<(), RenderError> {
        if let Some((width, height)) = self.pending_resize.take() {
            if height > 0 {
                self.camera
                    .borrow_mut()
                    .set_aspect(width as f32 / height as f32);
            }
            self.events.emit_resize(width, height);
        }

        self.events.emit_pre_render(&frame);

        let mut seen = Vec::new();
        run_prerender_hooks(&self.root, &frame, &mut seen);

        backend.clear(self.clear_color);

        let camera_state = {
            let camera = self.camera.borrow();
            CameraState {
                view: camera.view_matrix(),
                projection: camera.projection_matrix(),
                position: camera.position(),
            }
        };
        self.renderer.draw_tree(&mut self.root, &camera_state, backend)?;

        self.frame_count += 1;
        Ok(())
    }
}

/// Invoke each attached material's prerender hook once per frame, even
/// when one material instance is shared by several entities.
fn run_prerender_hooks(entity: &RenderEntity, frame: &FrameState, seen: &mut Vec<*const ()>) {
    if let Some(material) = entity.material() {
        let identity = Rc::as_ptr(material).cast::<()>();
        if !seen.contains(&identity) {
            seen.push(identity);
            material.borrow_mut().prerender(frame);
        }
    }
    for child in entity.children() {
        run_prerender_hooks(child, frame, seen);
    }
}
