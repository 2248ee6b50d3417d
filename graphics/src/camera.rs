//! Camera contract and a basic perspective implementation.
//!
//! The render loop reads the active camera exactly once per frame through
//! camera binding resolution; it never mutates camera state. Parameter
//! changes are driven externally (UI, input handlers) and recompute the
//! matrices eagerly, so reads stay cheap.

use std::cell::RefCell;
use std::rc::Rc;

use shadelab_core::math::{look_at_rh, perspective_gl, Mat4, Vec3};

/// A camera shared between the scene and UI glue.
pub type SharedCamera = Rc<RefCell<dyn Camera>>;

/// Contract every camera implementation must satisfy.
pub trait Camera {
    /// Current world-space position.
    fn position(&self) -> Vec3;

    /// Current view matrix (column-major).
    fn view_matrix(&self) -> Mat4;

    /// Current projection matrix (column-major).
    fn projection_matrix(&self) -> Mat4;

    /// Update the aspect ratio, e.g. on canvas resize.
    fn set_aspect(&mut self, aspect: f32);
}

/// A look-at perspective camera.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    yfov: f32,
    aspect: f32,
    znear: f32,
    zfar: f32,
    view: Mat4,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Create a camera at `eye` looking at `target` with +Y up.
    pub fn new(eye: Vec3, target: Vec3, yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        let up = Vec3::new(0.0, 1.0, 0.0);
        Self {
            eye,
            target,
            up,
            yfov,
            aspect,
            znear,
            zfar,
            view: look_at_rh(&eye, &target, &up),
            projection: perspective_gl(yfov, aspect, znear, zfar),
        }
    }

    /// Create a camera already wrapped for scene attachment.
    pub fn shared(
        eye: Vec3,
        target: Vec3,
        yfov: f32,
        aspect: f32,
        znear: f32,
        zfar: f32,
    ) -> SharedCamera {
        Rc::new(RefCell::new(Self::new(eye, target, yfov, aspect, znear, zfar)))
    }

    /// Move the camera.
    pub fn set_position(&mut self, eye: Vec3) {
        self.eye = eye;
        self.recompute_view();
    }

    /// Change the look-at target.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.recompute_view();
    }

    /// Change the up vector.
    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.recompute_view();
    }

    /// Change the vertical field of view (radians).
    pub fn set_yfov(&mut self, yfov: f32) {
        self.yfov = yfov;
        self.recompute_projection();
    }

    /// Change the near/far clip distances.
    pub fn set_clip(&mut self, znear: f32, zfar: f32) {
        self.znear = znear;
        self.zfar = zfar;
        self.recompute_projection();
    }

    /// Current look-at target.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Current aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    fn recompute_view(&mut self) {
        self.view = look_at_rh(&self.eye, &self.target, &self.up);
    }

    fn recompute_projection(&mut self) {
        self.projection = perspective_gl(self.yfov, self.aspect, self.znear, self.zfar);
    }
}

impl Camera for PerspectiveCamera {
    fn position(&self) -> Vec3 {
        self.eye
    }

    fn view_matrix(&self) -> Mat4 {
        self.view
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.recompute_projection();
    }
}
