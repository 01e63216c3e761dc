//! Fixed perspective camera and per-frame input
//!
//! [`Scene`] owns the only mutable view state (framebuffer size and the
//! projection derived from it). Once per frame it produces a [`FrameInput`],
//! an immutable snapshot the renderer consumes.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Immutable view state for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Seconds since start-up
    pub elapsed: f32,
    /// Rotation about X, radians
    pub rotation_x: f32,
    /// Rotation about Y, radians
    pub rotation_y: f32,
    /// Translation along the view axis
    pub distance: f32,
    /// Projection matrix for the current framebuffer
    pub projection: Mat4,
}

impl FrameInput {
    /// Translate along the view axis, then rotate about X and Y
    pub fn model_view(&self) -> Mat4 {
        Mat4::translation(Vec3::new(0.0, 0.0, self.distance))
            * Mat4::rotation_x(self.rotation_x)
            * Mat4::rotation_y(self.rotation_y)
    }

    /// `projection * model_view`
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.model_view()
    }
}

/// Camera placement plus the projection for the current framebuffer
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    fov_y: f32,
    near: f32,
    far: f32,
    distance: f32,
    rotation_x: f32,
    rotation_y: f32,
    framebuffer: (u32, u32),
    projection: Mat4,
}

impl Scene {
    /// Build the scene for a framebuffer of `width` x `height` pixels
    pub fn new(camera: &CameraConfig, width: u32, height: u32) -> Self {
        let mut scene = Self {
            fov_y: utils::deg_to_rad(camera.fov_y_degrees),
            near: camera.near,
            far: camera.far,
            distance: camera.distance,
            rotation_x: camera.rotation_x,
            rotation_y: camera.rotation_y,
            framebuffer: (0, 0),
            projection: Mat4::identity(),
        };
        scene.resize(width, height);
        scene
    }

    /// Recompute the projection for a new framebuffer size
    ///
    /// A zero-sized framebuffer (minimised window) keeps the previous
    /// projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {width}x{height}");
            return;
        }
        self.framebuffer = (width, height);
        self.projection = Mat4::perspective_gl(self.fov_y, self.aspect(), self.near, self.far);
    }

    /// Width over height of the current framebuffer
    pub fn aspect(&self) -> f32 {
        let (width, height) = self.framebuffer;
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    /// Current framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer
    }

    /// Current projection matrix
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Snapshot for the frame rendered at `elapsed` seconds
    pub fn frame_input(&self, elapsed: f32) -> FrameInput {
        FrameInput {
            elapsed,
            rotation_x: self.rotation_x,
            rotation_y: self.rotation_y,
            distance: self.distance,
            projection: self.projection,
        }
    }
}
