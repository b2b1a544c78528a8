use glam::Mat4;

use crate::errors::{Result, TrellisError};
use crate::scene::component::Component;

/// Camera projection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

/// Camera component.
///
/// Holds projection parameters only. Where the camera sits and looks is
/// decided by the [`Transform`](crate::scene::Transform) of its node; the view
/// matrix is resolved from the hierarchy each frame by
/// [`transform_system`](crate::scene::transform_system).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub projection_type: ProjectionType,
    /// Vertical field of view in radians (perspective).
    pub fovy: f32,
    /// Width / height of the render target.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Half of the visible height (orthographic).
    pub halfy: f32,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection_type: ProjectionType::Perspective,
            fovy,
            aspect,
            near,
            far,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn new_orthographic(halfy: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection_type: ProjectionType::Orthographic,
            halfy,
            aspect,
            near,
            far,
            ..Self::default()
        }
    }

    /// Projection matrix for the current parameters.
    ///
    /// Right-handed, depth mapped to `[0, 1]` as wgpu expects.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_type {
            ProjectionType::Perspective => {
                Mat4::perspective_rh(self.fovy, self.aspect, self.near, self.far)
            }
            ProjectionType::Orthographic => {
                let h = self.halfy;
                let w = h * self.aspect;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Updates the aspect ratio from a render-target size.
    ///
    /// Rejects sizes with a zero dimension, leaving the aspect untouched.
    pub fn set_aspect_from_size(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(TrellisError::InvalidSurfaceSize { width, height });
        }
        self.aspect = width as f32 / height as f32;
        Ok(())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection_type: ProjectionType::Perspective,
            fovy: 1.0,
            aspect: 1.0,
            near: 0.01,
            far: 1000.0,
            halfy: 1.0,
        }
    }
}

impl Component for Camera {}
