//! Renderer Module
//!
//! Boundary between the scene core and the graphics device.
//!
//! Each frame the core resolves world matrices once and packs everything the
//! device needs into a [`FrameSubmission`]: the view and projection of the
//! active camera plus one [`DrawItem`] per visible model. A [`RenderBackend`]
//! consumes the submission; buffer allocation, pipelines and command encoding
//! stay behind that trait.
//!
//! - [`extract_frame`]: scene + camera → [`FrameSubmission`]
//! - [`RenderBackend`]: implemented by [`wgpu::ForwardRenderer`] (feature `wgpu`)
//!   and by test doubles
//! - [`RenderSettings`]: device configuration

pub mod settings;

#[cfg(feature = "wgpu")]
pub mod wgpu;

pub use settings::RenderSettings;

use glam::{Mat4, Vec3};

use crate::assets::{GeometryHandle, GeometryStore};
use crate::errors::{Result, TrellisError};
use crate::scene::light::Light;
use crate::scene::model::Model;
use crate::scene::{NodeHandle, Scene, transform_system};

/// Drawable size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A surface can only be configured with non-zero dimensions.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Errors with [`TrellisError::InvalidSurfaceSize`] for a zero dimension.
    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(TrellisError::InvalidSurfaceSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// One model to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeHandle,
    pub geometry: GeometryHandle,
    /// Global matrix of the model node.
    pub model_matrix: Mat4,
    /// `projection * view * model`.
    pub mvp: Mat4,
}

/// Light parameters resolved to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightData {
    pub position: Vec3,
    pub color: Vec3,
    pub ambient: f32,
}

/// Everything the device layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSubmission {
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    pub light: Option<LightData>,
    /// Visible models in scene pre-order.
    pub draws: Vec<DrawItem>,
}

impl FrameSubmission {
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}

/// Device layer consumed by the engine.
pub trait RenderBackend {
    /// Recreates size-dependent resources (surface, depth buffer).
    fn resize(&mut self, size: SurfaceSize) -> Result<()>;

    /// Uploads the frame's matrices and issues one draw per [`DrawItem`].
    ///
    /// All draws must be submitted before returning.
    fn submit(&mut self, frame: &FrameSubmission, geometries: &GeometryStore) -> Result<()>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        (**self).resize(size)
    }

    fn submit(&mut self, frame: &FrameSubmission, geometries: &GeometryStore) -> Result<()> {
        (**self).submit(frame, geometries)
    }
}

/// Resolves matrices for `camera` and collects every visible model.
///
/// World matrices are computed fresh in a single pass over the hierarchy. The
/// first [`Light`] in pre-order, if any, is carried along.
pub fn extract_frame(scene: &Scene, camera: NodeHandle) -> Result<FrameSubmission> {
    let world = scene.resolve_world_matrices()?;

    let camera_world = world
        .get(camera)
        .copied()
        .ok_or(TrellisError::NodeNotFound(camera))?;
    let view_matrix = camera_world.inverse();
    let projection_matrix = transform_system::projection_matrix(scene.nodes(), camera)?;
    let view_projection = projection_matrix * view_matrix;

    let mut light = None;
    let mut draws = Vec::new();

    for item in scene.iter() {
        let (handle, node) = item?;
        let Some(&model_matrix) = world.get(handle) else {
            continue;
        };

        if let Some(model) = node.get_component::<Model>()
            && model.visible
        {
            draws.push(DrawItem {
                node: handle,
                geometry: model.geometry,
                model_matrix,
                mvp: view_projection * model_matrix,
            });
        }

        if light.is_none()
            && let Some(l) = node.get_component::<Light>()
        {
            light = Some(LightData {
                position: model_matrix.w_axis.truncate(),
                color: l.color,
                ambient: l.ambient,
            });
        }
    }

    log::trace!("Extracted {} draw(s)", draws.len());

    Ok(FrameSubmission {
        view_matrix,
        projection_matrix,
        light,
        draws,
    })
}
