//! Engine Core Module
//!
//! [`Engine`] ties the scene graph to a render backend. It holds no window
//! and no clock: a [`FrameScheduler`](crate::app::FrameScheduler) drives it
//! through the [`FrameHandler`] callbacks, so the same engine runs under the
//! winit frontend or under a test that ticks it by hand.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut engine = Engine::new(backend);
//! let camera = engine.scene.create_node(Node::new().with_component(Camera::default()));
//! engine.set_active_camera(camera)?;
//!
//! let mut scheduler = FrameScheduler::new(SystemClock::new(), signal);
//! scheduler.start();
//! // on every refresh callback:
//! scheduler.on_refresh(&mut engine)?;
//! ```

use crate::app::scheduler::FrameHandler;
use crate::assets::{GeometryStore, SceneLoader};
use crate::errors::{Result, TrellisError};
use crate::renderer::{FrameSubmission, RenderBackend, SurfaceSize, extract_frame};
use crate::scene::{Camera, NodeHandle, Scene};

/// Scene, geometry and render backend driven as one unit.
///
/// # Lifecycle
///
/// 1. Create with [`Engine::new`] and populate [`scene`](Self::scene)
/// 2. Choose the camera with [`Engine::set_active_camera`]
/// 3. Hand the engine to a scheduler, which calls `resize`, `update` and
///    `render` in that order each tick
pub struct Engine<B: RenderBackend> {
    pub scene: Scene,
    pub geometries: GeometryStore,
    backend: B,

    active_camera: Option<NodeHandle>,
    surface_size: Option<SurfaceSize>,

    time: f32,
    frame_count: u64,
}

impl<B: RenderBackend> Engine<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            scene: Scene::new(),
            geometries: GeometryStore::new(),
            backend,
            active_camera: None,
            surface_size: None,
            time: 0.0,
            frame_count: 0,
        }
    }

    /// Replaces the scene with one produced by `loader`.
    ///
    /// The first node carrying a [`Camera`] becomes the active camera.
    pub fn load_scene<L: SceneLoader + ?Sized>(&mut self, loader: &mut L) -> Result<()> {
        self.scene = loader.load_scene(&mut self.geometries)?;
        self.active_camera = None;

        if let Some(camera) = self.scene.find_component::<Camera>()? {
            self.set_active_camera(camera)?;
        } else {
            log::warn!("Loaded scene has no camera");
        }
        log::info!("Scene loaded: {} node(s)", self.scene.len());
        Ok(())
    }

    /// Selects the camera node used by [`render`](FrameHandler::render).
    ///
    /// The node must carry a [`Camera`]. Its aspect is synced to the last
    /// accepted surface size, if any.
    pub fn set_active_camera(&mut self, node: NodeHandle) -> Result<()> {
        let size = self.surface_size;
        let camera = self.camera_mut(node)?;
        if let Some(size) = size {
            camera.set_aspect_from_size(size.width, size.height)?;
        }
        self.active_camera = Some(node);
        Ok(())
    }

    #[must_use]
    pub fn active_camera(&self) -> Option<NodeHandle> {
        self.active_camera
    }

    /// Resolves the frame the next render would submit.
    pub fn extract(&self) -> Result<Option<FrameSubmission>> {
        self.active_camera
            .filter(|&camera| self.scene.contains(camera))
            .map(|camera| extract_frame(&self.scene, camera))
            .transpose()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Seconds since the scheduler started, as of the last update.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    #[must_use]
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.surface_size
    }

    /// Active camera, cleared first if its node has been removed from the scene.
    fn live_camera(&mut self) -> Option<NodeHandle> {
        let camera = self.active_camera?;
        if self.scene.contains(camera) {
            return Some(camera);
        }
        log::warn!("Active camera {camera:?} was removed from the scene");
        self.active_camera = None;
        None
    }

    fn camera_mut(&mut self, node: NodeHandle) -> Result<&mut Camera> {
        if !self.scene.contains(node) {
            return Err(TrellisError::NodeNotFound(node));
        }
        self.scene
            .get_component_mut::<Camera>(node)
            .ok_or(TrellisError::MissingComponent {
                node,
                kind: "Camera",
            })
    }
}

impl<B: RenderBackend> FrameHandler for Engine<B> {
    fn update(&mut self, time: f32, dt: f32) -> Result<()> {
        self.time = time;
        self.frame_count += 1;
        self.scene.update(time, dt)
    }

    fn render(&mut self) -> Result<()> {
        let Some(camera) = self.live_camera() else {
            log::trace!("No active camera, skipping render");
            return Ok(());
        };
        let frame = extract_frame(&self.scene, camera)?;
        self.backend.submit(&frame, &self.geometries)
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        let size = size.validate()?;
        self.backend.resize(size)?;

        if let Some(camera) = self.live_camera() {
            self.camera_mut(camera)?
                .set_aspect_from_size(size.width, size.height)?;
        }
        self.surface_size = Some(size);
        Ok(())
    }
}
