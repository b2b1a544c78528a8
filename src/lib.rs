//! # Trellis
//!
//! A minimal real-time 3D frame pipeline over a component-based scene graph.
//!
//! - [`scene`]: node hierarchy, components and the matrix resolver
//! - [`app::scheduler`]: the frame scheduler driving resize / update / render
//! - [`engine`]: scene plus render backend, driven by the scheduler
//! - [`renderer`]: the device boundary, with a wgpu backend behind the `wgpu` feature
//! - [`app::winit`]: desktop runner behind the `winit` feature

pub mod animation;
pub mod app;
pub mod assets;
pub mod engine;
pub mod errors;
pub mod renderer;
pub mod scene;
pub mod utils;

pub use animation::{LinearAnimator, LoopMode, RotateAnimator};
pub use app::{FrameHandler, FrameScheduler, FrameState, RefreshSignal, SchedulerState};
pub use assets::{Geometry, GeometryHandle, GeometryStore, SceneLoader, Vertex};
pub use engine::Engine;
pub use errors::{Result, TrellisError};
pub use renderer::{FrameSubmission, RenderBackend, RenderSettings, SurfaceSize};
pub use scene::{Camera, FnBehavior, Light, Model, Node, NodeHandle, Scene, Transform};
pub use utils::time::{Clock, ManualClock, SystemClock};

#[cfg(feature = "winit")]
pub use app::winit::{App, AppHandler};
