//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`TrellisError`] covers the failure modes of the core:
//! - Structural errors rejected when the hierarchy is edited
//! - Cyclic hierarchies discovered while walking the scene
//! - Required components that are missing (e.g. an active camera without a `Camera`)
//! - Device and windowing failures surfaced by the optional render layer
//!
//! Plain component lookups are *not* errors; they return `Option`.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, TrellisError>`.
//!
//! ```rust,ignore
//! use trellis::errors::{TrellisError, Result};
//!
//! fn build(scene: &mut Scene, parent: NodeHandle, child: NodeHandle) -> Result<()> {
//!     scene.add_child(parent, child)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::NodeHandle;

/// The main error type for the engine.
#[derive(Error, Debug)]
pub enum TrellisError {
    // ========================================================================
    // Scene Graph Errors
    // ========================================================================
    /// Attaching `child` under `parent` would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// The node that was to become the parent
        parent: NodeHandle,
        /// The node that was to become the child
        child: NodeHandle,
    },

    /// A node was attached to itself.
    #[error("node {0:?} cannot be attached to itself")]
    SelfAttachment(NodeHandle),

    /// The child already has a parent; detach it first.
    #[error("node {child:?} already has parent {parent:?}")]
    AlreadyParented {
        /// The node being attached
        child: NodeHandle,
        /// Its current parent
        parent: NodeHandle,
    },

    /// The handle does not refer to a live node.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// A cycle was found while walking the hierarchy. Traversal was halted.
    #[error("cyclic hierarchy detected at node {0:?}")]
    CyclicHierarchy(NodeHandle),

    /// A component the caller requires is not attached to the node.
    #[error("node {node:?} has no {kind} component")]
    MissingComponent {
        /// The node that was queried
        node: NodeHandle,
        /// Type name of the missing component
        kind: &'static str,
    },

    /// The geometry handle does not refer to a live geometry.
    #[error("geometry not found")]
    GeometryNotFound,

    // ========================================================================
    // Device & Surface Errors
    // ========================================================================
    /// A resize reported a size that cannot back a render target.
    #[error("invalid surface size {width}x{height}")]
    InvalidSurfaceSize {
        /// Reported width in pixels
        width: u32,
        /// Reported height in pixels
        height: u32,
    },

    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[cfg(feature = "wgpu")]
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create the window surface.
    #[cfg(feature = "wgpu")]
    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// Failed to acquire the next swapchain texture.
    #[cfg(feature = "wgpu")]
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation error (winit).
    #[cfg(feature = "winit")]
    #[error("Window creation error: {0}")]
    WindowCreate(#[from] winit::error::OsError),
}

/// Alias for `Result<T, TrellisError>`.
pub type Result<T> = std::result::Result<T, TrellisError>;
