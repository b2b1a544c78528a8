//! Scene Graph Module
//!
//! Manages the node hierarchy and the components attached to it:
//! - [`Node`]: hierarchy entity owning a component registry
//! - [`Transform`]: local translation / rotation / scale
//! - [`Camera`]: projection parameters
//! - [`Model`] and [`Light`]: render data consumed by the render layer
//! - [`Scene`]: arena that owns every node and enforces the tree invariant
//! - [`transform_system`]: per-frame global / view / projection matrix resolution

pub mod behavior;
pub mod camera;
pub mod commands;
pub mod component;
pub mod light;
pub mod model;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;
pub mod traversal;

pub use behavior::FnBehavior;
pub use camera::{Camera, ProjectionType};
pub use commands::{SceneCommand, SceneCommands};
pub use component::{Component, Components, UpdateContext, Updatable};
pub use light::Light;
pub use model::Model;
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to a node stored in a [`Scene`].
    pub struct NodeHandle;
}
