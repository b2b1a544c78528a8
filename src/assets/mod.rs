//! Asset Module
//!
//! CPU-side geometry storage and the loader boundary.
//!
//! - [`Geometry`]: interleaved vertex data plus `u32` indices
//! - [`GeometryStore`]: arena of geometries addressed by [`GeometryHandle`]
//! - [`SceneLoader`]: implemented by external importers that turn an asset
//!   description into a populated [`Scene`](crate::scene::Scene)
//!
//! Asset formats are not parsed here. Loading must complete before the
//! resulting nodes are attached to a live scene.

pub mod geometry;
pub mod storage;

pub use geometry::{Geometry, Vertex};
pub use storage::GeometryStore;

use slotmap::new_key_type;

use crate::errors::Result;
use crate::scene::Scene;

new_key_type! {
    /// Handle to a [`Geometry`] stored in a [`GeometryStore`].
    pub struct GeometryHandle;
}

/// Produces a populated scene graph from an external asset description.
///
/// Implementations register any geometry they create in `geometries` and
/// attach [`Model`](crate::scene::Model) components referencing the returned
/// handles.
pub trait SceneLoader {
    fn load_scene(&mut self, geometries: &mut GeometryStore) -> Result<Scene>;
}
