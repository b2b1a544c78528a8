use slotmap::SlotMap;

use crate::assets::GeometryHandle;
use crate::assets::geometry::Geometry;

/// Arena of geometries.
///
/// The core runs on one thread, so the store is a plain slot map owned by
/// the engine; the render layer borrows it immutably while drawing.
#[derive(Debug, Default)]
pub struct GeometryStore {
    map: SlotMap<GeometryHandle, Geometry>,
}

impl GeometryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a geometry and returns its handle.
    pub fn add(&mut self, geometry: impl Into<Geometry>) -> GeometryHandle {
        self.map.insert(geometry.into())
    }

    #[must_use]
    pub fn get(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.map.get(handle)
    }

    pub fn remove(&mut self, handle: GeometryHandle) -> Option<Geometry> {
        self.map.remove(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeometryHandle, &Geometry)> {
        self.map.iter()
    }
}
