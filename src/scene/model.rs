use crate::assets::GeometryHandle;
use crate::scene::component::Component;

/// Renderable geometry attached to a node.
///
/// The render layer draws every visible model once per frame using the
/// node's resolved world matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub geometry: GeometryHandle,
    pub visible: bool,
}

impl Model {
    #[must_use]
    pub fn new(geometry: GeometryHandle) -> Self {
        Self {
            geometry,
            visible: true,
        }
    }
}

impl Component for Model {}
