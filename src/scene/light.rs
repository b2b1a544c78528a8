use glam::Vec3;

use crate::scene::component::Component;

/// Point light component.
///
/// The light is positioned by its node's world matrix. `ambient` is the
/// fraction of the color that reaches surfaces regardless of distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub ambient: f32,
}

impl Light {
    #[must_use]
    pub fn new(color: Vec3, ambient: f32) -> Self {
        Self { color, ambient }
    }

    #[must_use]
    pub fn with_ambient(ambient: f32) -> Self {
        Self {
            ambient,
            ..Self::default()
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            ambient: 0.0,
        }
    }
}

impl Component for Light {}
