//! Animation Module
//!
//! Time-driven behavior components that write into a node's [`Transform`](crate::scene::Transform):
//!
//! - [`RotateAnimator`]: spherical interpolation between two rotations
//! - [`LinearAnimator`]: linear interpolation between two translations
//!
//! Both sample the absolute scheduler time, so a tick that is skipped or
//! delayed never makes an animation drift.

pub mod animators;

pub use animators::{LinearAnimator, LoopMode, RotateAnimator};
