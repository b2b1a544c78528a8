//! Closure-backed behaviors.
//!
//! [`FnBehavior`] lets host code attach inline per-frame logic to a node
//! without declaring a dedicated component type.
//!
//! ```rust,ignore
//! let cube = Node::new()
//!     .with_component(Transform::new())
//!     .with_component(FnBehavior::new(|ctx| {
//!         let time = ctx.time;
//!         if let Some(transform) = ctx.get_mut::<Transform>() {
//!             transform.rotation = Quat::from_rotation_x(time * 0.6) * Quat::from_rotation_y(time * 0.7);
//!         }
//!     }));
//! ```

use crate::scene::component::{Component, UpdateContext, Updatable};

type BehaviorFn = Box<dyn FnMut(&mut UpdateContext<'_>)>;

/// Component that runs a closure on every update tick.
///
/// Only one `FnBehavior` can be attached per node; compose multiple steps
/// inside the closure or write a dedicated component.
pub struct FnBehavior {
    f: BehaviorFn,
}

impl FnBehavior {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&mut UpdateContext<'_>) + 'static,
    {
        Self { f: Box::new(f) }
    }
}

impl Component for FnBehavior {
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for FnBehavior {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        (self.f)(ctx);
    }
}

impl std::fmt::Debug for FnBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnBehavior").finish_non_exhaustive()
    }
}
