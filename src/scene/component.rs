//! Component model.
//!
//! A component is a typed bundle of data, optionally with per-frame behavior.
//! Each [`Node`](crate::scene::Node) owns a [`Components`] registry holding at
//! most one component per concrete type. Per-frame behavior is an explicit
//! capability: a component opts in by returning itself from
//! [`Component::as_updatable`]. The update cascade asks for that capability and
//! leaves every other component untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Spin { speed: f32 }
//!
//! impl Component for Spin {
//!     fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
//!         Some(self)
//!     }
//! }
//!
//! impl Updatable for Spin {
//!     fn update(&mut self, ctx: &mut UpdateContext<'_>) {
//!         let angle = ctx.time * self.speed;
//!         if let Some(transform) = ctx.get_mut::<Transform>() {
//!             transform.rotation = Quat::from_rotation_y(angle);
//!         }
//!     }
//! }
//! ```

use std::any::{Any, TypeId};

use smallvec::SmallVec;

use crate::scene::NodeHandle;
use crate::scene::commands::SceneCommands;

/// Data or behavior attached to a node.
///
/// Components are keyed by their concrete type, so a node can never hold two
/// components of the same type.
pub trait Component: Any {
    /// Human readable component kind, used in logs and errors.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the per-frame behavior of this component, if it has one.
    ///
    /// Inert data components (transforms, cameras, models) keep the default.
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }
}

/// Per-frame behavior invoked by the update cascade with `(time, dt)`.
pub trait Updatable {
    fn update(&mut self, ctx: &mut UpdateContext<'_>);
}

/// View handed to an [`Updatable`] while the update cascade visits its node.
///
/// The context exposes the other components of the same node and a queue for
/// structural edits. Queued edits are applied after the whole traversal has
/// finished, so the hierarchy never changes under a running walk.
///
/// The component being updated is detached from the registry for the duration
/// of its call and is therefore not visible through [`get`](Self::get).
pub struct UpdateContext<'a> {
    /// Node that owns the component being updated.
    pub node: NodeHandle,
    /// Seconds since the scheduler was started.
    pub time: f32,
    /// Seconds since the previous tick.
    pub dt: f32,
    pub(crate) components: &'a mut Components,
    pub(crate) commands: &'a mut SceneCommands,
}

impl<'a> UpdateContext<'a> {
    pub(crate) fn new(
        node: NodeHandle,
        time: f32,
        dt: f32,
        components: &'a mut Components,
        commands: &'a mut SceneCommands,
    ) -> Self {
        Self {
            node,
            time,
            dt,
            components,
            commands,
        }
    }

    /// Returns a sibling component of type `C` on the same node.
    #[must_use]
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    /// Returns a mutable sibling component of type `C` on the same node.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }

    /// Queue of structural edits applied at the end of the update cascade.
    pub fn commands(&mut self) -> &mut SceneCommands {
        self.commands
    }
}

struct ComponentSlot {
    kind: TypeId,
    name: &'static str,
    // `None` only while the component is lent out to the update cascade.
    component: Option<Box<dyn Component>>,
}

/// Per-node component registry.
///
/// Keeps insertion order, which is also the order in which the update cascade
/// invokes behaviors. Nodes rarely carry more than a handful of components, so
/// lookups are a linear scan over an inline small vector.
#[derive(Default)]
pub struct Components {
    slots: SmallVec<[ComponentSlot; 4]>,
}

impl Components {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `component`, replacing and returning any existing component of
    /// the same type.
    pub fn insert<C: Component>(&mut self, component: C) -> Option<C> {
        let kind = TypeId::of::<C>();
        let boxed: Box<dyn Component> = Box::new(component);

        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.kind == kind) {
            let previous = slot.component.replace(boxed)?;
            let previous: Box<dyn Any> = previous;
            return previous.downcast::<C>().ok().map(|b| *b);
        }

        self.slots.push(ComponentSlot {
            kind,
            name: std::any::type_name::<C>(),
            component: Some(boxed),
        });
        None
    }

    /// Stores an already boxed component, keyed by its concrete type.
    ///
    /// Used by loaders that build components dynamically. Returns the replaced
    /// component, if any.
    pub fn insert_boxed(&mut self, component: Box<dyn Component>) -> Option<Box<dyn Component>> {
        let kind = kind_of(component.as_ref());

        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.kind == kind) {
            return slot.component.replace(component);
        }

        self.slots.push(ComponentSlot {
            kind,
            name: component.type_name(),
            component: Some(component),
        });
        None
    }

    #[must_use]
    pub fn get<C: Component>(&self) -> Option<&C> {
        let kind = TypeId::of::<C>();
        let component = self
            .slots
            .iter()
            .find(|slot| slot.kind == kind)?
            .component
            .as_deref()?;
        let any: &dyn Any = component;
        any.downcast_ref::<C>()
    }

    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        let kind = TypeId::of::<C>();
        let component = self
            .slots
            .iter_mut()
            .find(|slot| slot.kind == kind)?
            .component
            .as_deref_mut()?;
        let any: &mut dyn Any = component;
        any.downcast_mut::<C>()
    }

    /// Removes and returns the component of type `C`.
    pub fn remove<C: Component>(&mut self) -> Option<C> {
        let kind = TypeId::of::<C>();
        let index = self.slots.iter().position(|slot| slot.kind == kind)?;
        let boxed: Box<dyn Any> = self.slots.remove(index).component?;
        boxed.downcast::<C>().ok().map(|b| *b)
    }

    #[must_use]
    pub fn contains<C: Component>(&self) -> bool {
        let kind = TypeId::of::<C>();
        self.slots
            .iter()
            .any(|slot| slot.kind == kind && slot.component.is_some())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Type names of the stored components, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.name)
    }

    pub(crate) fn take_at(&mut self, index: usize) -> Option<Box<dyn Component>> {
        self.slots.get_mut(index)?.component.take()
    }

    pub(crate) fn restore_at(&mut self, index: usize, component: Box<dyn Component>) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.component = Some(component);
        }
    }
}

impl std::fmt::Debug for Components {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn kind_of(component: &dyn Component) -> TypeId {
    let any: &dyn Any = component;
    any.type_id()
}
