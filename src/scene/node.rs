use std::borrow::Cow;

use crate::scene::NodeHandle;
use crate::scene::component::{Component, Components};

/// A scene node: one entity of the hierarchy.
///
/// # Hierarchy
///
/// Nodes live in a [`Scene`](crate::scene::Scene) arena and reference each other
/// by [`NodeHandle`]:
/// - `parent`: handle to the parent node (`None` for root nodes)
/// - `children`: ordered child handles, exclusively owned by this node
///
/// Hierarchy links are only edited through the scene
/// ([`Scene::add_child`](crate::scene::Scene::add_child),
/// [`Scene::detach`](crate::scene::Scene::detach)), which keeps both sides in
/// sync and rejects edits that would break the tree invariant.
///
/// # Components
///
/// Each node carries a [`Components`] registry with at most one component per
/// type. Transforms, cameras, models and host-authored behaviors all live there.
#[derive(Debug, Default)]
pub struct Node {
    pub name: Cow<'static, str>,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub components: Components,
}

impl Node {
    /// Creates an unnamed node with no components.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder form of [`add_component`](Self::add_component).
    #[must_use]
    pub fn with_component<C: Component>(mut self, component: C) -> Self {
        self.components.insert(component);
        self
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles, in child order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Stores `component`, overwriting any existing component of the same type.
    ///
    /// Returns the overwritten component.
    pub fn add_component<C: Component>(&mut self, component: C) -> Option<C> {
        self.components.insert(component)
    }

    /// Returns the component of type `C`, or `None` when absent.
    #[inline]
    #[must_use]
    pub fn get_component<C: Component>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    #[inline]
    pub fn get_component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }

    pub fn remove_component<C: Component>(&mut self) -> Option<C> {
        self.components.remove::<C>()
    }

    #[inline]
    #[must_use]
    pub fn has_component<C: Component>(&self) -> bool {
        self.components.contains::<C>()
    }
}
