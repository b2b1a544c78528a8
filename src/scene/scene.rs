use glam::Mat4;
use slotmap::{SecondaryMap, SlotMap};

use crate::errors::{Result, TrellisError};
use crate::scene::NodeHandle;
use crate::scene::commands::{SceneCommand, SceneCommands};
use crate::scene::component::{Component, UpdateContext};
use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::traversal::{self, PreOrder};

/// Scene graph container.
///
/// The scene owns every node in an arena and keeps the hierarchy a forest:
/// each node has at most one parent and no node is its own ancestor. Nodes
/// without a parent are roots, kept in insertion order.
///
/// # Phases
///
/// - Host code edits the hierarchy between ticks (`create_node`, `add_child`, ...).
/// - [`update`](Self::update) runs every component behavior in pre-order.
///   Structural edits requested by behaviors are deferred to the end of the walk.
/// - The render step only reads (`resolve_world_matrices`, `global_matrix`).
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node lifecycle
    // ========================================================================

    /// Inserts `node` as a new root and returns its handle.
    ///
    /// Hierarchy links carried by `node` are ignored; use
    /// [`add_child`](Self::add_child) to place it.
    pub fn create_node(&mut self, mut node: Node) -> NodeHandle {
        node.parent = None;
        node.children.clear();
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// The parent becomes the sole owner of the child's subtree. Rejected when
    /// the child already has a parent or when `child` is `parent` itself or one
    /// of its ancestors.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        if parent == child {
            return Err(TrellisError::SelfAttachment(child));
        }
        if !self.nodes.contains_key(parent) {
            return Err(TrellisError::NodeNotFound(parent));
        }
        let current_parent = self
            .nodes
            .get(child)
            .ok_or(TrellisError::NodeNotFound(child))?
            .parent;
        if let Some(existing) = current_parent {
            return Err(TrellisError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor(child, parent)? {
            return Err(TrellisError::CycleDetected { parent, child });
        }

        self.root_nodes.retain(|&h| h != child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from its parent, turning it into a root.
    ///
    /// Detaching a root is a no-op.
    pub fn detach(&mut self, child: NodeHandle) -> Result<()> {
        let parent = self
            .nodes
            .get(child)
            .ok_or(TrellisError::NodeNotFound(child))?
            .parent;

        let Some(parent) = parent else {
            return Ok(());
        };

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|&h| h != child);
        }
        self.nodes[child].parent = None;
        self.root_nodes.push(child);
        Ok(())
    }

    /// Destroys `handle` and its whole subtree.
    ///
    /// Returns the number of nodes removed.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Result<usize> {
        if !self.nodes.contains_key(handle) {
            return Err(TrellisError::NodeNotFound(handle));
        }
        let subtree = traversal::collect_pre_order(&self.nodes, &[handle])?;

        match self.nodes[handle].parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|&h| h != handle);
                }
            }
            None => self.root_nodes.retain(|&h| h != handle),
        }

        for h in &subtree {
            self.nodes.remove(*h);
        }
        Ok(subtree.len())
    }

    /// Returns `true` if `ancestor` appears on the parent chain of `node`
    /// (a node counts as its own ancestor).
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> Result<bool> {
        let mut current = Some(node);
        let mut steps = 0usize;
        while let Some(h) = current {
            if h == ancestor {
                return Ok(true);
            }
            steps += 1;
            if steps > self.nodes.len() {
                return Err(TrellisError::CyclicHierarchy(h));
            }
            current = self.nodes.get(h).and_then(|n| n.parent);
        }
        Ok(false)
    }

    // ========================================================================
    // Access
    // ========================================================================

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Root handles in insertion order.
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Component of type `C` on `handle`; `None` for absent components and stale handles.
    #[must_use]
    pub fn get_component<C: Component>(&self, handle: NodeHandle) -> Option<&C> {
        self.nodes.get(handle)?.get_component::<C>()
    }

    pub fn get_component_mut<C: Component>(&mut self, handle: NodeHandle) -> Option<&mut C> {
        self.nodes.get_mut(handle)?.get_component_mut::<C>()
    }

    /// Adds a component to a live node, returning the one it overwrote.
    pub fn add_component<C: Component>(&mut self, handle: NodeHandle, component: C) -> Result<Option<C>> {
        let node = self
            .nodes
            .get_mut(handle)
            .ok_or(TrellisError::NodeNotFound(handle))?;
        Ok(node.add_component(component))
    }

    // ========================================================================
    // Traversal & queries
    // ========================================================================

    /// Pre-order iterator over the subtree rooted at `from`.
    #[must_use]
    pub fn iter_subtree(&self, from: NodeHandle) -> PreOrder<'_> {
        PreOrder::new(&self.nodes, &[from])
    }

    /// Pre-order iterator over every root's subtree, roots in insertion order.
    #[must_use]
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(&self.nodes, &self.root_nodes)
    }

    /// Visits `from` and its descendants depth-first, parent before children.
    pub fn traverse<F>(&self, from: NodeHandle, mut visitor: F) -> Result<()>
    where
        F: FnMut(NodeHandle, &Node),
    {
        for item in self.iter_subtree(from) {
            let (handle, node) = item?;
            visitor(handle, node);
        }
        Ok(())
    }

    /// Visits every node of the scene in pre-order.
    pub fn traverse_all<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(NodeHandle, &Node),
    {
        for item in self.iter() {
            let (handle, node) = item?;
            visitor(handle, node);
        }
        Ok(())
    }

    /// First node under `from` (pre-order, `from` included) matching `predicate`.
    pub fn find<P>(&self, from: NodeHandle, mut predicate: P) -> Result<Option<NodeHandle>>
    where
        P: FnMut(&Node) -> bool,
    {
        for item in self.iter_subtree(from) {
            let (handle, node) = item?;
            if predicate(node) {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    /// First node of the whole scene (pre-order) matching `predicate`.
    pub fn find_in_scene<P>(&self, mut predicate: P) -> Result<Option<NodeHandle>>
    where
        P: FnMut(&Node) -> bool,
    {
        for item in self.iter() {
            let (handle, node) = item?;
            if predicate(node) {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    /// First node of the scene (pre-order) carrying a component of type `C`.
    pub fn find_component<C: Component>(&self) -> Result<Option<NodeHandle>> {
        self.find_in_scene(Node::has_component::<C>)
    }

    // ========================================================================
    // Matrices
    // ========================================================================

    /// Global matrix of `handle`, resolved from the current local transforms.
    pub fn global_matrix(&self, handle: NodeHandle) -> Result<Mat4> {
        transform_system::global_matrix(&self.nodes, handle)
    }

    /// World matrices of every node, resolved in a single pass.
    pub fn resolve_world_matrices(&self) -> Result<SecondaryMap<NodeHandle, Mat4>> {
        transform_system::resolve_world_matrices(&self.nodes, &self.root_nodes)
    }

    /// Underlying arena, for read-only systems such as the matrix resolver.
    #[must_use]
    pub fn nodes(&self) -> &SlotMap<NodeHandle, Node> {
        &self.nodes
    }

    // ========================================================================
    // Update cascade
    // ========================================================================

    /// Runs the per-frame behavior of every updatable component.
    ///
    /// Nodes are visited in pre-order and components in insertion order. The
    /// visiting order is fixed before any behavior runs; edits the behaviors
    /// queue through [`UpdateContext::commands`] are applied afterwards, in
    /// queue order.
    ///
    /// Fails with [`TrellisError::CyclicHierarchy`] before running any behavior
    /// if the hierarchy is corrupted, and with the first failing deferred edit
    /// otherwise (later edits are still applied).
    pub fn update(&mut self, time: f32, dt: f32) -> Result<()> {
        let order = traversal::collect_pre_order(&self.nodes, &self.root_nodes)?;
        let mut commands = SceneCommands::new();

        for handle in order {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };

            for index in 0..node.components.len() {
                let Some(mut component) = node.components.take_at(index) else {
                    continue;
                };
                if let Some(updatable) = component.as_updatable() {
                    let mut ctx =
                        UpdateContext::new(handle, time, dt, &mut node.components, &mut commands);
                    updatable.update(&mut ctx);
                }
                node.components.restore_at(index, component);
            }
        }

        self.apply_commands(&mut commands)
    }

    /// Applies queued structural edits in order.
    ///
    /// Every command is attempted. Rejected commands are logged and the first
    /// error is returned.
    pub fn apply_commands(&mut self, commands: &mut SceneCommands) -> Result<()> {
        let mut first_error = None;

        for command in commands.drain() {
            let outcome = match command {
                SceneCommand::AddChild { parent, child } => self.add_child(parent, child),
                SceneCommand::Detach(node) => self.detach(node),
                SceneCommand::Remove(node) => self.remove_node(node).map(|_| ()),
            };

            if let Err(err) = outcome {
                log::warn!("Deferred scene edit {command:?} rejected: {err}");
                first_error.get_or_insert(err);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
