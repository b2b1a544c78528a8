//! Depth-first scene traversal.
//!
//! [`PreOrder`] walks a hierarchy parent-before-child, visiting children in
//! child order. It uses an explicit stack rather than recursion so deep
//! hierarchies cannot overflow the call stack.
//!
//! A visited set guards the walk: if any node is reached a second time the
//! hierarchy is not a tree, the iterator yields
//! [`TrellisError::CyclicHierarchy`] and then stops instead of looping forever.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::errors::{Result, TrellisError};
use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Pre-order iterator over `(handle, node)` pairs.
pub struct PreOrder<'a> {
    nodes: &'a SlotMap<NodeHandle, Node>,
    stack: Vec<NodeHandle>,
    visited: FxHashSet<NodeHandle>,
    halted: bool,
}

impl<'a> PreOrder<'a> {
    /// Walks the subtrees rooted at `roots`, in order.
    pub fn new(nodes: &'a SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) -> Self {
        let mut stack = Vec::with_capacity(64);
        stack.extend(roots.iter().rev().copied());
        Self {
            nodes,
            stack,
            visited: FxHashSet::default(),
            halted: false,
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Result<(NodeHandle, &'a Node)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }

        loop {
            let handle = self.stack.pop()?;

            if !self.visited.insert(handle) {
                self.halted = true;
                self.stack.clear();
                log::error!("Cycle in scene hierarchy at {handle:?}, traversal halted");
                return Some(Err(TrellisError::CyclicHierarchy(handle)));
            }

            let Some(node) = self.nodes.get(handle) else {
                log::warn!("Skipping stale node handle {handle:?} during traversal");
                continue;
            };

            // Reverse push keeps child order on pop.
            self.stack.extend(node.children.iter().rev().copied());
            return Some(Ok((handle, node)));
        }
    }
}

/// Collects the pre-order sequence of handles, failing on a cycle.
pub fn collect_pre_order(
    nodes: &SlotMap<NodeHandle, Node>,
    roots: &[NodeHandle],
) -> Result<Vec<NodeHandle>> {
    PreOrder::new(nodes, roots)
        .map(|item| item.map(|(handle, _)| handle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (SlotMap<NodeHandle, Node>, Vec<NodeHandle>) {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let a = nodes.insert(Node::with_name("a"));
        let b = nodes.insert(Node::with_name("b"));
        let c = nodes.insert(Node::with_name("c"));
        nodes[a].children.push(b);
        nodes[b].parent = Some(a);
        nodes[b].children.push(c);
        nodes[c].parent = Some(b);
        (nodes, vec![a, b, c])
    }

    #[test]
    fn corrupted_links_halt_with_cycle_error() {
        let (mut nodes, handles) = chain();
        let (a, c) = (handles[0], handles[2]);
        // Bypass the scene API to forge a back edge c -> a.
        nodes[c].children.push(a);

        let items: Vec<_> = PreOrder::new(&nodes, &[a]).collect();
        assert_eq!(items.len(), 4);
        assert!(items[..3].iter().all(Result::is_ok));
        assert!(matches!(
            items[3],
            Err(TrellisError::CyclicHierarchy(h)) if h == a
        ));
    }

    #[test]
    fn stale_children_are_skipped() {
        let (mut nodes, handles) = chain();
        let (a, c) = (handles[0], handles[2]);
        nodes.remove(c);

        let order = collect_pre_order(&nodes, &[a]).expect("acyclic");
        assert_eq!(order, vec![a, handles[1]]);
    }
}
