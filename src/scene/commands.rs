//! Deferred structural edits.
//!
//! Behaviors run while the update cascade walks the hierarchy, so they may not
//! change it directly. They queue edits on [`SceneCommands`] instead and the
//! scene applies the queue, in order, once the walk has finished.

use crate::scene::NodeHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Attach `child` as the last child of `parent`.
    AddChild {
        parent: NodeHandle,
        child: NodeHandle,
    },
    /// Make the node a root again.
    Detach(NodeHandle),
    /// Destroy the node and its whole subtree.
    Remove(NodeHandle),
}

/// FIFO queue of [`SceneCommand`]s.
#[derive(Debug, Default)]
pub struct SceneCommands {
    queue: Vec<SceneCommand>,
}

impl SceneCommands {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        self.queue.push(SceneCommand::AddChild { parent, child });
    }

    pub fn detach(&mut self, node: NodeHandle) {
        self.queue.push(SceneCommand::Detach(node));
    }

    pub fn remove(&mut self, node: NodeHandle) {
        self.queue.push(SceneCommand::Remove(node));
    }

    pub fn push(&mut self, command: SceneCommand) {
        self.queue.push(command);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SceneCommand> + '_ {
        self.queue.drain(..)
    }
}
