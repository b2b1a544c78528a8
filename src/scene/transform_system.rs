//! Transform System (matrix resolver)
//!
//! Derives global matrices from the local [`Transform`]s of the hierarchy.
//! Nothing here is cached between frames: every call recomputes from the
//! current local values, so animator writes made during update are always
//! visible to the render step of the same tick.
//!
//! Conventions: column vectors, right-to-left application.
//!
//! ```text
//! global(root)  = local(root)
//! global(node)  = global(parent) * local(node)
//! view          = inverse(global(camera))
//! mvp           = projection * view * global(model)
//! ```
//!
//! A node without a `Transform` contributes the identity. Inverses are full
//! 4x4 inverses: non-uniform scale composed with rotation yields non-orthogonal
//! matrices, so the transpose shortcut is never taken.

use glam::Mat4;
use slotmap::{SecondaryMap, SlotMap};

use crate::errors::{Result, TrellisError};
use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::node::Node;
use crate::scene::transform::Transform;

/// Local matrix of a node, identity when it carries no `Transform`.
#[inline]
#[must_use]
pub fn local_matrix(node: &Node) -> Mat4 {
    node.get_component::<Transform>()
        .map_or(Mat4::IDENTITY, Transform::local_matrix)
}

/// Global (world) matrix of `handle`, composed root-first.
///
/// Walks the parent chain up to the root, then multiplies the local matrices
/// from the root down to the node.
pub fn global_matrix(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Result<Mat4> {
    let mut chain: Vec<Mat4> = Vec::with_capacity(8);
    let mut current = Some(handle);

    while let Some(h) = current {
        let node = nodes.get(h).ok_or(TrellisError::NodeNotFound(h))?;
        // A tree chain can never be longer than the node count.
        if chain.len() >= nodes.len() {
            return Err(TrellisError::CyclicHierarchy(h));
        }
        chain.push(local_matrix(node));
        current = node.parent;
    }

    Ok(chain.iter().rev().fold(Mat4::IDENTITY, |acc, local| acc * *local))
}

/// View matrix of a camera node: the inverse of its global matrix.
pub fn view_matrix(nodes: &SlotMap<NodeHandle, Node>, camera: NodeHandle) -> Result<Mat4> {
    Ok(global_matrix(nodes, camera)?.inverse())
}

/// Projection matrix of the `Camera` component on `camera`.
pub fn projection_matrix(nodes: &SlotMap<NodeHandle, Node>, camera: NodeHandle) -> Result<Mat4> {
    let node = nodes.get(camera).ok_or(TrellisError::NodeNotFound(camera))?;
    node.get_component::<Camera>()
        .map(Camera::projection_matrix)
        .ok_or(TrellisError::MissingComponent {
            node: camera,
            kind: "Camera",
        })
}

/// Full `projection * view * model` matrix for drawing `model` through `camera`.
pub fn model_view_projection(
    nodes: &SlotMap<NodeHandle, Node>,
    model: NodeHandle,
    camera: NodeHandle,
) -> Result<Mat4> {
    let model_matrix = global_matrix(nodes, model)?;
    let view = view_matrix(nodes, camera)?;
    let projection = projection_matrix(nodes, camera)?;
    Ok(projection * view * model_matrix)
}

/// Resolves the global matrix of every node reachable from `roots` in one
/// pre-order pass.
///
/// Uses an explicit stack carrying the parent's world matrix, so each local
/// matrix is evaluated exactly once. The result is a fresh map owned by the
/// caller; it is valid for the current frame only.
pub fn resolve_world_matrices(
    nodes: &SlotMap<NodeHandle, Node>,
    roots: &[NodeHandle],
) -> Result<SecondaryMap<NodeHandle, Mat4>> {
    let mut world = SecondaryMap::with_capacity(nodes.len());

    // Work stack: (node handle, parent world matrix)
    let mut stack: Vec<(NodeHandle, Mat4)> = Vec::with_capacity(64);
    for &root in roots.iter().rev() {
        stack.push((root, Mat4::IDENTITY));
    }

    while let Some((handle, parent_world)) = stack.pop() {
        let Some(node) = nodes.get(handle) else {
            continue;
        };
        if world.contains_key(handle) {
            return Err(TrellisError::CyclicHierarchy(handle));
        }

        let node_world = parent_world * local_matrix(node);
        world.insert(handle, node_world);

        for &child in node.children.iter().rev() {
            stack.push((child, node_world));
        }
    }

    Ok(world)
}
