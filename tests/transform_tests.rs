//! Transform and matrix resolver tests
//!
//! Tests for:
//! - Transform TRS composition and Euler round-trips
//! - look_at orientation
//! - apply_local_matrix decomposition
//! - Global matrix composition along a hierarchy (root-first)
//! - View matrix as the full inverse of the camera's global matrix
//! - Single-pass world matrix resolution

use glam::{EulerRot, Mat4, Quat, Vec3, Vec4};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use trellis::scene::transform_system;
use trellis::{Camera, Node, NodeHandle, Scene, Transform};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn world_position(scene: &Scene, handle: NodeHandle) -> Vec3 {
    scene
        .global_matrix(handle)
        .expect("acyclic hierarchy")
        .w_axis
        .truncate()
}

fn translated(x: f32, y: f32, z: f32) -> Node {
    Node::new().with_component(Transform::from_translation(Vec3::new(x, y, z)))
}

/// root -> a -> b, each translated along a different axis.
fn three_level_chain() -> (Scene, NodeHandle, NodeHandle, NodeHandle) {
    let mut scene = Scene::new();
    let root = scene.create_node(translated(1.0, 0.0, 0.0));
    let a = scene.create_node(translated(0.0, 2.0, 0.0));
    let b = scene.create_node(translated(0.0, 0.0, 3.0));
    scene.add_child(root, a).unwrap();
    scene.add_child(a, b).unwrap();
    (scene, root, a, b)
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.translation, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
    assert_eq!(t.local_matrix(), Mat4::IDENTITY);
}

#[test]
fn local_matrix_is_translate_rotate_scale() {
    let t = Transform::from_translation(Vec3::new(5.0, 0.0, 0.0))
        .with_rotation(Quat::from_rotation_z(FRAC_PI_2))
        .with_scale(Vec3::new(2.0, 1.0, 1.0));

    // Scale first: (1,0,0) -> (2,0,0); rotate 90° about Z: -> (0,2,0); translate: -> (5,2,0)
    let p = t.local_matrix().transform_point3(Vec3::X);
    assert!(vec3_approx(p, Vec3::new(5.0, 2.0, 0.0)));

    let expected = Mat4::from_translation(t.translation)
        * Mat4::from_quat(t.rotation)
        * Mat4::from_scale(t.scale);
    assert!(t.local_matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn euler_round_trip() {
    let mut t = Transform::new();
    t.set_rotation_euler(0.3, -0.5, 1.1);
    let e = t.rotation_euler();
    assert!(vec3_approx(e, Vec3::new(0.3, -0.5, 1.1)));

    let expected = Quat::from_euler(EulerRot::XYZ, 0.3, -0.5, 1.1);
    assert!(t.rotation.abs_diff_eq(expected, EPSILON));
}

#[test]
fn look_at_points_negative_z_at_target() {
    let mut t = Transform::from_translation(Vec3::new(0.0, 0.0, 5.0));
    t.look_at(Vec3::new(5.0, 0.0, 5.0), Vec3::Y);

    let forward = t.rotation * Vec3::NEG_Z;
    assert!(vec3_approx(forward, Vec3::X));
}

#[test]
fn look_at_parallel_up_keeps_rotation() {
    let mut t = Transform::new().with_rotation(Quat::from_rotation_y(FRAC_PI_4));
    let before = t.rotation;
    t.look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
    assert_eq!(t.rotation, before);
}

#[test]
fn apply_local_matrix_decomposes_trs() {
    let source = Transform::from_translation(Vec3::new(1.0, -2.0, 3.0))
        .with_rotation(Quat::from_rotation_y(0.7))
        .with_scale(Vec3::new(2.0, 3.0, 4.0));

    let mut t = Transform::new();
    t.apply_local_matrix(source.local_matrix());

    assert!(vec3_approx(t.translation, source.translation));
    assert!(vec3_approx(t.scale, source.scale));
    assert!(t.rotation.abs_diff_eq(source.rotation, EPSILON));
}

// ============================================================================
// Hierarchy Composition
// ============================================================================

#[test]
fn root_global_is_its_local() {
    let mut scene = Scene::new();
    let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
        .with_rotation(Quat::from_rotation_x(0.4));
    let root = scene.create_node(Node::new().with_component(t));

    let global = scene.global_matrix(root).unwrap();
    assert!(global.abs_diff_eq(t.local_matrix(), EPSILON));
}

#[test]
fn node_without_transform_contributes_identity() {
    let mut scene = Scene::new();
    let group = scene.create_node(Node::with_name("group"));
    let leaf = scene.create_node(translated(0.0, 1.0, 0.0));
    scene.add_child(group, leaf).unwrap();

    assert!(vec3_approx(world_position(&scene, leaf), Vec3::Y));
}

#[test]
fn three_level_chain_composes_root_to_leaf() {
    let (scene, root, a, b) = three_level_chain();

    let local = |h| {
        scene
            .get_component::<Transform>(h)
            .map(Transform::local_matrix)
            .unwrap()
    };
    let expected = local(root) * local(a) * local(b);

    let global = scene.global_matrix(b).unwrap();
    assert!(global.abs_diff_eq(expected, EPSILON));
    assert!(vec3_approx(world_position(&scene, b), Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn translating_root_shifts_leaf_by_same_amount() {
    let (mut scene, root, _a, b) = three_level_chain();
    let before = world_position(&scene, b);

    scene
        .get_component_mut::<Transform>(root)
        .unwrap()
        .translation += Vec3::new(1.0, 0.0, 0.0);

    let after = world_position(&scene, b);
    assert!(vec3_approx(after - before, Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn parent_rotation_applies_to_child_offset() {
    let mut scene = Scene::new();
    let parent = scene.create_node(
        Node::new().with_component(Transform::new().with_rotation(Quat::from_rotation_y(FRAC_PI_2))),
    );
    let child = scene.create_node(translated(1.0, 0.0, 0.0));
    scene.add_child(parent, child).unwrap();

    // +X rotated 90° about Y lands on -Z.
    assert!(vec3_approx(world_position(&scene, child), Vec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn parent_scale_applies_to_child_translation() {
    let mut scene = Scene::new();
    let parent = scene.create_node(Node::new().with_component(Transform::new().with_scale(Vec3::splat(2.0))));
    let child = scene.create_node(translated(1.0, 1.0, 0.0));
    scene.add_child(parent, child).unwrap();

    assert!(vec3_approx(world_position(&scene, child), Vec3::new(2.0, 2.0, 0.0)));
}

#[test]
fn global_matrix_tracks_transform_edits() {
    let (mut scene, _root, a, b) = three_level_chain();
    let first = scene.global_matrix(b).unwrap();

    scene.get_component_mut::<Transform>(a).unwrap().rotation = Quat::from_rotation_z(FRAC_PI_2);
    let second = scene.global_matrix(b).unwrap();

    assert!(!first.abs_diff_eq(second, EPSILON));
}

#[test]
fn batch_resolution_matches_per_node_walk() {
    let (mut scene, root, a, b) = three_level_chain();
    let side = scene.create_node(translated(-4.0, 0.0, 0.0));
    scene.add_child(root, side).unwrap();
    scene.get_component_mut::<Transform>(a).unwrap().rotation = Quat::from_rotation_x(0.8);

    let world = scene.resolve_world_matrices().unwrap();
    assert_eq!(world.len(), 4);
    for h in [root, a, b, side] {
        assert!(world[h].abs_diff_eq(scene.global_matrix(h).unwrap(), EPSILON));
    }
}

// ============================================================================
// View / Projection
// ============================================================================

#[test]
fn view_is_inverse_of_camera_global() {
    let mut scene = Scene::new();
    let rig = scene.create_node(translated(0.0, 2.0, 0.0));
    let camera = scene.create_node(
        Node::new()
            .with_component(Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)))
            .with_component(Camera::default()),
    );
    scene.add_child(rig, camera).unwrap();

    let view = transform_system::view_matrix(scene.nodes(), camera).unwrap();
    let global = scene.global_matrix(camera).unwrap();
    assert!((view * global).abs_diff_eq(Mat4::IDENTITY, EPSILON));

    // A point at the camera's world position lands at the view-space origin.
    let eye = view.transform_point3(Vec3::new(0.0, 2.0, 5.0));
    assert!(vec3_approx(eye, Vec3::ZERO));
}

#[test]
fn view_inverse_handles_non_uniform_scale_with_rotation() {
    let mut scene = Scene::new();
    let parent = scene.create_node(
        Node::new().with_component(
            Transform::new()
                .with_rotation(Quat::from_rotation_z(FRAC_PI_4))
                .with_scale(Vec3::new(3.0, 1.0, 0.5)),
        ),
    );
    let camera = scene.create_node(
        Node::new()
            .with_component(
                Transform::from_translation(Vec3::new(1.0, 0.0, 2.0))
                    .with_rotation(Quat::from_rotation_y(0.3)),
            )
            .with_component(Camera::default()),
    );
    scene.add_child(parent, camera).unwrap();

    let global = scene.global_matrix(camera).unwrap();
    let view = transform_system::view_matrix(scene.nodes(), camera).unwrap();

    // The global matrix is not orthogonal, so the transpose is not its inverse.
    let upper = Mat4::from_mat3(glam::Mat3::from_mat4(global));
    assert!(!(upper.transpose() * upper).abs_diff_eq(Mat4::IDENTITY, 1e-3));
    assert!((view * global).abs_diff_eq(Mat4::IDENTITY, 1e-4));
}

#[test]
fn mvp_is_projection_view_model() {
    let mut scene = Scene::new();
    let camera = scene.create_node(
        Node::new()
            .with_component(Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)))
            .with_component(Camera::new_perspective(1.0, 1.5, 0.1, 100.0)),
    );
    let model = scene.create_node(translated(1.0, 0.0, 0.0));

    let mvp = transform_system::model_view_projection(scene.nodes(), model, camera).unwrap();
    let projection = transform_system::projection_matrix(scene.nodes(), camera).unwrap();
    let view = transform_system::view_matrix(scene.nodes(), camera).unwrap();
    let model_matrix = scene.global_matrix(model).unwrap();
    assert!(mvp.abs_diff_eq(projection * view * model_matrix, EPSILON));

    // The model origin sits in front of the camera: clip w equals view depth.
    let clip = mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert!(approx_eq(clip.w, 5.0));
}
