//! Camera tests
//!
//! Tests for:
//! - Default projection parameters
//! - Perspective and orthographic projection matrices
//! - Aspect updates from surface sizes, including degenerate sizes

use glam::{Mat4, Vec3, Vec4};
use trellis::scene::ProjectionType;
use trellis::{Camera, TrellisError};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn project(m: Mat4, p: Vec3) -> Vec3 {
    let clip = m * p.extend(1.0);
    clip.truncate() / clip.w
}

#[test]
fn default_is_perspective_with_documented_parameters() {
    let cam = Camera::default();
    assert_eq!(cam.projection_type, ProjectionType::Perspective);
    assert!(approx_eq(cam.fovy, 1.0));
    assert!(approx_eq(cam.aspect, 1.0));
    assert!(approx_eq(cam.near, 0.01));
    assert!(approx_eq(cam.far, 1000.0));
}

#[test]
fn perspective_matches_glam() {
    let cam = Camera::new_perspective(0.8, 16.0 / 9.0, 0.1, 50.0);
    let expected = Mat4::perspective_rh(0.8, 16.0 / 9.0, 0.1, 50.0);
    assert!(cam.projection_matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn perspective_maps_near_and_far_to_zero_one_depth() {
    let cam = Camera::new_perspective(1.0, 1.0, 0.5, 20.0);
    let m = cam.projection_matrix();

    assert!(approx_eq(project(m, Vec3::new(0.0, 0.0, -0.5)).z, 0.0));
    assert!((project(m, Vec3::new(0.0, 0.0, -20.0)).z - 1.0).abs() < 1e-4);
}

#[test]
fn orthographic_extent_follows_halfy_and_aspect() {
    let cam = Camera::new_orthographic(2.0, 2.0, 0.1, 10.0);
    let m = cam.projection_matrix();

    // Top-right corner of the view volume: x = halfy * aspect, y = halfy.
    let corner = m * Vec4::new(4.0, 2.0, -1.0, 1.0);
    assert!(approx_eq(corner.x, 1.0));
    assert!(approx_eq(corner.y, 1.0));
    assert!(approx_eq(corner.w, 1.0));
}

#[test]
fn aspect_from_size_updates_projection() {
    let mut cam = Camera::default();
    cam.set_aspect_from_size(800, 600).unwrap();
    assert!(approx_eq(cam.aspect, 800.0 / 600.0));

    let expected = Mat4::perspective_rh(1.0, 800.0 / 600.0, 0.01, 1000.0);
    assert!(cam.projection_matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn degenerate_size_is_rejected_and_aspect_kept() {
    let mut cam = Camera::default();
    cam.set_aspect(2.0);

    let result = cam.set_aspect_from_size(0, 600);
    assert!(matches!(
        result,
        Err(TrellisError::InvalidSurfaceSize { width: 0, height: 600 })
    ));
    assert!(cam.set_aspect_from_size(800, 0).is_err());
    assert!(approx_eq(cam.aspect, 2.0));
}
