//! Engine tests
//!
//! Tests for:
//! - Active camera selection and validation
//! - Frame extraction: view / projection / per-model MVP, visibility, light
//! - Resize cascade: backend resize and camera aspect before the next render
//! - Full scheduler-driven ticks against a recording backend
//! - Scene loading through the SceneLoader boundary

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glam::{Mat4, Quat, Vec3};
use trellis::app::{FrameHandler, FrameScheduler, RefreshSignal};
use trellis::errors::Result;
use trellis::renderer::extract_frame;
use trellis::{
    Camera, Engine, FnBehavior, FrameSubmission, Geometry, GeometryStore, Light, ManualClock,
    Model, Node, NodeHandle, RenderBackend, Scene, SceneLoader, SurfaceSize, Transform,
    TrellisError,
};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Default)]
struct RecordingBackend {
    resizes: Vec<SurfaceSize>,
    frames: Vec<FrameSubmission>,
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        self.resizes.push(size);
        Ok(())
    }

    fn submit(&mut self, frame: &FrameSubmission, geometries: &GeometryStore) -> Result<()> {
        for draw in &frame.draws {
            geometries.get(draw.geometry).ok_or(TrellisError::GeometryNotFound)?;
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct CountingSignal(Rc<Cell<usize>>);

impl RefreshSignal for CountingSignal {
    fn request_refresh(&self) {
        self.0.set(self.0.get() + 1);
    }
}

struct Fixture {
    engine: Engine<RecordingBackend>,
    camera: NodeHandle,
    cube: NodeHandle,
}

/// Camera at (0, 0, 5) looking down -Z, one cube at the origin.
fn fixture() -> Fixture {
    let mut engine = Engine::new(RecordingBackend::default());
    let geometry = engine.geometries.add(Geometry::cube());

    let cube = engine.scene.create_node(
        Node::with_name("cube")
            .with_component(Transform::new())
            .with_component(Model::new(geometry)),
    );
    let camera = engine.scene.create_node(
        Node::with_name("camera")
            .with_component(Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)))
            .with_component(Camera::default()),
    );
    engine.set_active_camera(camera).unwrap();

    Fixture {
        engine,
        camera,
        cube,
    }
}

fn projection_aspect(projection: Mat4) -> f32 {
    // perspective_rh: x_axis.x = f / aspect, y_axis.y = f
    projection.y_axis.y / projection.x_axis.x
}

// ============================================================================
// Camera selection
// ============================================================================

#[test]
fn active_camera_requires_camera_component() {
    let Fixture { mut engine, cube, .. } = fixture();
    assert!(matches!(
        engine.set_active_camera(cube),
        Err(TrellisError::MissingComponent { kind: "Camera", .. })
    ));
}

#[test]
fn active_camera_requires_live_node() {
    let Fixture { mut engine, camera, .. } = fixture();
    engine.scene.remove_node(camera).unwrap();
    assert!(matches!(
        engine.set_active_camera(camera),
        Err(TrellisError::NodeNotFound(_))
    ));
}

#[test]
fn render_without_camera_submits_nothing() {
    let mut engine = Engine::new(RecordingBackend::default());
    engine.render().unwrap();
    assert!(engine.backend().frames.is_empty());
}

// ============================================================================
// Frame extraction
// ============================================================================

#[test]
fn extracted_mvp_is_projection_view_model() {
    let Fixture { mut engine, camera, cube } = fixture();
    engine
        .scene
        .get_component_mut::<Transform>(cube)
        .unwrap()
        .rotation = Quat::from_rotation_y(0.5);

    let frame = extract_frame(&engine.scene, camera).unwrap();
    assert_eq!(frame.draws.len(), 1);

    let draw = frame.draws[0];
    let view = engine.scene.global_matrix(camera).unwrap().inverse();
    let projection = Camera::default().projection_matrix();
    let model = engine.scene.global_matrix(cube).unwrap();

    assert_eq!(draw.node, cube);
    assert!(frame.view_matrix.abs_diff_eq(view, EPSILON));
    assert!(frame.projection_matrix.abs_diff_eq(projection, EPSILON));
    assert!(draw.model_matrix.abs_diff_eq(model, EPSILON));
    assert!(draw.mvp.abs_diff_eq(projection * view * model, EPSILON));
}

#[test]
fn hidden_models_are_skipped_and_order_is_pre_order() {
    let Fixture { mut engine, camera, cube } = fixture();
    let geometry = engine.geometries.add(Geometry::cube());

    let hidden = engine.scene.create_node(Node::new().with_component(Model {
        geometry,
        visible: false,
    }));
    let child = engine
        .scene
        .create_node(Node::new().with_component(Model::new(geometry)));
    engine.scene.add_child(cube, child).unwrap();

    let frame = extract_frame(&engine.scene, camera).unwrap();
    let nodes: Vec<_> = frame.draws.iter().map(|d| d.node).collect();
    assert_eq!(nodes, vec![cube, child]);
    assert!(!nodes.contains(&hidden));
}

#[test]
fn first_light_is_carried_in_world_space() {
    let Fixture { mut engine, camera, cube } = fixture();
    let light = engine.scene.create_node(
        Node::new()
            .with_component(Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)))
            .with_component(Light::with_ambient(0.3)),
    );
    engine.scene.add_child(cube, light).unwrap();
    engine
        .scene
        .get_component_mut::<Transform>(cube)
        .unwrap()
        .translation = Vec3::new(0.0, 2.0, 0.0);

    let frame = extract_frame(&engine.scene, camera).unwrap();
    let data = frame.light.unwrap();
    assert!((data.position - Vec3::new(1.0, 2.0, 0.0)).length() < EPSILON);
    assert!(approx_eq(data.ambient, 0.3));
}

// ============================================================================
// Resize cascade
// ============================================================================

#[test]
fn resize_updates_backend_and_camera_aspect() {
    let Fixture { mut engine, camera, .. } = fixture();

    engine.resize(SurfaceSize::new(800, 600)).unwrap();

    assert_eq!(engine.backend().resizes, vec![SurfaceSize::new(800, 600)]);
    let aspect = engine.scene.get_component::<Camera>(camera).unwrap().aspect;
    assert!(approx_eq(aspect, 800.0 / 600.0));
    assert_eq!(engine.surface_size(), Some(SurfaceSize::new(800, 600)));
}

#[test]
fn zero_size_resize_is_reported() {
    let Fixture { mut engine, camera, .. } = fixture();

    let result = engine.resize(SurfaceSize::new(0, 0));
    assert!(matches!(
        result,
        Err(TrellisError::InvalidSurfaceSize { width: 0, height: 0 })
    ));
    assert!(engine.backend().resizes.is_empty());
    assert!(approx_eq(engine.scene.get_component::<Camera>(camera).unwrap().aspect, 1.0));
}

#[test]
fn camera_selected_after_resize_gets_current_aspect() {
    let mut engine = Engine::new(RecordingBackend::default());
    engine.resize(SurfaceSize::new(1600, 900)).unwrap();

    let camera = engine
        .scene
        .create_node(Node::new().with_component(Camera::default()));
    engine.set_active_camera(camera).unwrap();

    let aspect = engine.scene.get_component::<Camera>(camera).unwrap().aspect;
    assert!(approx_eq(aspect, 16.0 / 9.0));
}

// ============================================================================
// Scheduler-driven frames
// ============================================================================

#[test]
fn resize_then_tick_renders_with_new_aspect() {
    let Fixture { mut engine, .. } = fixture();
    let clock = ManualClock::new();
    let mut scheduler = FrameScheduler::new(clock.clone(), CountingSignal::default());

    scheduler.start();
    scheduler.on_refresh(&mut engine).unwrap();

    scheduler.notify_resize(800, 600);
    clock.advance(Duration::from_millis(16));
    scheduler.on_refresh(&mut engine).unwrap();

    let frames = &engine.backend().frames;
    assert_eq!(frames.len(), 2);
    assert!(approx_eq(projection_aspect(frames[0].projection_matrix), 1.0));
    assert!(approx_eq(projection_aspect(frames[1].projection_matrix), 800.0 / 600.0));
}

#[test]
fn update_completes_before_render_reads_transforms() {
    let Fixture { mut engine, cube, .. } = fixture();
    engine
        .scene
        .add_component(
            cube,
            FnBehavior::new(|ctx| {
                let time = ctx.time;
                if let Some(t) = ctx.get_mut::<Transform>() {
                    t.translation.x = time;
                }
            }),
        )
        .unwrap();

    let clock = ManualClock::new();
    let mut scheduler = FrameScheduler::new(clock.clone(), CountingSignal::default());
    scheduler.start();
    scheduler.on_refresh(&mut engine).unwrap();
    clock.advance_secs(2.0);
    let frame = scheduler.on_refresh(&mut engine).unwrap().unwrap();

    assert!(approx_eq(frame.time, 2.0));
    assert!(approx_eq(engine.time(), 2.0));
    assert_eq!(engine.frame_count(), 2);

    // The submitted model matrix already reflects this tick's update.
    let submitted = &engine.backend().frames[1];
    assert!(approx_eq(submitted.draws[0].model_matrix.w_axis.x, 2.0));
}

#[test]
fn missing_geometry_stops_the_loop() {
    let Fixture { mut engine, cube, .. } = fixture();
    let geometry = engine.scene.get_component::<Model>(cube).unwrap().geometry;
    engine.geometries.remove(geometry);

    let mut scheduler = FrameScheduler::new(ManualClock::new(), CountingSignal::default());
    scheduler.start();

    assert!(matches!(
        scheduler.on_refresh(&mut engine),
        Err(TrellisError::GeometryNotFound)
    ));
    assert!(!scheduler.is_running());
}

#[test]
fn removed_active_camera_is_dropped_and_the_loop_keeps_running() {
    let Fixture {
        mut engine,
        camera,
        cube,
    } = fixture();
    let mut queued = false;
    engine
        .scene
        .add_component(
            cube,
            FnBehavior::new(move |ctx| {
                if !queued {
                    ctx.commands().remove(camera);
                    queued = true;
                }
            }),
        )
        .unwrap();

    let clock = ManualClock::new();
    let mut scheduler = FrameScheduler::new(clock.clone(), CountingSignal::default());
    scheduler.start();
    scheduler.on_refresh(&mut engine).unwrap();

    assert!(!engine.scene.contains(camera));
    assert_eq!(engine.active_camera(), None);
    assert!(engine.backend().frames.is_empty());
    assert!(engine.extract().unwrap().is_none());

    // Later ticks and resizes keep going without a camera.
    scheduler.notify_resize(640, 480);
    clock.advance(Duration::from_millis(16));
    assert!(scheduler.on_refresh(&mut engine).unwrap().is_some());
    assert!(scheduler.is_running());
    assert_eq!(engine.surface_size(), Some(SurfaceSize::new(640, 480)));
    assert!(engine.backend().frames.is_empty());
}

// ============================================================================
// Loader boundary
// ============================================================================

struct CubeLoader;

impl SceneLoader for CubeLoader {
    fn load_scene(&mut self, geometries: &mut GeometryStore) -> Result<Scene> {
        let mut scene = Scene::new();
        let geometry = geometries.add(Geometry::cube());
        let root = scene.create_node(Node::with_name("root"));
        let model = scene.create_node(Node::with_name("model").with_component(Model::new(geometry)));
        let camera = scene.create_node(
            Node::with_name("camera")
                .with_component(Transform::from_translation(Vec3::new(0.0, 0.0, 8.0)))
                .with_component(Camera::default()),
        );
        scene.add_child(root, model)?;
        scene.add_child(root, camera)?;
        Ok(scene)
    }
}

#[test]
fn loaded_scene_activates_its_first_camera() {
    let mut engine = Engine::new(RecordingBackend::default());
    engine.load_scene(&mut CubeLoader).unwrap();

    let camera = engine.active_camera().unwrap();
    assert_eq!(engine.scene.get_node(camera).unwrap().name, "camera");
    assert_eq!(engine.geometries.len(), 1);

    engine.render().unwrap();
    assert_eq!(engine.backend().frames[0].draws.len(), 1);
}
