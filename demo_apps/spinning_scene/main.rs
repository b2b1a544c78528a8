//! Spinning Scene
//!
//! Three cubes under one pivot:
//! - the center cube spins from a closure behavior
//! - a child cube orbits with its parent and rocks with a `RotateAnimator`
//! - a light sweeps through the scene with a looping `LinearAnimator`
//!
//! Run with `RUST_LOG=debug` to watch resize and scheduler transitions.

use std::sync::Arc;

use glam::{Quat, Vec3};
use trellis::app::winit::{App, AppHandler, DesktopEngine, Window};
use trellis::errors::Result;
use trellis::{
    Camera, FnBehavior, Geometry, Light, LinearAnimator, LoopMode, Model, Node, RotateAnimator,
    Transform,
};

struct SpinningScene;

impl AppHandler for SpinningScene {
    fn init(engine: &mut DesktopEngine, _window: &Arc<Window>) -> Result<Self> {
        let cube = engine.geometries.add(Geometry::cube());
        let scene = &mut engine.scene;

        let pivot = scene.create_node(
            Node::with_name("Pivot")
                .with_component(Transform::new())
                .with_component(Model::new(cube))
                .with_component(FnBehavior::new(|ctx| {
                    let time = ctx.time;
                    if let Some(transform) = ctx.get_mut::<Transform>() {
                        transform.rotation =
                            Quat::from_rotation_x(time * 0.6) * Quat::from_rotation_y(time * 0.7);
                    }
                })),
        );

        let satellite = scene.create_node(
            Node::with_name("Satellite")
                .with_component(
                    Transform::from_translation(Vec3::new(3.0, 0.0, 0.0))
                        .with_scale(Vec3::splat(0.4)),
                )
                .with_component(Model::new(cube))
                .with_component(
                    RotateAnimator::new(Quat::IDENTITY, Quat::from_xyzw(0.7071, 0.0, 0.7071, 0.0), 5.0)
                        .with_loop(LoopMode::Loop),
                ),
        );
        scene.add_child(pivot, satellite)?;

        scene.create_node(
            Node::with_name("Light")
                .with_component(Transform::from_translation(Vec3::splat(3.0)))
                .with_component(Light::with_ambient(0.3))
                .with_component(
                    LinearAnimator::new(Vec3::splat(3.0), Vec3::splat(-3.0), 4.0)
                        .with_loop(LoopMode::PingPong),
                ),
        );

        let camera = scene.create_node(
            Node::with_name("Camera")
                .with_component(Transform::from_translation(Vec3::new(0.0, 0.0, 8.0)))
                .with_component(Camera::default()),
        );
        engine.set_active_camera(camera)?;

        log::info!("Scene ready: {} nodes", engine.scene.len());
        Ok(Self)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    App::new()
        .with_title("Trellis: Spinning Scene")
        .with_size(1024, 768)
        .run::<SpinningScene>()?;

    Ok(())
}
