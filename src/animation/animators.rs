use glam::{Quat, Vec3};

use crate::scene::component::{Component, UpdateContext, Updatable};
use crate::scene::transform::Transform;

/// How an animation behaves past its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Hold the end value.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
    /// Play forward then backward.
    PingPong,
}

impl LoopMode {
    /// Normalized progress in `[0, 1]` for `elapsed` seconds of a `duration`-long animation.
    #[must_use]
    pub fn progress(self, elapsed: f32, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 1.0;
        }
        let t = (elapsed / duration).max(0.0);
        match self {
            Self::Once => t.min(1.0),
            Self::Loop => t.fract(),
            Self::PingPong => {
                let phase = t % 2.0;
                if phase > 1.0 { 2.0 - phase } else { phase }
            }
        }
    }
}

/// Rotates the node from `start_rotation` to `end_rotation` over `duration` seconds.
#[derive(Debug, Clone)]
pub struct RotateAnimator {
    pub start_rotation: Quat,
    pub end_rotation: Quat,
    pub start_time: f32,
    pub duration: f32,
    pub loop_mode: LoopMode,
}

impl RotateAnimator {
    #[must_use]
    pub fn new(start_rotation: Quat, end_rotation: Quat, duration: f32) -> Self {
        Self {
            start_rotation: start_rotation.normalize(),
            end_rotation: end_rotation.normalize(),
            start_time: 0.0,
            duration,
            loop_mode: LoopMode::Once,
        }
    }

    #[must_use]
    pub fn with_loop(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[must_use]
    pub fn with_start_time(mut self, start_time: f32) -> Self {
        self.start_time = start_time;
        self
    }

    /// Rotation at scheduler time `time`.
    #[must_use]
    pub fn sample(&self, time: f32) -> Quat {
        let t = self.loop_mode.progress(time - self.start_time, self.duration);
        self.start_rotation.slerp(self.end_rotation, t)
    }
}

impl Component for RotateAnimator {
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for RotateAnimator {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let rotation = self.sample(ctx.time);
        if let Some(transform) = ctx.get_mut::<Transform>() {
            transform.rotation = rotation;
        }
    }
}

/// Moves the node from `start_position` to `end_position` over `duration` seconds.
#[derive(Debug, Clone)]
pub struct LinearAnimator {
    pub start_position: Vec3,
    pub end_position: Vec3,
    pub start_time: f32,
    pub duration: f32,
    pub loop_mode: LoopMode,
}

impl LinearAnimator {
    #[must_use]
    pub fn new(start_position: Vec3, end_position: Vec3, duration: f32) -> Self {
        Self {
            start_position,
            end_position,
            start_time: 0.0,
            duration,
            loop_mode: LoopMode::Once,
        }
    }

    #[must_use]
    pub fn with_loop(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[must_use]
    pub fn with_start_time(mut self, start_time: f32) -> Self {
        self.start_time = start_time;
        self
    }

    #[must_use]
    pub fn sample(&self, time: f32) -> Vec3 {
        let t = self.loop_mode.progress(time - self.start_time, self.duration);
        self.start_position.lerp(self.end_position, t)
    }
}

impl Component for LinearAnimator {
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for LinearAnimator {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let position = self.sample(ctx.time);
        if let Some(transform) = ctx.get_mut::<Transform>() {
            transform.translation = position;
        }
    }
}
