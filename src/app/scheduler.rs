//! Frame Scheduler
//!
//! Drives two cascades from the host's refresh signal:
//!
//! - **Resize**: a size change reported with [`FrameScheduler::notify_resize`]
//!   is held until the next tick and delivered to [`FrameHandler::resize`]
//!   before that tick's update.
//! - **Update + render**: every tick computes `(time, dt)` from the injected
//!   [`Clock`], calls [`FrameHandler::update`], then [`FrameHandler::render`],
//!   and finally asks the [`RefreshSignal`] for the next tick.
//!
//! ```text
//!            start()                     on_refresh()
//! Stopped ───────────► Running ──┬──► flush resize ─► update ─► render ─► request_refresh
//!    ▲                           │
//!    └──────── stop() / error ───┘
//! ```
//!
//! The scheduler never blocks and never spawns threads: the host calls
//! [`FrameScheduler::on_refresh`] once per display refresh and control
//! returns to it between ticks.

use std::time::Duration;

use crate::errors::Result;
use crate::renderer::SurfaceSize;
use crate::utils::time::Clock;

/// Scheduler lifecycle. There is no paused state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
}

/// Timing of one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameState {
    /// Seconds since the first tick after the scheduler was (re)started.
    pub time: f32,
    /// Seconds since the previous tick; zero on that first tick.
    pub dt: f32,
    /// Ticks since the scheduler was (re)started, this one included.
    pub frame_count: u64,
}

/// Host hook asking for one more refresh callback.
///
/// On desktop this maps to `Window::request_redraw`; tests count the calls.
pub trait RefreshSignal {
    fn request_refresh(&self);
}

impl<S: RefreshSignal + ?Sized> RefreshSignal for &S {
    fn request_refresh(&self) {
        (**self).request_refresh();
    }
}

/// Callbacks invoked by the scheduler.
pub trait FrameHandler {
    /// Per-frame logic with the cumulative time and the delta, in seconds.
    fn update(&mut self, time: f32, dt: f32) -> Result<()>;

    /// Resolves matrices and issues the frame's draws.
    fn render(&mut self) -> Result<()>;

    /// New drawable size, delivered before the next update.
    ///
    /// Invalid sizes are passed through; the handler reports them as errors.
    fn resize(&mut self, _size: SurfaceSize) -> Result<()> {
        Ok(())
    }
}

type UpdateCallback<'a> = Box<dyn FnMut(f32, f32) -> Result<()> + 'a>;
type RenderCallback<'a> = Box<dyn FnMut() -> Result<()> + 'a>;
type ResizeCallback<'a> = Box<dyn FnMut(u32, u32) -> Result<()> + 'a>;

/// [`FrameHandler`] assembled from closures.
///
/// ```rust,ignore
/// let mut handler = Callbacks::new()
///     .on_update(|time, dt| { scene.update(time, dt) })
///     .on_render(|| Ok(()));
/// ```
pub struct Callbacks<'a> {
    update: UpdateCallback<'a>,
    render: RenderCallback<'a>,
    resize: ResizeCallback<'a>,
}

impl<'a> Callbacks<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            update: Box::new(skip_update),
            render: Box::new(skip_render),
            resize: Box::new(skip_resize),
        }
    }

    #[must_use]
    pub fn on_update(mut self, f: impl FnMut(f32, f32) -> Result<()> + 'a) -> Self {
        self.update = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_render(mut self, f: impl FnMut() -> Result<()> + 'a) -> Self {
        self.render = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_resize(mut self, f: impl FnMut(u32, u32) -> Result<()> + 'a) -> Self {
        self.resize = Box::new(f);
        self
    }
}

fn skip_update(_time: f32, _dt: f32) -> Result<()> {
    Ok(())
}

fn skip_render() -> Result<()> {
    Ok(())
}

fn skip_resize(_width: u32, _height: u32) -> Result<()> {
    Ok(())
}

impl Default for Callbacks<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHandler for Callbacks<'_> {
    fn update(&mut self, time: f32, dt: f32) -> Result<()> {
        (self.update)(time, dt)
    }

    fn render(&mut self) -> Result<()> {
        (self.render)()
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        (self.resize)(size.width, size.height)
    }
}

// ============================================================================
// Update system
// ============================================================================

/// Turns clock readings into [`FrameState`]s.
///
/// The timeline begins at the first tick after construction or
/// [`reset`](Self::reset): that tick reports `time = 0` and `dt = 0`.
#[derive(Debug)]
pub struct UpdateSystem<C: Clock> {
    clock: C,
    origin: Duration,
    last: Duration,
    frame_count: u64,
    started: bool,
}

impl<C: Clock> UpdateSystem<C> {
    pub fn new(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            origin: now,
            last: now,
            frame_count: 0,
            started: false,
        }
    }

    /// Restarts the timeline; the next tick becomes time zero.
    pub fn reset(&mut self) {
        self.started = false;
        self.frame_count = 0;
    }

    /// Reads the clock and advances to the next frame.
    pub fn tick(&mut self) -> FrameState {
        let now = self.clock.now();
        if !self.started {
            self.origin = now;
            self.last = now;
            self.started = true;
        }
        let dt = now.saturating_sub(self.last);
        self.last = now;
        self.frame_count += 1;

        FrameState {
            time: now.saturating_sub(self.origin).as_secs_f32(),
            dt: dt.as_secs_f32(),
            frame_count: self.frame_count,
        }
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

// ============================================================================
// Resize system
// ============================================================================

/// Coalesces size notifications between ticks.
///
/// Only the latest size reported before a tick is delivered, and only if it
/// differs from the last size the handler accepted.
#[derive(Debug, Default)]
pub struct ResizeSystem {
    current: Option<SurfaceSize>,
    pending: Option<SurfaceSize>,
}

impl ResizeSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, size: SurfaceSize) {
        self.pending = (self.current != Some(size)).then_some(size);
    }

    #[must_use]
    pub fn pending(&self) -> Option<SurfaceSize> {
        self.pending
    }

    /// Last size accepted by the handler.
    #[must_use]
    pub fn current(&self) -> Option<SurfaceSize> {
        self.current
    }

    /// Delivers the pending size, if any.
    ///
    /// The size is recorded as current only when the handler accepts it.
    pub fn flush<H: FrameHandler + ?Sized>(&mut self, handler: &mut H) -> Result<Option<SurfaceSize>> {
        let Some(size) = self.pending.take() else {
            return Ok(None);
        };
        log::debug!("Resize cascade: {}x{}", size.width, size.height);
        handler.resize(size)?;
        self.current = Some(size);
        Ok(Some(size))
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Run loop over an injected clock and refresh signal.
pub struct FrameScheduler<C: Clock, S: RefreshSignal> {
    state: SchedulerState,
    update: UpdateSystem<C>,
    resize: ResizeSystem,
    signal: S,
}

impl<C: Clock, S: RefreshSignal> FrameScheduler<C, S> {
    pub fn new(clock: C, signal: S) -> Self {
        Self {
            state: SchedulerState::Stopped,
            update: UpdateSystem::new(clock),
            resize: ResizeSystem::new(),
            signal,
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Stopped → Running. Resets the clock and requests the first tick.
    ///
    /// Calling it while running does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            log::debug!("FrameScheduler::start ignored: already running");
            return;
        }
        self.update.reset();
        self.state = SchedulerState::Running;
        log::debug!("FrameScheduler started");
        self.signal.request_refresh();
    }

    /// Running → Stopped. A tick already in progress is not interrupted.
    pub fn stop(&mut self) {
        if !self.is_running() {
            log::debug!("FrameScheduler::stop ignored: already stopped");
            return;
        }
        self.state = SchedulerState::Stopped;
        log::debug!("FrameScheduler stopped");
    }

    /// Records a drawable size change for the next tick.
    pub fn notify_resize(&mut self, width: u32, height: u32) {
        self.resize.notify(SurfaceSize::new(width, height));
    }

    #[must_use]
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.resize.current()
    }

    /// Asks the host for another tick without running one.
    pub fn request_refresh(&self) {
        if self.is_running() {
            self.signal.request_refresh();
        }
    }

    /// Runs one tick. Call once per refresh callback.
    ///
    /// Returns `Ok(None)` without touching the handler when stopped. A failing
    /// callback stops the scheduler and its error is returned; the rest of the
    /// tick is skipped.
    pub fn on_refresh<H: FrameHandler + ?Sized>(&mut self, handler: &mut H) -> Result<Option<FrameState>> {
        if !self.is_running() {
            log::trace!("Refresh while stopped, ignoring");
            return Ok(None);
        }

        match self.run_tick(handler) {
            Ok(frame) => {
                self.signal.request_refresh();
                Ok(Some(frame))
            }
            Err(err) => {
                log::error!("Frame callback failed, stopping scheduler: {err}");
                self.state = SchedulerState::Stopped;
                Err(err)
            }
        }
    }

    fn run_tick<H: FrameHandler + ?Sized>(&mut self, handler: &mut H) -> Result<FrameState> {
        self.resize.flush(handler)?;

        let frame = self.update.tick();
        log::trace!(
            "Tick {}: time={:.4}s dt={:.4}s",
            frame.frame_count,
            frame.time,
            frame.dt
        );

        handler.update(frame.time, frame.dt)?;
        handler.render()?;
        Ok(frame)
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        self.update.clock()
    }

    #[must_use]
    pub fn signal(&self) -> &S {
        &self.signal
    }
}
