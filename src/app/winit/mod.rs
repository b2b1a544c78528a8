//! Winit-based Application Framework
//!
//! Desktop frontend: opens a window, creates the wgpu
//! [`ForwardRenderer`], and lets a [`FrameScheduler`] drive the [`Engine`]
//! from winit's redraw events.
//!
//! - [`App`]: builder for configuring and launching applications
//! - [`AppHandler`]: trait that users implement to build their scene
//!
//! Window events map onto the scheduler as follows:
//!
//! | winit event       | scheduler call            |
//! |-------------------|---------------------------|
//! | `Resized`         | `notify_resize`           |
//! | `RedrawRequested` | `on_refresh`              |
//! | `CloseRequested`  | `stop`, then exit         |
//!
//! Each completed tick asks for the next redraw, so frames keep coming for as
//! long as the scheduler runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis::app::winit::{App, AppHandler, DesktopEngine};
//!
//! struct Demo;
//!
//! impl AppHandler for Demo {
//!     fn init(engine: &mut DesktopEngine, _window: &Arc<Window>) -> Result<Self> {
//!         // Populate engine.scene, pick the camera
//!         Ok(Demo)
//!     }
//! }
//!
//! fn main() -> trellis::errors::Result<()> {
//!     App::new().with_title("Demo").run::<Demo>()
//! }
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::app::scheduler::{FrameHandler, FrameScheduler, RefreshSignal};
use crate::engine::Engine;
use crate::errors::{Result, TrellisError};
use crate::renderer::SurfaceSize;
use crate::renderer::settings::RenderSettings;
use crate::renderer::wgpu::ForwardRenderer;
use crate::utils::time::SystemClock;

/// Engine type used by the desktop frontend.
pub type DesktopEngine = Engine<ForwardRenderer>;

/// Application behavior hooks.
pub trait AppHandler: Sized + 'static {
    /// Builds the application state once the window and GPU are ready.
    ///
    /// Populate `engine.scene` and call
    /// [`Engine::set_active_camera`](crate::engine::Engine::set_active_camera)
    /// here.
    fn init(engine: &mut DesktopEngine, window: &Arc<Window>) -> Result<Self>;

    /// Called once per tick before the scene update cascade.
    fn update(&mut self, _engine: &mut DesktopEngine, _time: f32, _dt: f32) -> Result<()> {
        Ok(())
    }

    /// Raw window event hook. Return `true` to consume the event.
    fn on_event(&mut self, _engine: &mut DesktopEngine, _window: &Arc<Window>, _event: &WindowEvent) -> bool {
        false
    }
}

/// Application builder for configuring and launching the engine.
///
/// ```rust,ignore
/// App::new()
///     .with_title("My 3D Application")
///     .with_size(1024, 768)
///     .with_settings(RenderSettings {
///         vsync: true,
///         ..Default::default()
///     })
///     .run::<MyHandler>()?;
/// ```
pub struct App {
    title: String,
    size: (u32, u32),
    render_settings: RenderSettings,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Trellis".into(),
            size: (1280, 720),
            render_settings: RenderSettings::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial inner size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.render_settings = settings;
        self
    }

    /// Runs the application until the window closes.
    ///
    /// # Errors
    ///
    /// Fails if the event loop cannot be created, if GPU initialization or
    /// [`AppHandler::init`] fails, or with the error that stopped the frame
    /// scheduler.
    pub fn run<H: AppHandler>(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut runner = AppRunner::<H>::new(self);
        event_loop.run_app(&mut runner)?;

        runner.exit_error.map_or(Ok(()), Err)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Refresh signal backed by `Window::request_redraw`.
pub struct WindowSignal(Arc<Window>);

impl RefreshSignal for WindowSignal {
    fn request_refresh(&self) {
        self.0.request_redraw();
    }
}

/// Per-tick view over the engine and the user state.
struct Frame<'a, H: AppHandler> {
    engine: &'a mut DesktopEngine,
    user_state: &'a mut H,
}

impl<H: AppHandler> FrameHandler for Frame<'_, H> {
    fn update(&mut self, time: f32, dt: f32) -> Result<()> {
        self.user_state.update(self.engine, time, dt)?;
        self.engine.update(time, dt)
    }

    fn render(&mut self) -> Result<()> {
        self.engine.render()
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        self.engine.resize(size)
    }
}

struct Running<H: AppHandler> {
    window: Arc<Window>,
    engine: DesktopEngine,
    user_state: H,
    scheduler: FrameScheduler<SystemClock, WindowSignal>,
}

struct AppRunner<H: AppHandler> {
    config: App,
    running: Option<Running<H>>,
    exit_error: Option<TrellisError>,
}

impl<H: AppHandler> AppRunner<H> {
    fn new(config: App) -> Self {
        Self {
            config,
            running: None,
            exit_error: None,
        }
    }

    fn initialize(&self, event_loop: &ActiveEventLoop) -> Result<Running<H>> {
        let (width, height) = self.config.size;
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        log::info!("Initializing Renderer Backend...");
        let size = surface_size(window.inner_size());
        let backend = ForwardRenderer::new_blocking(
            window.clone(),
            &self.config.render_settings,
            SurfaceSize::new(size.width.max(1), size.height.max(1)),
        )?;

        let mut engine = Engine::new(backend);
        let user_state = H::init(&mut engine, &window)?;

        let mut scheduler = FrameScheduler::new(SystemClock::new(), WindowSignal(window.clone()));
        if size.is_valid() {
            scheduler.notify_resize(size.width, size.height);
        }
        scheduler.start();

        Ok(Running {
            window,
            engine,
            user_state,
            scheduler,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: TrellisError) {
        log::error!("Fatal error: {err}");
        self.exit_error.get_or_insert(err);
        event_loop.exit();
    }
}

impl<H: AppHandler> ApplicationHandler for AppRunner<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.initialize(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        if running
            .user_state
            .on_event(&mut running.engine, &running.window, &event)
        {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                running.scheduler.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let size = surface_size(physical_size);
                if size.is_valid() {
                    running.scheduler.notify_resize(size.width, size.height);
                    running.scheduler.request_refresh();
                } else {
                    log::debug!("Ignoring zero-sized resize (minimized)");
                }
            }
            WindowEvent::RedrawRequested => {
                let mut frame = Frame {
                    engine: &mut running.engine,
                    user_state: &mut running.user_state,
                };
                if let Err(err) = running.scheduler.on_refresh(&mut frame) {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}

fn surface_size(size: PhysicalSize<u32>) -> SurfaceSize {
    SurfaceSize::new(size.width, size.height)
}
