//! Application Module
//!
//! - [`scheduler`]: the frame scheduler and its callback contract
//! - [`winit`] (feature `winit`): desktop runner driving the scheduler from a
//!   winit event loop

pub mod scheduler;

#[cfg(feature = "winit")]
pub mod winit;

pub use scheduler::{
    Callbacks, FrameHandler, FrameScheduler, FrameState, RefreshSignal, ResizeSystem,
    SchedulerState, UpdateSystem,
};
