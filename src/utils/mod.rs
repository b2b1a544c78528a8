//! Utility Module
//!
//! - [`time`]: clock sources driving the frame scheduler

pub mod time;

pub use time::{Clock, ManualClock, SystemClock};
