//! wgpu Backend
//!
//! - [`WgpuContext`]: device, queue, surface and the depth buffer
//! - [`ForwardRenderer`]: single forward pass implementing
//!   [`RenderBackend`](crate::renderer::RenderBackend)

pub mod context;
pub mod forward;

pub use context::WgpuContext;
pub use forward::ForwardRenderer;
