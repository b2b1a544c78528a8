//! Renderer Settings
//!
//! Consumed once when the GPU context is created.
//!
//! ```rust,ignore
//! let settings = RenderSettings {
//!     vsync: false,
//!     ..Default::default()
//! };
//!
//! App::new().with_settings(settings).run::<MyApp>()?;
//! ```

/// Linear RGBA clear color.
pub type ClearColor = [f64; 4];

/// Global configuration for renderer initialization.
///
/// | Field              | Description                     | Default              |
/// |--------------------|---------------------------------|----------------------|
/// | `clear_color`      | Framebuffer clear color         | `(0.7, 0.8, 0.9, 1)` |
/// | `vsync`            | Vertical sync enabled           | `true`               |
/// | `power_preference` | GPU adapter selection strategy  | `HighPerformance`    |
/// | `depth_format`     | Depth buffer texture format     | `Depth24Plus`        |
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Background clear color, applied at the start of every frame.
    pub clear_color: ClearColor,

    /// Cap the frame rate to the display refresh rate.
    pub vsync: bool,

    #[cfg(feature = "wgpu")]
    pub power_preference: wgpu::PowerPreference,

    #[cfg(feature = "wgpu")]
    pub depth_format: wgpu::TextureFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: [0.7, 0.8, 0.9, 1.0],
            vsync: true,
            #[cfg(feature = "wgpu")]
            power_preference: wgpu::PowerPreference::HighPerformance,
            #[cfg(feature = "wgpu")]
            depth_format: wgpu::TextureFormat::Depth24Plus,
        }
    }
}

#[cfg(feature = "wgpu")]
impl RenderSettings {
    #[must_use]
    pub fn wgpu_clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}
