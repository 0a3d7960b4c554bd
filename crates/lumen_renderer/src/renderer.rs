//! Frame orchestration: the accumulating progressive renderer.
//!
//! Each `render` call sweeps every pixel once, adds the new radiance
//! sample into a running per-pixel sum, and writes the clamped average
//! into a packed 8-bit RGBA output buffer. While the camera and scene
//! stay still the average converges; any motion or edit resets the
//! frame index and restarts convergence from scratch.

use std::time::{Duration, Instant};

use log::{debug, trace};
use lumen_core::{Scene, SceneError};
use lumen_math::Vec4;
use rayon::prelude::*;
use thiserror::Error;

use crate::camera::Camera;
use crate::trace::{per_pixel, RenderConfig};

/// Errors a render call can report before any pixel is touched.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid scene: {0}")]
    InvalidScene(#[from] SceneError),

    #[error("camera viewport {camera_width}x{camera_height} does not match renderer buffers {width}x{height}")]
    ViewportMismatch {
        camera_width: u32,
        camera_height: u32,
        width: u32,
        height: u32,
    },
}

/// Renderer toggles.
#[derive(Debug, Clone, Copy)]
pub struct RendererSettings {
    /// When false every frame is a fresh single-sample render
    pub accumulate: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self { accumulate: true }
    }
}

/// Progressive path-tracing renderer.
///
/// Owns the accumulation buffer, the packed output buffer, and the frame
/// index. The output buffer (`final_image` / `image_bytes`) is the only
/// data the display collaborator reads.
pub struct Renderer {
    width: u32,
    height: u32,

    /// Packed RGBA, red in the low byte, alpha forced opaque
    image_data: Vec<u32>,
    /// Unclamped running sum of radiance samples, parallel to `image_data`
    accumulation: Vec<Vec4>,
    /// Frames accumulated since the last reset, starts at 1
    frame_index: u32,

    settings: RendererSettings,
    config: RenderConfig,
    last_render_time: Duration,
}

impl Renderer {
    /// Create a renderer with no allocated buffers; call `on_resize`
    /// before rendering.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            image_data: Vec::new(),
            accumulation: Vec::new(),
            frame_index: 1,
            settings: RendererSettings::default(),
            config: RenderConfig::default(),
            last_render_time: Duration::ZERO,
        }
    }

    /// Override the kernel constants.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Resize the output and accumulation buffers.
    ///
    /// No-op when the dimensions are unchanged. A real resize discards
    /// the accumulated sums, since they no longer correspond to the new
    /// pixel grid.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }

        debug!("Resizing render buffers to {width}x{height}");
        self.width = width;
        self.height = height;

        let pixel_count = width as usize * height as usize;
        self.image_data = vec![0; pixel_count];
        self.accumulation = vec![Vec4::ZERO; pixel_count];
        self.frame_index = 1;
    }

    /// Restart accumulation on the next render.
    ///
    /// Callers invoke this on camera motion or any scene/material edit;
    /// the accumulated sums are only valid for a static scene and camera.
    pub fn reset_frame_index(&mut self) {
        self.frame_index = 1;
    }

    /// Render one frame: trace every pixel, integrate, and repack.
    ///
    /// The scene and camera must not be mutated while this runs; the
    /// sweep always completes once started.
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        scene.validate()?;
        if camera.width() != self.width || camera.height() != self.height {
            return Err(RenderError::ViewportMismatch {
                camera_width: camera.width(),
                camera_height: camera.height(),
                width: self.width,
                height: self.height,
            });
        }

        let timer = Instant::now();

        if self.frame_index == 1 {
            self.accumulation.fill(Vec4::ZERO);
        }

        let width = self.width as usize;
        let frame_index = self.frame_index;
        let config = &self.config;

        if width > 0 {
            // Row-partitioned sweep: each task owns one row of both
            // buffers, so no write ever races another task's indices.
            self.accumulation
                .par_chunks_mut(width)
                .zip(self.image_data.par_chunks_mut(width))
                .enumerate()
                .for_each(|(y, (accumulation_row, image_row))| {
                    let mut rng = rand::thread_rng();

                    for (x, (sum, pixel)) in accumulation_row
                        .iter_mut()
                        .zip(image_row.iter_mut())
                        .enumerate()
                    {
                        let sample =
                            per_pixel(scene, camera, x as u32, y as u32, config, &mut rng);

                        // A corrupted sum would persist until the next
                        // reset, so non-finite samples contribute nothing
                        if sample.is_finite() {
                            *sum += sample;
                        }

                        let color = (*sum / frame_index as f32).clamp(Vec4::ZERO, Vec4::ONE);
                        *pixel = pack_rgba(color);
                    }
                });
        }

        if self.settings.accumulate {
            self.frame_index += 1;
        } else {
            self.frame_index = 1;
        }

        self.last_render_time = timer.elapsed();
        trace!(
            "Rendered {}x{} frame {} in {:?}",
            self.width,
            self.height,
            frame_index,
            self.last_render_time
        );
        Ok(())
    }

    /// Packed RGBA output, indexed `x + y * width`.
    pub fn final_image(&self) -> &[u32] {
        &self.image_data
    }

    /// Output buffer as raw bytes (r, g, b, a per pixel on
    /// little-endian hosts), ready for texture upload or file encoding.
    pub fn image_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.image_data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frames accumulated since the last reset (1 = fresh).
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Wall-clock duration of the most recent render call.
    pub fn last_render_time(&self) -> Duration {
        self.last_render_time
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack a clamped linear color into ABGR-ordered bytes (red lowest),
/// forcing the alpha channel opaque.
#[inline]
fn pack_rgba(color: Vec4) -> u32 {
    let r = (color.x * 255.0) as u32;
    let g = (color.y * 255.0) as u32;
    let b = (color.z * 255.0) as u32;
    0xff00_0000 | (b << 16) | (g << 8) | r
}
