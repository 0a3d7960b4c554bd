//! Lumen Renderer - interactive progressive CPU path tracing.
//!
//! A stochastic sphere tracer that converges over time: each frame adds
//! one radiance sample per pixel to an accumulation buffer, and the
//! displayed image is the running average. Camera motion, scene edits,
//! and resizes restart accumulation.
//!
//! The crate is headless on purpose. Window, input, and scene-editing
//! collaborators talk to it through `CameraInput`, `Scene`, and the
//! packed RGBA output buffer.

mod camera;
mod renderer;
mod trace;

pub use camera::{Camera, CameraConfig, CameraInput};
pub use renderer::{RenderError, Renderer, RendererSettings};
pub use trace::{per_pixel, scatter_vector, trace_ray, HitPayload, RenderConfig};

/// Re-export the scene model and common math types
pub use lumen_core::{Material, Scene, Sphere};
pub use lumen_math::{Interval, Ray, Vec2, Vec3, Vec4};
