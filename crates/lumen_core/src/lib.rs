//! Lumen Core - Scene data model for the path tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Sphere`, `Material`
//! - **Validation**: index and geometry checks a renderer relies on
//! - **Persistence**: JSON load/save for scene files
//!
//! # Example
//!
//! ```
//! use lumen_core::{Material, Scene, Sphere};
//! use lumen_math::Vec3;
//!
//! let mut scene = Scene::new();
//! let pink = scene.add_material(Material::new(Vec3::new(1.0, 0.0, 1.0), 0.0));
//! scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, pink));
//! assert!(scene.validate().is_ok());
//! ```

pub mod io;
pub mod scene;

// Re-export commonly used types
pub use io::{load_scene, save_scene, LoadError};
pub use scene::{Material, Scene, SceneError, Sphere};
