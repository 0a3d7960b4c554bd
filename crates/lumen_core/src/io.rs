//! Scene file loading and saving.
//!
//! Scenes persist as JSON so the editing collaborator can round-trip
//! them. The render hot path never touches the filesystem; these entry
//! points run between sweeps only.

use std::fs;
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::scene::{Scene, SceneError};

/// Errors that can occur while loading or saving a scene file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scene: {0}")]
    Invalid(#[from] SceneError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene from a JSON file and validate it.
///
/// # Example
///
/// ```ignore
/// use lumen_core::load_scene;
///
/// let scene = load_scene("scene.json")?;
/// println!("Loaded {} spheres", scene.sphere_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let scene = Scene::from_json(&text)?;

    info!(
        "Loaded scene from {}: {} spheres, {} materials",
        path.display(),
        scene.sphere_count(),
        scene.material_count()
    );
    Ok(scene)
}

/// Save a scene to a JSON file.
pub fn save_scene<P: AsRef<Path>>(path: P, scene: &Scene) -> LoadResult<()> {
    let text = scene.to_json()?;
    fs::write(path.as_ref(), text)?;
    Ok(())
}

impl Scene {
    /// Parse a scene from JSON text and validate it.
    pub fn from_json(text: &str) -> LoadResult<Self> {
        let scene: Scene = serde_json::from_str(text)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Serialize the scene to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, Sphere};
    use lumen_math::Vec3;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let pink = scene.add_material(Material::new(Vec3::new(1.0, 0.0, 1.0), 0.0));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 1.0, pink));
        scene
    }

    #[test]
    fn test_json_roundtrip() {
        let scene = sample_scene();

        let text = scene.to_json().unwrap();
        let loaded = Scene::from_json(&text).unwrap();

        assert_eq!(loaded.spheres, scene.spheres);
        assert_eq!(loaded.materials, scene.materials);
    }

    #[test]
    fn test_from_json_rejects_invalid_scene() {
        // Well-formed JSON, but the sphere points at a missing material
        let text = r#"{
            "spheres": [
                { "center": [0.0, 0.0, 0.0], "radius": 1.0, "material_index": 5 }
            ],
            "materials": []
        }"#;

        let err = Scene::from_json(text).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(_)));
    }

    #[test]
    fn test_load_and_save_file() {
        let _ = env_logger::builder().is_test(true).try_init();

        let scene = sample_scene();
        let path = std::env::temp_dir().join("lumen_core_io_test.json");

        save_scene(&path, &scene).unwrap();
        let loaded = load_scene(&path).unwrap();

        assert_eq!(loaded.spheres, scene.spheres);
        let _ = std::fs::remove_file(&path);
    }
}
