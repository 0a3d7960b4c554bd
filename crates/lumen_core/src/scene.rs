//! Scene types for Lumen.
//!
//! The scene is deliberately flat: an ordered list of spheres and an
//! ordered list of materials, related by index. Many spheres may share
//! one material. The scene owns no camera and no lights; the renderer's
//! single directional light lives in its render configuration.

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a malformed scene can produce.
///
/// A renderer validates up front and refuses to trace a scene that would
/// index out of bounds or divide by zero mid-sweep.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("sphere {sphere} references material {index}, but scene has {count} materials")]
    InvalidMaterialIndex {
        sphere: usize,
        index: usize,
        count: usize,
    },
}

/// Surface description shared by spheres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base reflected color, each channel in [0, 1]
    pub albedo: Vec3,
    /// Angular spread of scattered reflections: 0 = mirror, 1 = fully diffuse
    pub roughness: f32,
    /// Reserved for a metallic reflectance model
    pub metallic: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::ONE,
            roughness: 1.0,
            metallic: 0.0,
        }
    }
}

impl Material {
    /// Create a material with the given albedo and roughness.
    pub fn new(albedo: Vec3, roughness: f32) -> Self {
        Self {
            albedo,
            roughness,
            ..Default::default()
        }
    }
}

/// A sphere primitive referencing a material by index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Center in world space
    pub center: Vec3,
    /// Radius, must be positive for the sphere to be hittable
    pub radius: f32,
    /// Index into the scene's material list
    pub material_index: usize,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.5,
            material_index: 0,
        }
    }
}

impl Sphere {
    /// Create a sphere at `center` with the given radius and material.
    pub fn new(center: Vec3, radius: f32, material_index: usize) -> Self {
        Self {
            center,
            radius,
            material_index,
        }
    }
}

/// A complete scene: spheres plus the materials they reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub materials: Vec<Material>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        let index = self.materials.len();
        self.materials.push(material);
        index
    }

    /// Add a sphere to the scene.
    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// Look up a sphere's material.
    ///
    /// Returns `None` when the sphere's material index is out of range;
    /// `validate` reports that as an error before rendering starts.
    pub fn material_for(&self, sphere: &Sphere) -> Option<&Material> {
        self.materials.get(sphere.material_index)
    }

    /// Get sphere count.
    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Check if the scene has nothing to trace.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Check that every sphere's material index is in range.
    ///
    /// The renderer refuses to trace a scene that fails this check
    /// rather than indexing out of bounds mid-sweep. Degenerate radii
    /// are not an error here; the intersection scan skips them.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (i, sphere) in self.spheres.iter().enumerate() {
            if sphere.material_index >= self.materials.len() {
                return Err(SceneError::InvalidMaterialIndex {
                    sphere: i,
                    index: sphere.material_index,
                    count: self.materials.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let pink = scene.add_material(Material::new(Vec3::new(1.0, 0.0, 1.0), 0.0));
        let blue = scene.add_material(Material::new(Vec3::new(0.2, 0.3, 1.0), 0.1));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, pink));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, -101.0, 0.0), 100.0, blue));
        scene
    }

    #[test]
    fn test_scene_creation() {
        let scene = two_sphere_scene();

        assert_eq!(scene.sphere_count(), 2);
        assert_eq!(scene.material_count(), 2);
        assert!(!scene.is_empty());
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_material_lookup() {
        let scene = two_sphere_scene();

        let material = scene.material_for(&scene.spheres[0]).unwrap();
        assert_eq!(material.albedo, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(material.roughness, 0.0);
    }

    #[test]
    fn test_shared_material() {
        // Many spheres may reference the same material index
        let mut scene = Scene::new();
        let grey = scene.add_material(Material::default());
        scene.add_sphere(Sphere::new(Vec3::X, 0.5, grey));
        scene.add_sphere(Sphere::new(-Vec3::X, 0.5, grey));

        assert_eq!(scene.material_count(), 1);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_material_index() {
        let mut scene = Scene::new();
        scene.add_material(Material::default());
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, 3));

        assert_eq!(
            scene.validate(),
            Err(SceneError::InvalidMaterialIndex {
                sphere: 0,
                index: 3,
                count: 1,
            })
        );
    }

    #[test]
    fn test_validate_allows_degenerate_radius() {
        // Radius zero is skipped by intersection, not rejected up front,
        // so an editor can drag a radius through zero without the
        // renderer erroring out.
        let mut scene = Scene::new();
        scene.add_material(Material::default());
        scene.add_sphere(Sphere::new(Vec3::ZERO, 0.0, 0));

        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_empty_scene_is_valid() {
        assert!(Scene::new().validate().is_ok());
        assert!(Scene::new().is_empty());
    }
}
