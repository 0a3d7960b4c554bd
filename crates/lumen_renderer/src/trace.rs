//! Path-trace kernel: ray/sphere intersection and the per-pixel bounce loop.
//!
//! Everything here is a pure function over read-only scene and camera
//! data plus a caller-supplied RNG, so the orchestrator can evaluate
//! pixels concurrently with no shared mutable state.

use lumen_core::Scene;
use lumen_math::{Interval, Ray, Vec3, Vec4};
use rand::RngCore;

use crate::camera::Camera;

/// Direction vectors shorter than this are treated as degenerate: the
/// quadratic's leading coefficient would vanish and the root formulas
/// would divide by zero.
const DEGENERATE_DIRECTION: f32 = 1e-8;

/// Fixed shading and bounce constants, overridable for testing.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum path segments per pixel per frame
    pub bounces: u32,
    /// Radiance contributed by rays that escape the scene
    pub sky_color: Vec3,
    /// Direction the fixed light travels (unit vector)
    pub light_direction: Vec3,
    /// Offset along the normal for secondary ray origins, avoids
    /// immediate self-intersection
    pub surface_offset: f32,
    /// Reflectance multiplier decay applied after each bounce
    pub bounce_attenuation: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bounces: 5,
            sky_color: Vec3::new(0.6, 0.7, 0.9),
            light_direction: Vec3::new(-1.0, -1.0, -1.0).normalize(),
            surface_offset: 1e-4,
            bounce_attenuation: 0.5,
        }
    }
}

/// Result of one intersection query.
///
/// Transient: produced per `trace_ray` call, never persisted. A miss is
/// encoded as a negative hit distance.
#[derive(Debug, Clone, Copy)]
pub struct HitPayload {
    pub hit_distance: f32,
    pub world_position: Vec3,
    pub world_normal: Vec3,
    /// Index of the hit sphere in the scene
    pub object_index: usize,
}

impl HitPayload {
    /// Sentinel payload for rays that hit nothing.
    pub const MISS: Self = Self {
        hit_distance: -1.0,
        world_position: Vec3::ZERO,
        world_normal: Vec3::ZERO,
        object_index: usize::MAX,
    };

    #[inline]
    pub fn is_miss(&self) -> bool {
        self.hit_distance < 0.0
    }
}

/// Intersect a ray against every sphere in the scene.
///
/// Brute-force linear scan, no early exit and no spatial acceleration.
/// The closest intersection in front of the ray origin wins.
pub fn trace_ray(scene: &Scene, ray: &Ray) -> HitPayload {
    let a = ray.direction().length_squared();
    if a < DEGENERATE_DIRECTION {
        return HitPayload::MISS;
    }

    // Acceptable range shrinks as closer hits are found
    let mut acceptable = Interval::new(0.0, f32::INFINITY);
    let mut closest_index = None;

    for (index, sphere) in scene.spheres.iter().enumerate() {
        // Degenerate spheres have no surface and an undefined normal
        if sphere.radius <= 0.0 {
            continue;
        }

        let origin = ray.origin() - sphere.center;
        let b = 2.0 * origin.dot(ray.direction());
        let c = origin.length_squared() - sphere.radius * sphere.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            continue;
        }

        // Near root; a > 0, so this is the smaller of the two
        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        if acceptable.surrounds(t) {
            acceptable.max = t;
            closest_index = Some(index);
        }
    }

    match closest_index {
        Some(index) => closest_hit(scene, ray, acceptable.max, index),
        None => HitPayload::MISS,
    }
}

/// Build the payload for the closest accepted hit.
fn closest_hit(scene: &Scene, ray: &Ray, hit_distance: f32, object_index: usize) -> HitPayload {
    let sphere = &scene.spheres[object_index];

    // Work in the sphere's local frame where the normal is just the
    // normalized hit position
    let local_position = (ray.origin() - sphere.center) + hit_distance * ray.direction();
    let world_normal = local_position.normalize_or_zero();

    HitPayload {
        hit_distance,
        world_position: local_position + sphere.center,
        world_normal,
        object_index,
    }
}

/// Sample a vector uniformly from the cube [-0.5, 0.5]^3.
///
/// Scaled by material roughness, this perturbs the shading normal before
/// reflection, spreading scattered rays around the mirror direction.
pub fn scatter_vector(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(
        gen_f32(rng) - 0.5,
        gen_f32(rng) - 0.5,
        gen_f32(rng) - 0.5,
    )
}

#[inline]
fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    use rand::Rng;
    rng.gen()
}

/// Reflect a vector about a (possibly perturbed, non-unit) normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Compute one radiance sample for a pixel.
///
/// Builds the primary ray from the camera's position and cached
/// direction table, then follows up to `config.bounces` path segments.
/// Rays that escape pick up the sky color once and terminate the path;
/// each surface hit contributes `albedo * lambert * multiplier` with the
/// multiplier halving per bounce.
///
/// The caller guarantees `x < camera.width()` and `y < camera.height()`,
/// that the scene passed validation, and that neither scene nor camera
/// mutate for the duration of the call. Under those contracts this is
/// safe to invoke concurrently for distinct pixels.
pub fn per_pixel(
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Vec4 {
    let pixel_index = (x + y * camera.width()) as usize;
    let mut ray = Ray::new(camera.position(), camera.ray_directions()[pixel_index]);

    let mut color = Vec3::ZERO;
    let mut multiplier = 1.0;

    for _ in 0..config.bounces {
        let payload = trace_ray(scene, &ray);
        if payload.is_miss() {
            color += config.sky_color * multiplier;
            break;
        }

        let light_intensity = payload.world_normal.dot(-config.light_direction).max(0.0);

        let sphere = &scene.spheres[payload.object_index];
        let material = &scene.materials[sphere.material_index];

        color += material.albedo * light_intensity * multiplier;
        multiplier *= config.bounce_attenuation;

        // Bounce: nudge off the surface, then mirror-reflect about the
        // roughness-perturbed normal
        let origin = payload.world_position + payload.world_normal * config.surface_offset;
        let perturbed_normal = payload.world_normal + material.roughness * scatter_vector(rng);
        ray = Ray::new(origin, reflect(ray.direction(), perturbed_normal));
    }

    color.extend(1.0)
}
