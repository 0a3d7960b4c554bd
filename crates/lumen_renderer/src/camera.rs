//! Interactive camera with a cached per-pixel ray-direction table.
//!
//! The expensive part of primary-ray generation (unprojecting every
//! pixel through the inverse projection and view matrices) only depends
//! on camera state, so it is recomputed when the camera moves or the
//! viewport resizes and reused for every frame in between. A static
//! camera therefore pays nothing per frame, which is what makes
//! accumulation-based convergence cheap.

use lumen_math::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Tunable camera constants.
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    /// Translation speed in world units per second
    pub movement_speed: f32,
    /// Rotation applied per unit of scaled pointer delta
    pub rotation_speed: f32,
    /// Scale applied to raw pointer deltas before rotation
    pub look_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            rotation_speed: 0.3,
            look_sensitivity: 0.002,
        }
    }
}

/// Per-frame input state supplied by the windowing collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraInput {
    /// Pointer movement since the previous frame, in raw input units
    pub pointer_delta: Vec2,
    pub move_forward: bool,
    pub move_back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub move_down: bool,
    pub move_up: bool,
    /// Free-look gate; while disengaged the camera ignores all input
    pub look_engaged: bool,
}

/// First-person camera. Yaw spins around world-up and pitch around the
/// camera's current right axis, so the view never rolls.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,

    vertical_fov: f32,
    near_clip: f32,
    far_clip: f32,

    viewport_width: u32,
    viewport_height: u32,

    // Cached derived state, rebuilt on any pose or viewport change
    projection: Mat4,
    inverse_projection: Mat4,
    view: Mat4,
    inverse_view: Mat4,
    ray_directions: Vec<Vec3>,

    config: CameraConfig,
}

const WORLD_UP: Vec3 = Vec3::Y;

impl Camera {
    /// Create a camera at (0, 0, 5) looking down -Z.
    ///
    /// `vertical_fov` is in degrees. The viewport starts at 0x0; call
    /// `resize` before reading the ray cache.
    pub fn new(vertical_fov: f32, near_clip: f32, far_clip: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEG_Z,
            vertical_fov,
            near_clip,
            far_clip,
            viewport_width: 0,
            viewport_height: 0,
            projection: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            ray_directions: Vec::new(),
            config: CameraConfig::default(),
        };
        camera.recalculate_view();
        camera
    }

    /// Override the camera constants.
    pub fn with_config(mut self, config: CameraConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply one frame of movement and look input.
    ///
    /// Returns true if the camera moved or rotated, in which case the
    /// view matrix and ray-direction cache were rebuilt and the caller
    /// should reset accumulation.
    pub fn update(&mut self, delta_time: f32, input: &CameraInput) -> bool {
        if !input.look_engaged {
            return false;
        }

        let right = self.forward.cross(WORLD_UP);
        let step = self.config.movement_speed * delta_time;
        let mut moved = false;

        if input.move_forward {
            self.position += self.forward * step;
            moved = true;
        } else if input.move_back {
            self.position -= self.forward * step;
            moved = true;
        }
        if input.strafe_left {
            self.position -= right * step;
            moved = true;
        } else if input.strafe_right {
            self.position += right * step;
            moved = true;
        }
        if input.move_down {
            self.position -= WORLD_UP * step;
            moved = true;
        } else if input.move_up {
            self.position += WORLD_UP * step;
            moved = true;
        }

        let delta = input.pointer_delta * self.config.look_sensitivity;
        if delta != Vec2::ZERO {
            let pitch_delta = delta.y * self.config.rotation_speed;
            let yaw_delta = delta.x * self.config.rotation_speed;

            // Combined rotation: pitch around the current right axis,
            // yaw around world-up. Keeping yaw off the camera's own up
            // axis is what prevents roll from creeping in.
            let q = (Quat::from_axis_angle(right, -pitch_delta)
                * Quat::from_axis_angle(WORLD_UP, -yaw_delta))
            .normalize();
            self.forward = q * self.forward;

            moved = true;
        }

        if moved {
            self.recalculate_view();
            self.recalculate_ray_directions();
        }
        moved
    }

    /// Resize the viewport.
    ///
    /// Returns false without touching any cached state when the
    /// dimensions are unchanged; otherwise rebuilds the projection
    /// matrices and the ray-direction cache and returns true.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.viewport_width && height == self.viewport_height {
            return false;
        }

        self.viewport_width = width;
        self.viewport_height = height;

        self.recalculate_projection();
        self.recalculate_ray_directions();
        true
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.forward
    }

    pub fn width(&self) -> u32 {
        self.viewport_width
    }

    pub fn height(&self) -> u32 {
        self.viewport_height
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn inverse_projection(&self) -> &Mat4 {
        &self.inverse_projection
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn inverse_view(&self) -> &Mat4 {
        &self.inverse_view
    }

    /// World-space unit ray direction per pixel, indexed `x + y * width`.
    pub fn ray_directions(&self) -> &[Vec3] {
        &self.ray_directions
    }

    fn recalculate_projection(&mut self) {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            self.projection = Mat4::IDENTITY;
            self.inverse_projection = Mat4::IDENTITY;
            return;
        }

        let aspect = self.viewport_width as f32 / self.viewport_height as f32;
        self.projection = Mat4::perspective_rh_gl(
            self.vertical_fov.to_radians(),
            aspect,
            self.near_clip,
            self.far_clip,
        );
        self.inverse_projection = self.projection.inverse();
    }

    fn recalculate_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, WORLD_UP);
        self.inverse_view = self.view.inverse();
    }

    fn recalculate_ray_directions(&mut self) {
        let width = self.viewport_width as usize;
        let height = self.viewport_height as usize;
        self.ray_directions.resize(width * height, Vec3::ZERO);

        for y in 0..height {
            for x in 0..width {
                // Map to [-1, 1] NDC. This uses the pixel's integer
                // corner rather than its center, keeping the inherited
                // half-pixel bias of the original ray generator.
                let coord = Vec2::new(
                    x as f32 / self.viewport_width as f32,
                    y as f32 / self.viewport_height as f32,
                ) * 2.0
                    - 1.0;

                // Unproject to the far plane, perspective-divide, then
                // rotate into world space (w = 0 keeps it a direction).
                let target = self.inverse_projection * Vec4::new(coord.x, coord.y, 1.0, 1.0);
                let view_direction = (target.truncate() / target.w).normalize();
                let ray_direction = (self.inverse_view * view_direction.extend(0.0)).truncate();

                self.ray_directions[x + y * width] = ray_direction;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_near(a: Vec3, b: Vec3, tolerance: f32) {
        assert!(
            (a - b).length() < tolerance,
            "expected {b:?}, got {a:?} (tolerance {tolerance})"
        );
    }

    #[test]
    fn test_default_pose() {
        let camera = Camera::new(45.0, 0.1, 100.0);

        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.direction(), Vec3::NEG_Z);
        assert!(camera.ray_directions().is_empty());
    }

    #[test]
    fn test_resize_builds_ray_cache() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);

        assert!(camera.resize(4, 3));
        assert_eq!(camera.ray_directions().len(), 12);

        // Every cached direction is (close to) unit length
        for dir in camera.ray_directions() {
            assert!((dir.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_resize_same_dimensions_is_noop() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);

        assert!(camera.resize(8, 8));
        let cached: Vec<Vec3> = camera.ray_directions().to_vec();

        assert!(!camera.resize(8, 8));
        assert_eq!(camera.ray_directions(), cached.as_slice());
    }

    #[test]
    fn test_resize_to_zero_is_safe() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);

        assert!(camera.resize(0, 16));
        assert!(camera.ray_directions().is_empty());

        assert!(camera.resize(0, 0));
        assert!(camera.ray_directions().is_empty());
    }

    #[test]
    fn test_center_ray_points_down_view_axis() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.resize(2, 2);

        // With the integer-corner NDC convention, pixel (1, 1) of a 2x2
        // viewport lands exactly on NDC (0, 0).
        let center = camera.ray_directions()[1 + 2];
        assert_vec3_near(center, Vec3::NEG_Z, 1e-4);
    }

    #[test]
    fn test_update_ignored_while_look_disengaged() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.resize(2, 2);

        let input = CameraInput {
            move_forward: true,
            pointer_delta: Vec2::new(50.0, 0.0),
            look_engaged: false,
            ..Default::default()
        };

        assert!(!camera.update(0.016, &input));
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.direction(), Vec3::NEG_Z);
    }

    #[test]
    fn test_update_translates_along_forward() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.resize(2, 2);

        let input = CameraInput {
            move_forward: true,
            look_engaged: true,
            ..Default::default()
        };

        assert!(camera.update(0.1, &input));
        // 5.0 units/sec * 0.1 sec along -Z
        assert_vec3_near(camera.position(), Vec3::new(0.0, 0.0, 4.5), 1e-5);
    }

    #[test]
    fn test_update_rebuilds_ray_cache_on_motion() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.resize(2, 2);
        let before: Vec<Vec3> = camera.ray_directions().to_vec();

        let input = CameraInput {
            pointer_delta: Vec2::new(200.0, 0.0),
            look_engaged: true,
            ..Default::default()
        };

        assert!(camera.update(0.016, &input));
        assert_ne!(camera.ray_directions(), before.as_slice());
    }

    #[test]
    fn test_yaw_keeps_forward_level() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.resize(2, 2);

        // Pure horizontal pointer motion must not introduce pitch/roll
        let input = CameraInput {
            pointer_delta: Vec2::new(300.0, 0.0),
            look_engaged: true,
            ..Default::default()
        };
        camera.update(0.016, &input);

        let forward = camera.direction();
        assert!(forward.y.abs() < 1e-5);
        assert!((forward.length() - 1.0).abs() < 1e-5);
        // Yaw actually happened
        assert!(forward.x.abs() > 1e-4);
    }

    #[test]
    fn test_pitch_rotates_around_right_axis() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.resize(2, 2);

        let input = CameraInput {
            pointer_delta: Vec2::new(0.0, -300.0),
            look_engaged: true,
            ..Default::default()
        };
        camera.update(0.016, &input);

        let forward = camera.direction();
        // Negative pointer-y tilts the view upward
        assert!(forward.y > 1e-4);
        assert!(forward.x.abs() < 1e-5);
        assert!((forward.length() - 1.0).abs() < 1e-5);
    }
}
