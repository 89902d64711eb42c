//! Free-Fly Camera Controller
//!
//! Mouse-look camera with six-axis flight. Mouse movement rotates the view
//! directly (no button held, cursor captured); movement keys translate the
//! camera along its own forward/right/up basis, so flying "forward" while
//! looking down descends.
//!
//! Coordinate system: +X right, +Y up, -Z forward at yaw = pitch = 0.

use glam::{Mat4, Vec3};

/// Pitch limit: ±89 degrees, keeps the basis well defined.
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Local movement request for one frame.
///
/// Each axis is in [-1, 1]: `right` (+D / -A), `up` (+Q / -E),
/// `forward` (+W / -S).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlyAxes {
    pub right: f32,
    pub up: f32,
    pub forward: f32,
}

impl FlyAxes {
    pub fn new(right: f32, up: f32, forward: f32) -> Self {
        Self { right, up, forward }
    }

    pub fn is_zero(&self) -> bool {
        self.right == 0.0 && self.up == 0.0 && self.forward == 0.0
    }
}

/// Free-fly FPS camera.
#[derive(Clone, Debug)]
pub struct FPSCameraController {
    pub position: Vec3,
    /// Horizontal angle (radians), unbounded
    pub yaw: f32,
    /// Vertical angle (radians), clamped to ±89°
    pub pitch: f32,
    /// Radians per pixel of mouse motion
    pub sensitivity: f32,
    /// Units per second when flying
    pub fly_speed: f32,
    /// Speed factor while sprint is held
    pub sprint_multiplier: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for FPSCameraController {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.16_f32.to_radians(),
            fly_speed: 30.0,
            sprint_multiplier: 2.0,
            fov_y: 60.0_f32.to_radians(),
            z_near: 0.1,
            z_far: 5000.0,
        }
    }
}

impl FPSCameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera at `position` oriented toward `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            ..Default::default()
        };
        camera.look_at(target);
        camera
    }

    /// Set pitch in radians, clamped to ±89°.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn pitch_limits(&self) -> (f32, f32) {
        (-PITCH_LIMIT, PITCH_LIMIT)
    }

    /// Rotate by a raw mouse delta in pixels.
    ///
    /// Positive `dx` turns right; positive `dy` (mouse moved down) looks down.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.set_pitch(self.pitch - dy * self.sensitivity);
    }

    /// Unit view direction.
    #[inline]
    pub fn get_forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Unit right vector, always horizontal.
    #[inline]
    pub fn get_right(&self) -> Vec3 {
        self.get_forward().cross(Vec3::Y).normalize()
    }

    /// Unit up vector of the camera basis.
    #[inline]
    pub fn get_up(&self) -> Vec3 {
        self.get_right().cross(self.get_forward()).normalize()
    }

    /// Set yaw and pitch so the camera faces `target`.
    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        let distance = to_target.length();

        if distance > 0.001 {
            self.yaw = to_target.x.atan2(-to_target.z);
            self.set_pitch((to_target.y / distance).asin());
        }
    }

    /// World-space velocity for the requested axes (zero when idle).
    pub fn fly_velocity(&self, axes: FlyAxes, sprint: bool) -> Vec3 {
        let direction = self.get_right() * axes.right
            + self.get_up() * axes.up
            + self.get_forward() * axes.forward;
        let Some(direction) = direction.try_normalize() else {
            return Vec3::ZERO;
        };
        let speed = if sprint {
            self.fly_speed * self.sprint_multiplier
        } else {
            self.fly_speed
        };
        direction * speed
    }

    /// Move the camera for `dt` seconds. Diagonals are not faster.
    pub fn fly(&mut self, axes: FlyAxes, dt: f32, sprint: bool) {
        self.position += self.fly_velocity(axes, sprint) * dt;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.get_forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect_ratio.max(0.01), self.z_near, self.z_far)
    }

    pub fn view_projection(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }
}
