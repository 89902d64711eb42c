//! Visual Configuration
//!
//! Lighting, camera and highlight settings for the race scene.

use glam::Vec3;

/// Visual settings for the race scene.
///
/// `Default` gives a neutral grey ambient, a white sun coming from the
/// front-left, and a chase camera behind the start line.
#[derive(Clone, Debug)]
pub struct VisualConfig {
    // Lighting
    /// Ambient light color (RGB)
    pub ambient_color: Vec3,
    /// Direction the sun light travels (not normalized)
    pub sun_direction: Vec3,
    /// Sun light color (RGB)
    pub sun_color: Vec3,
    /// Background clear color (RGB)
    pub sky_color: Vec3,

    // Camera
    /// Distance of the camera behind the start line
    pub camera_back: f32,
    /// Camera height above the floor
    pub camera_height: f32,
    /// Free-fly speed in units per second
    pub fly_speed: f32,
    /// Speed multiplier while the sprint key is held
    pub sprint_multiplier: f32,
    /// Mouse look sensitivity in degrees per pixel
    pub look_sensitivity_deg: f32,
    /// Vertical field of view in degrees
    pub fov_deg: f32,

    // Highlights
    /// Tint applied to the winning marble (RGBA)
    pub winner_color: [f32; 4],
    /// Label text color (RGBA)
    pub label_color: [f32; 4],
    /// Pixel size of one font dot for labels
    pub label_scale: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::splat(0.45),
            // Engine is Y-up with -Z forward: (-1, -1, -2) in a Z-up world
            sun_direction: Vec3::new(-1.0, -2.0, 1.0),
            sun_color: Vec3::splat(0.9),
            sky_color: Vec3::new(0.08, 0.09, 0.12),

            camera_back: 60.0,
            camera_height: 35.0,
            fly_speed: 30.0,
            sprint_multiplier: 2.0,
            look_sensitivity_deg: 0.16,
            fov_deg: 60.0,

            winner_color: [1.0, 0.84, 0.0, 1.0],
            label_color: [1.0, 1.0, 1.0, 1.0],
            label_scale: 2.0,
        }
    }
}

impl VisualConfig {
    /// Mouse sensitivity converted to radians per pixel.
    pub fn look_sensitivity_rad(&self) -> f32 {
        self.look_sensitivity_deg.to_radians()
    }
}
