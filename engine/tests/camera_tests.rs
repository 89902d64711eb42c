//! Camera Tests - Free-Fly Controller
//!
//! Orientation, mouse look and flying for the FPS camera.

use glam::{Vec3, Vec4};
use corewar_marbles_engine::camera::{FPSCameraController, FlyAxes};

const EPS: f32 = 1e-4;

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPS
}

// ============================================================================
// Orientation
// ============================================================================

#[test]
fn test_default_faces_negative_z() {
    let camera = FPSCameraController::new();
    assert!(approx(camera.get_forward(), Vec3::NEG_Z));
    assert!(approx(camera.get_right(), Vec3::X));
    assert!(approx(camera.get_up(), Vec3::Y));
}

#[test]
fn test_start_view_looks_at_origin() {
    let camera = FPSCameraController::looking_at(Vec3::new(0.0, 35.0, 60.0), Vec3::ZERO);
    let expected = (Vec3::ZERO - camera.position).normalize();
    assert!(approx(camera.get_forward(), expected));
    assert!(camera.pitch < 0.0);
    assert!(camera.yaw.abs() < EPS);
}

#[test]
fn test_basis_is_orthonormal() {
    let mut camera = FPSCameraController::new();
    camera.yaw = 0.7;
    camera.set_pitch(-0.4);
    let (f, r, u) = (camera.get_forward(), camera.get_right(), camera.get_up());
    assert!(f.dot(r).abs() < EPS);
    assert!(f.dot(u).abs() < EPS);
    assert!(r.dot(u).abs() < EPS);
    assert!(r.y.abs() < EPS);
}

// ============================================================================
// Mouse look
// ============================================================================

#[test]
fn test_mouse_right_turns_right() {
    let mut camera = FPSCameraController::new();
    camera.apply_mouse_delta(100.0, 0.0);
    assert!(camera.get_forward().x > 0.0);
    assert!((camera.yaw - 100.0 * 0.16_f32.to_radians()).abs() < EPS);
}

#[test]
fn test_mouse_down_looks_down() {
    let mut camera = FPSCameraController::new();
    camera.apply_mouse_delta(0.0, 50.0);
    assert!(camera.get_forward().y < 0.0);
}

#[test]
fn test_pitch_clamped() {
    let mut camera = FPSCameraController::new();
    camera.apply_mouse_delta(0.0, -1_000_000.0);
    let (min, max) = camera.pitch_limits();
    assert_eq!(camera.pitch, max);
    camera.apply_mouse_delta(0.0, 1_000_000.0);
    assert_eq!(camera.pitch, min);
    assert!(camera.get_forward().is_finite());
}

// ============================================================================
// Flying
// ============================================================================

#[test]
fn test_fly_forward_one_second() {
    let mut camera = FPSCameraController::new();
    camera.fly(FlyAxes::new(0.0, 0.0, 1.0), 1.0, false);
    assert!(approx(camera.position, Vec3::new(0.0, 0.0, -30.0)));
}

#[test]
fn test_diagonal_is_not_faster() {
    let camera = FPSCameraController::new();
    let v = camera.fly_velocity(FlyAxes::new(1.0, 1.0, 1.0), false);
    assert!((v.length() - 30.0).abs() < EPS);
}

#[test]
fn test_sprint_doubles_speed() {
    let camera = FPSCameraController::new();
    let v = camera.fly_velocity(FlyAxes::new(-1.0, 0.0, 0.0), true);
    assert!(approx(v, Vec3::new(-60.0, 0.0, 0.0)));
}

#[test]
fn test_opposing_keys_cancel() {
    let mut camera = FPSCameraController::new();
    let start = camera.position;
    camera.fly(FlyAxes::new(0.0, 0.0, 0.0), 1.0, true);
    assert_eq!(camera.position, start);
}

#[test]
fn test_fly_follows_view_direction() {
    let mut camera = FPSCameraController::looking_at(Vec3::new(0.0, 35.0, 60.0), Vec3::ZERO);
    let forward = camera.get_forward();
    camera.fly(FlyAxes::new(0.0, 0.0, 1.0), 0.5, false);
    assert!(approx(camera.position, Vec3::new(0.0, 35.0, 60.0) + forward * 15.0));
}

// ============================================================================
// Matrices
// ============================================================================

#[test]
fn test_target_projects_to_screen_center() {
    let camera = FPSCameraController::looking_at(Vec3::new(0.0, 35.0, 60.0), Vec3::ZERO);
    let clip = camera.view_projection(16.0 / 9.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip / clip.w;
    assert!(ndc.x.abs() < EPS);
    assert!(ndc.y.abs() < EPS);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}
