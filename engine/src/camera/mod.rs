//! Camera Module
//!
//! Free-fly camera state and math. Window-system agnostic.

pub mod fps_controller;

pub use fps_controller::{FPSCameraController, FlyAxes};
