//! Corewar Marbles Engine Library
//!
//! Replays a Corewar VM execution log as a 3D marble race. The log is read
//! line by line on a fixed cadence; each "alive" statement pushes that
//! contender's marble forward and the "won" statement crowns the winner.
//!
//! # Modules
//!
//! - [`game`] - Log parsing, race state machine, configuration and the scene adapter
//! - [`render`] - wgpu context, lit mesh pass, winner particles, label text
//! - [`input`] - Keyboard bindings and captured-mouse state
//! - [`camera`] - Free-fly camera
//!
//! # Example
//!
//! ```ignore
//! use corewar_marbles_engine::game::{LogReader, RaceConfig, RaceDriver};
//!
//! let reader = LogReader::open("match.log")?;
//! let mut driver = RaceDriver::new(reader, &RaceConfig::default());
//!
//! // Once per frame
//! for diff in driver.update(dt) {
//!     scene.apply(&diff);
//! }
//! scene.sync(driver.contenders());
//! ```

pub mod camera;
pub mod input;
pub mod render;

// Race logic lives next to the binary sources
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use camera::{FPSCameraController, FlyAxes};
pub use input::{FpsMouseState, InputAction, InputState, KeyBindings, KeyCode, MovementKeys};
pub use render::{GpuContext, GpuContextConfig, GpuInitError};
