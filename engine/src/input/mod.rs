//! Input Module
//!
//! Keyboard and captured-mouse state for the free-fly viewer. Window events
//! are translated into [`KeyCode`]s, resolved through [`KeyBindings`] and
//! folded into held movement state or reported as one-shot actions.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut input = InputState::new();
//! if let Some(action) = input.handle_key(KeyCode::P, true) {
//!     // ReplayFaster, fired once per physical press
//! }
//! let axes = input.keyboard.movement.axes();
//! ```

pub mod bindings;
pub mod keyboard;
pub mod mouse_state;

pub use bindings::{InputAction, KeyBindings};
pub use keyboard::{KeyCode, KeyboardState, MovementKeys};
pub use mouse_state::FpsMouseState;

/// All input state owned by the viewer.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: FpsMouseState,
    pub bindings: KeyBindings,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key transition.
    ///
    /// Movement actions update the held state. Returns the bound action on a
    /// fresh press of a non-movement key, so replay speed and quit fire once
    /// per press regardless of auto-repeat.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> Option<InputAction> {
        let fresh_press = self.keyboard.set_pressed(key, pressed);
        let action = self.bindings.get_action(key)?;
        if self.keyboard.movement.handle_action(action, pressed) {
            return None;
        }
        fresh_press.then_some(action)
    }

    /// Drop held keys and pending mouse motion (focus lost).
    pub fn release_all(&mut self) {
        self.keyboard.reset();
        self.mouse.set_captured(false);
    }
}
