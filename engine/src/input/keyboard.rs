//! Keyboard Input Module
//!
//! Key codes the viewer cares about, plus held-key movement state.

use super::bindings::InputAction;
use crate::camera::FlyAxes;

/// Keys the viewer reacts to. Everything else maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Q,
    E,
    P,
    O,
    ShiftLeft,
    ShiftRight,
    Escape,
    Unknown,
}

impl KeyCode {
    /// Translate a winit physical key code.
    pub fn from_winit(code: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as Winit;
        match code {
            Winit::KeyW => KeyCode::W,
            Winit::KeyA => KeyCode::A,
            Winit::KeyS => KeyCode::S,
            Winit::KeyD => KeyCode::D,
            Winit::KeyQ => KeyCode::Q,
            Winit::KeyE => KeyCode::E,
            Winit::KeyP => KeyCode::P,
            Winit::KeyO => KeyCode::O,
            Winit::ShiftLeft => KeyCode::ShiftLeft,
            Winit::ShiftRight => KeyCode::ShiftRight,
            Winit::Escape => KeyCode::Escape,
            _ => KeyCode::Unknown,
        }
    }
}

/// Which movement actions are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub sprint: bool,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a press/release of a bound action.
    ///
    /// Returns `false` for actions that are not movement.
    pub fn handle_action(&mut self, action: InputAction, pressed: bool) -> bool {
        let slot = match action {
            InputAction::MoveForward => &mut self.forward,
            InputAction::MoveBack => &mut self.backward,
            InputAction::MoveLeft => &mut self.left,
            InputAction::MoveRight => &mut self.right,
            InputAction::MoveUp => &mut self.up,
            InputAction::MoveDown => &mut self.down,
            InputAction::Sprint => &mut self.sprint,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprint
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Held keys as camera-local axes; opposing keys cancel.
    pub fn axes(&self) -> FlyAxes {
        fn axis(positive: bool, negative: bool) -> f32 {
            positive as i32 as f32 - negative as i32 as f32
        }
        FlyAxes {
            right: axis(self.right, self.left),
            up: axis(self.up, self.down),
            forward: axis(self.forward, self.backward),
        }
    }
}

/// Held movement plus the set of physically pressed keys.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pub movement: MovementKeys,
    pressed: std::collections::HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition.
    ///
    /// Returns `true` only for a fresh press (the key was up before), which
    /// lets one-shot actions ignore auto-repeat.
    pub fn set_pressed(&mut self, key: KeyCode, pressed: bool) -> bool {
        if pressed {
            self.pressed.insert(key)
        } else {
            self.pressed.remove(&key);
            false
        }
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Release everything (e.g. on focus loss).
    pub fn reset(&mut self) {
        self.movement.reset();
        self.pressed.clear();
    }
}
