//! Input Bindings Module
//!
//! Maps physical keys to logical viewer actions. Several keys may drive the
//! same action (both Shift keys sprint), but each key has one action.

use std::collections::HashMap;

use super::KeyCode;

/// Logical viewer actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// W
    MoveForward,
    /// S
    MoveBack,
    /// A
    MoveLeft,
    /// D
    MoveRight,
    /// Q
    MoveUp,
    /// E
    MoveDown,
    /// Shift (either side)
    Sprint,
    /// P: halve the time per log line
    ReplayFaster,
    /// O: double the time per log line
    ReplaySlower,
    /// Escape
    Quit,
}

/// Key → action table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, InputAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Default layout: WASD + Q/E flight, Shift sprint, P/O replay speed,
    /// Escape quits.
    pub fn new() -> Self {
        let mut bindings = Self::empty();

        bindings.bind(KeyCode::W, InputAction::MoveForward);
        bindings.bind(KeyCode::S, InputAction::MoveBack);
        bindings.bind(KeyCode::A, InputAction::MoveLeft);
        bindings.bind(KeyCode::D, InputAction::MoveRight);
        bindings.bind(KeyCode::Q, InputAction::MoveUp);
        bindings.bind(KeyCode::E, InputAction::MoveDown);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Sprint);
        bindings.bind(KeyCode::ShiftRight, InputAction::Sprint);
        bindings.bind(KeyCode::P, InputAction::ReplayFaster);
        bindings.bind(KeyCode::O, InputAction::ReplaySlower);
        bindings.bind(KeyCode::Escape, InputAction::Quit);

        bindings
    }

    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
        }
    }

    /// Bind `key` to `action`, replacing whatever the key did before.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        if key != KeyCode::Unknown {
            self.key_to_action.insert(key, action);
        }
    }

    pub fn unbind_key(&mut self, key: KeyCode) {
        self.key_to_action.remove(&key);
    }

    /// Remove every key bound to `action`.
    pub fn unbind_action(&mut self, action: InputAction) {
        self.key_to_action.retain(|_, bound| *bound != action);
    }

    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }

    /// All keys bound to `action`, in no particular order.
    pub fn keys_for(&self, action: InputAction) -> Vec<KeyCode> {
        self.key_to_action
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn all_bindings(&self) -> impl Iterator<Item = (KeyCode, InputAction)> + '_ {
        self.key_to_action.iter().map(|(&k, &a)| (k, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_action(KeyCode::W), Some(InputAction::MoveForward));
        assert_eq!(bindings.get_action(KeyCode::S), Some(InputAction::MoveBack));
        assert_eq!(bindings.get_action(KeyCode::A), Some(InputAction::MoveLeft));
        assert_eq!(bindings.get_action(KeyCode::D), Some(InputAction::MoveRight));
        assert_eq!(bindings.get_action(KeyCode::Q), Some(InputAction::MoveUp));
        assert_eq!(bindings.get_action(KeyCode::E), Some(InputAction::MoveDown));
        assert_eq!(bindings.get_action(KeyCode::P), Some(InputAction::ReplayFaster));
        assert_eq!(bindings.get_action(KeyCode::O), Some(InputAction::ReplaySlower));
        assert_eq!(bindings.get_action(KeyCode::Escape), Some(InputAction::Quit));
        assert_eq!(bindings.get_action(KeyCode::Unknown), None);
    }

    #[test]
    fn test_both_shifts_sprint() {
        let bindings = KeyBindings::new();
        let mut keys = bindings.keys_for(InputAction::Sprint);
        keys.sort_by_key(|k| *k as u8);
        assert_eq!(keys, vec![KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    }

    #[test]
    fn test_rebind_key_replaces_action() {
        let mut bindings = KeyBindings::new();
        bindings.bind(KeyCode::E, InputAction::Quit);
        assert_eq!(bindings.get_action(KeyCode::E), Some(InputAction::Quit));
        assert!(bindings.keys_for(InputAction::MoveDown).is_empty());
        assert_eq!(bindings.keys_for(InputAction::Quit).len(), 2);
    }

    #[test]
    fn test_unbind_key() {
        let mut bindings = KeyBindings::new();
        bindings.unbind_key(KeyCode::W);
        assert_eq!(bindings.get_action(KeyCode::W), None);
        assert!(bindings.keys_for(InputAction::MoveForward).is_empty());
    }

    #[test]
    fn test_unbind_action_removes_all_keys() {
        let mut bindings = KeyBindings::new();
        bindings.unbind_action(InputAction::Sprint);
        assert_eq!(bindings.get_action(KeyCode::ShiftLeft), None);
        assert_eq!(bindings.get_action(KeyCode::ShiftRight), None);
    }

    #[test]
    fn test_unknown_never_bound() {
        let mut bindings = KeyBindings::empty();
        bindings.bind(KeyCode::Unknown, InputAction::Quit);
        assert_eq!(bindings.all_bindings().count(), 0);
    }
}
