//! Captured-Mouse State
//!
//! Raw mouse motion accumulates between frames and is consumed once per
//! frame by the camera. Motion only counts while the cursor is captured.

#[derive(Debug, Clone, Default)]
pub struct FpsMouseState {
    delta_x: f32,
    delta_y: f32,
    cursor_captured: bool,
}

impl FpsMouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw device motion. Ignored while the cursor is free.
    #[inline]
    pub fn accumulate_delta(&mut self, dx: f32, dy: f32) {
        if self.cursor_captured {
            self.delta_x += dx;
            self.delta_y += dy;
        }
    }

    /// Take the accumulated motion and reset it to zero.
    #[inline]
    pub fn consume_delta(&mut self) -> (f32, f32) {
        let delta = (self.delta_x, self.delta_y);
        self.delta_x = 0.0;
        self.delta_y = 0.0;
        delta
    }

    /// Mark the cursor captured or released. Releasing drops pending motion.
    pub fn set_captured(&mut self, captured: bool) {
        self.cursor_captured = captured;
        if !captured {
            self.delta_x = 0.0;
            self.delta_y = 0.0;
        }
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.cursor_captured
    }

    #[inline]
    pub fn peek_delta(&self) -> (f32, f32) {
        (self.delta_x, self.delta_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured() -> FpsMouseState {
        let mut state = FpsMouseState::new();
        state.set_captured(true);
        state
    }

    #[test]
    fn test_new_state() {
        let state = FpsMouseState::new();
        assert_eq!(state.peek_delta(), (0.0, 0.0));
        assert!(!state.is_captured());
    }

    #[test]
    fn test_accumulate_and_consume() {
        let mut state = captured();
        state.accumulate_delta(10.0, 5.0);
        state.accumulate_delta(3.0, -2.0);
        assert_eq!(state.consume_delta(), (13.0, 3.0));
        assert_eq!(state.consume_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_motion_ignored_when_free() {
        let mut state = FpsMouseState::new();
        state.accumulate_delta(10.0, 5.0);
        assert_eq!(state.peek_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_release_drops_pending_motion() {
        let mut state = captured();
        state.accumulate_delta(10.0, 5.0);
        state.set_captured(false);
        assert!(!state.is_captured());
        assert_eq!(state.peek_delta(), (0.0, 0.0));
    }
}
