//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   down. Movement and fire read this.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened, cleared by `end_frame()`. Jump and the debug
//!   toggle react to these edges.
//!
//! Keys are logical actions, not physical scancodes; the platform layer maps
//! its keyboard onto this set.

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    MoveLeft,
    MoveRight,
    Fire,
    Jump,
    DebugToggle,
    Quit,
}

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::MoveLeft,
        Key::MoveRight,
        Key::Fire,
        Key::Jump,
        Key::DebugToggle,
        Key::Quit,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when this call is a press edge (the key was up).
    pub fn key_down(&mut self, key: Key) -> bool {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
            return true;
        }
        false
    }

    /// Returns true when this call is a release edge (the key was down).
    pub fn key_up(&mut self, key: Key) -> bool {
        if self.held.remove(&key) {
            self.just_released.insert(key);
            return true;
        }
        false
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Horizontal intent from the movement keys: -1, 0 or +1.
    pub fn horizontal_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_held(Key::MoveLeft) {
            axis -= 1.0;
        }
        if self.is_held(Key::MoveRight) {
            axis += 1.0;
        }
        axis
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        assert!(input.key_down(Key::Fire));
        assert!(input.is_held(Key::Fire));
        assert!(input.is_just_pressed(Key::Fire));
    }

    #[test]
    fn repeated_key_down_is_not_a_new_edge() {
        let mut input = InputState::new();
        assert!(input.key_down(Key::Jump));
        input.end_frame();
        assert!(!input.key_down(Key::Jump));
        assert!(!input.is_just_pressed(Key::Jump));
        assert!(input.is_held(Key::Jump));
    }

    #[test]
    fn key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        assert!(!input.key_up(Key::DebugToggle));
        assert!(!input.is_just_released(Key::DebugToggle));
    }

    #[test]
    fn end_frame_clears_edges_but_keeps_held() {
        let mut input = InputState::new();
        input.key_down(Key::MoveLeft);
        input.key_down(Key::Jump);
        input.key_up(Key::Jump);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::MoveLeft));
        assert!(!input.is_just_released(Key::Jump));
        assert!(input.is_held(Key::MoveLeft));
    }

    #[test]
    fn opposite_movement_keys_cancel_out() {
        let mut input = InputState::new();
        assert_eq!(input.horizontal_axis(), 0.0);
        input.key_down(Key::MoveLeft);
        assert_eq!(input.horizontal_axis(), -1.0);
        input.key_down(Key::MoveRight);
        assert_eq!(input.horizontal_axis(), 0.0);
        input.key_up(Key::MoveLeft);
        assert_eq!(input.horizontal_axis(), 1.0);
    }

    #[test]
    fn keys_deserialize_from_snake_case() {
        let keys: Vec<Key> =
            serde_json::from_str(r#"["move_left","fire","debug_toggle"]"#).expect("parse keys");
        assert_eq!(keys, vec![Key::MoveLeft, Key::Fire, Key::DebugToggle]);
    }
}
