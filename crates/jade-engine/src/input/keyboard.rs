use std::collections::HashSet;

use super::types::{ButtonState, InputEvent, Key};

/// Keyboard state holder fed by the window runtime.
#[derive(Debug, Default)]
pub struct KeyListener {
    keys_down: HashSet<Key>,
    pressed_this_frame: HashSet<Key>,
}

impl KeyListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an input event; non-key events other than focus loss are ignored.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Key { key, state: ButtonState::Pressed, repeat } => {
                if self.keys_down.insert(key) && !repeat {
                    self.pressed_this_frame.insert(key);
                }
            }
            InputEvent::Key { key, state: ButtonState::Released, .. } => {
                self.keys_down.remove(&key);
            }
            InputEvent::FocusLost => self.keys_down.clear(),
            _ => {}
        }
    }

    /// Clears the per-frame "pressed" set.
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// True only during the frame in which `key` went down.
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed_this_frame.contains(&key)
    }
}
