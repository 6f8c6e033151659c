use std::collections::HashSet;

use super::types::{ButtonState, InputEvent, MouseButton};

/// Mouse state holder fed by the window runtime.
///
/// Position and scroll are in window pixels. `last_*` is the position at the
/// end of the previous frame, so `dx`/`dy` give the per-frame motion.
#[derive(Debug, Default)]
pub struct MouseListener {
    x: f64,
    y: f64,
    last_x: f64,
    last_y: f64,
    scroll_x: f64,
    scroll_y: f64,
    buttons_down: HashSet<MouseButton>,
    dragging: bool,
}

impl MouseListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an input event; non-mouse events are ignored.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::CursorMoved { x, y } => {
                self.x = x;
                self.y = y;
                self.dragging = !self.buttons_down.is_empty();
            }
            InputEvent::MouseButton { button, state } => match state {
                ButtonState::Pressed => {
                    self.buttons_down.insert(button);
                }
                ButtonState::Released => {
                    self.buttons_down.remove(&button);
                    if self.buttons_down.is_empty() {
                        self.dragging = false;
                    }
                }
            },
            InputEvent::Scroll { dx, dy } => {
                self.scroll_x += dx;
                self.scroll_y += dy;
            }
            InputEvent::FocusLost => {
                self.buttons_down.clear();
                self.dragging = false;
            }
            InputEvent::Key { .. } => {}
        }
    }

    /// Resets per-frame deltas. Called by the loop after each frame.
    pub fn end_frame(&mut self) {
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
        self.last_x = self.x;
        self.last_y = self.y;
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn dx(&self) -> f64 {
        self.x - self.last_x
    }

    pub fn dy(&self) -> f64 {
        self.y - self.last_y
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// True while the cursor moves with at least one button held.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f64, y: f64) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    fn button(button: MouseButton, state: ButtonState) -> InputEvent {
        InputEvent::MouseButton { button, state }
    }

    #[test]
    fn deltas_are_relative_to_previous_frame() {
        let mut m = MouseListener::new();
        m.apply(&moved(10.0, 20.0));
        m.end_frame();
        m.apply(&moved(15.0, 18.0));
        assert_eq!((m.dx(), m.dy()), (5.0, -2.0));
        m.end_frame();
        assert_eq!((m.dx(), m.dy()), (0.0, 0.0));
    }

    #[test]
    fn scroll_accumulates_until_end_of_frame() {
        let mut m = MouseListener::new();
        m.apply(&InputEvent::Scroll { dx: 0.0, dy: 1.0 });
        m.apply(&InputEvent::Scroll { dx: 0.5, dy: 2.0 });
        assert_eq!((m.scroll_x(), m.scroll_y()), (0.5, 3.0));
        m.end_frame();
        assert_eq!((m.scroll_x(), m.scroll_y()), (0.0, 0.0));
    }

    #[test]
    fn dragging_requires_held_button_and_motion() {
        let mut m = MouseListener::new();
        m.apply(&button(MouseButton::Left, ButtonState::Pressed));
        assert!(m.button_down(MouseButton::Left));
        assert!(!m.is_dragging());

        m.apply(&moved(1.0, 1.0));
        assert!(m.is_dragging());

        m.apply(&button(MouseButton::Left, ButtonState::Released));
        assert!(!m.is_dragging());
        assert!(!m.button_down(MouseButton::Left));
    }

    #[test]
    fn focus_loss_releases_buttons() {
        let mut m = MouseListener::new();
        m.apply(&button(MouseButton::Right, ButtonState::Pressed));
        m.apply(&moved(3.0, 3.0));
        m.apply(&InputEvent::FocusLost);
        assert!(!m.button_down(MouseButton::Right));
        assert!(!m.is_dragging());
    }
}
