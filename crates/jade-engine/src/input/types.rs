use std::fmt;

/// Keyboard key identifier.
///
/// Only keys the engine has a use for get a named variant; everything else
/// is `Unknown` with the physical key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,

    /// Printable character key, lowercased (`'a'`, `'7'`, `'/'`).
    Char(char),

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Coordinates are window pixels with a top-left origin, as the platform
/// reports them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    CursorMoved { x: f64, y: f64 },
    MouseButton { button: MouseButton, state: ButtonState },
    Scroll { dx: f64, dy: f64 },
    Key { key: Key, state: ButtonState, repeat: bool },
    /// Window focus lost; held keys and buttons are released.
    FocusLost,
}
