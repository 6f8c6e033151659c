//! Input subsystem.
//!
//! The public API is platform-agnostic and does not expose winit types. The
//! window runtime translates platform events into `InputEvent`s and forwards
//! them to the listeners.

mod keyboard;
mod mouse;
mod types;

pub use keyboard::KeyListener;
pub use mouse::MouseListener;
pub use types::{ButtonState, InputEvent, Key, MouseButton};
