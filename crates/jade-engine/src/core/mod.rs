//! The application window: owns the render context, the current scene and
//! input state, and runs one frame at a time.
//!
//! Everything here is platform-independent; `window::run` drives it from a
//! real event loop, tests drive it with a recording backend.

mod app_window;
mod config;

pub use app_window::{AppControl, AppWindow, WindowPhase};
pub use config::WindowConfig;
