//! Window + event loop.
//!
//! Owns the `winit` EventLoop and Window, builds the wgpu-backed
//! [`AppWindow`](crate::core::AppWindow) on top of them and drives its frames.

mod runtime;

pub use runtime::run;
