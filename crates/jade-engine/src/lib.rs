//! Jade engine crate.
//!
//! A minimal 2D rendering foundation: shader programs parsed from dual-stage
//! sources, a fixed orthographic camera, scenes, and an application window
//! driving a frame loop over a graphics backend.

pub mod camera;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;
pub mod window;
