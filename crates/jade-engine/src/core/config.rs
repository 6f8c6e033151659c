use std::path::PathBuf;

use crate::render::Color;

/// Window settings. Fixed once the [`AppWindow`](super::AppWindow) is built.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Initial background color; the window's `clear_color` can change later.
    pub clear_color: Color,
    /// Scene index selected by `init`.
    pub default_scene: usize,
    /// Directory scene assets resolve against.
    pub assets_dir: PathBuf,
    /// Wait for vertical blank when presenting.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Jade".to_string(),
            width: 1920,
            height: 1080,
            clear_color: Color::new(1.0, 1.0, 1.0, 0.0),
            default_scene: 0,
            assets_dir: PathBuf::from("assets"),
            vsync: true,
        }
    }
}
