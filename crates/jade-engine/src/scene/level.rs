use std::path::Path;

use glam::Vec2;

use super::{Scene, SceneError};
use crate::camera::Camera;
use crate::render::{RenderBackend, RenderContext};

/// Gameplay scene. Has a camera and draws nothing yet.
#[derive(Debug)]
pub struct LevelScene {
    camera: Camera,
}

impl LevelScene {
    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

impl Scene for LevelScene {
    fn init<B: RenderBackend>(_ctx: &mut RenderContext<B>, _assets_dir: &Path) -> Result<Self, SceneError> {
        log::info!("inside level scene");
        Ok(Self {
            camera: Camera::new(Vec2::ZERO),
        })
    }

    fn update<B: RenderBackend>(&mut self, _ctx: &mut RenderContext<B>, _dt: f32) {}

    fn dispose<B: RenderBackend>(self, _ctx: &mut RenderContext<B>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingBackend;

    #[test]
    fn init_touches_no_gpu_state() {
        let mut ctx = RenderContext::new(RecordingBackend::new());
        let scene = LevelScene::init(&mut ctx, Path::new("missing")).unwrap();

        assert_eq!(scene.camera().position(), Vec2::ZERO);
        assert!(ctx.backend().calls().is_empty());
    }
}
