//! Scenes: what the application window draws each frame.
//!
//! A scene value only exists once [`Scene::init`] succeeded, so `update` can
//! rely on its GPU objects. The window owns one [`ActiveScene`] at a time and
//! disposes it before switching.

mod level;
mod level_editor;

use std::path::Path;

use thiserror::Error;

use crate::render::{RenderBackend, RenderContext};
use crate::shader::ShaderError;

pub use level::LevelScene;
pub use level_editor::LevelEditorScene;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown scene '{0}'")]
    UnknownScene(usize),

    #[error(transparent)]
    Shader(#[from] ShaderError),
}

pub trait Scene: Sized {
    /// Creates the scene and its GPU objects. Assets resolve against `assets_dir`.
    fn init<B: RenderBackend>(ctx: &mut RenderContext<B>, assets_dir: &Path) -> Result<Self, SceneError>;

    /// Advances and draws one frame. `dt` is in seconds.
    fn update<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, dt: f32);

    /// Releases every GPU object the scene owns.
    fn dispose<B: RenderBackend>(self, ctx: &mut RenderContext<B>);
}

/// Scene selector used by `change_scene`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SceneId {
    LevelEditor = 0,
    Level = 1,
}

impl TryFrom<usize> for SceneId {
    type Error = SceneError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(SceneId::LevelEditor),
            1 => Ok(SceneId::Level),
            other => Err(SceneError::UnknownScene(other)),
        }
    }
}

/// The scene currently owned by the window.
#[derive(Debug)]
pub enum ActiveScene {
    LevelEditor(LevelEditorScene),
    Level(LevelScene),
}

impl ActiveScene {
    pub fn init<B: RenderBackend>(
        id: SceneId,
        ctx: &mut RenderContext<B>,
        assets_dir: &Path,
    ) -> Result<Self, SceneError> {
        Ok(match id {
            SceneId::LevelEditor => ActiveScene::LevelEditor(LevelEditorScene::init(ctx, assets_dir)?),
            SceneId::Level => ActiveScene::Level(LevelScene::init(ctx, assets_dir)?),
        })
    }

    pub fn id(&self) -> SceneId {
        match self {
            ActiveScene::LevelEditor(_) => SceneId::LevelEditor,
            ActiveScene::Level(_) => SceneId::Level,
        }
    }

    pub fn update<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, dt: f32) {
        match self {
            ActiveScene::LevelEditor(scene) => scene.update(ctx, dt),
            ActiveScene::Level(scene) => scene.update(ctx, dt),
        }
    }

    pub fn dispose<B: RenderBackend>(self, ctx: &mut RenderContext<B>) {
        match self {
            ActiveScene::LevelEditor(scene) => scene.dispose(ctx),
            ActiveScene::Level(scene) => scene.dispose(ctx),
        }
    }
}
