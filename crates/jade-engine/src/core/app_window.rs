use super::WindowConfig;
use crate::input::{InputEvent, KeyListener, MouseListener};
use crate::render::{Color, FrameStatus, RenderBackend, RenderContext};
use crate::scene::{ActiveScene, SceneError, SceneId};
use crate::time::FrameClock;

/// What the event loop should do after a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowPhase {
    Constructed,
    Initialized,
    Looping,
    Closed,
}

/// Application context.
///
/// Exactly one scene is current once `init` succeeded. Scenes are switched
/// between frames through [`change_scene`](Self::change_scene).
pub struct AppWindow<B: RenderBackend> {
    config: WindowConfig,
    /// Background color applied at the start of every frame.
    pub clear_color: Color,
    ctx: RenderContext<B>,
    scene: Option<ActiveScene>,
    clock: FrameClock,
    mouse: MouseListener,
    keys: KeyListener,
    phase: WindowPhase,
}

impl<B: RenderBackend> AppWindow<B> {
    pub fn new(config: WindowConfig, backend: B) -> Self {
        Self {
            clear_color: config.clear_color,
            config,
            ctx: RenderContext::new(backend),
            scene: None,
            clock: FrameClock::new(),
            mouse: MouseListener::new(),
            keys: KeyListener::new(),
            phase: WindowPhase::Constructed,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn phase(&self) -> WindowPhase {
        self.phase
    }

    pub fn context(&self) -> &RenderContext<B> {
        &self.ctx
    }

    pub(crate) fn context_mut(&mut self) -> &mut RenderContext<B> {
        &mut self.ctx
    }

    pub fn scene(&self) -> Option<&ActiveScene> {
        self.scene.as_ref()
    }

    pub fn mouse(&self) -> &MouseListener {
        &self.mouse
    }

    pub fn keys(&self) -> &KeyListener {
        &self.keys
    }

    /// Replaces the current scene with scene `index`.
    ///
    /// The new scene is initialized before the old one is disposed, so on
    /// any error the current scene stays as it was.
    pub fn change_scene(&mut self, index: usize) -> Result<(), SceneError> {
        let id = SceneId::try_from(index)?;
        let next = ActiveScene::init(id, &mut self.ctx, &self.config.assets_dir)?;

        if let Some(previous) = self.scene.replace(next) {
            let previous_id = previous.id();
            previous.dispose(&mut self.ctx);
            log::debug!("disposed scene {previous_id:?}");
        }

        log::info!("changed scene to {id:?}");
        Ok(())
    }

    /// Selects the configured default scene.
    pub fn init(&mut self) -> Result<(), SceneError> {
        self.change_scene(self.config.default_scene)?;
        self.phase = WindowPhase::Initialized;
        Ok(())
    }

    /// Runs one loop iteration: clear, tick, update, present.
    ///
    /// The first tick has no delta, so the scene is first updated on the
    /// second frame.
    pub fn frame(&mut self) -> AppControl {
        match self.phase {
            WindowPhase::Closed => return AppControl::Exit,
            WindowPhase::Constructed => log::warn!("frame before init"),
            _ => {}
        }
        self.phase = WindowPhase::Looping;

        match self.ctx.begin_frame() {
            FrameStatus::Ready => {}
            FrameStatus::Skip => return AppControl::Continue,
            FrameStatus::Fatal => {
                log::error!("graphics surface is gone; stopping");
                return AppControl::Exit;
            }
        }

        let gl = self.ctx.backend_mut();
        gl.clear_color(self.clear_color);
        gl.clear();

        let time = self.clock.tick();
        if time.has_delta() {
            if let Some(scene) = self.scene.as_mut() {
                scene.update(&mut self.ctx, time.dt);
            }
        }

        self.ctx.backend_mut().end_frame();

        self.mouse.end_frame();
        self.keys.end_frame();

        AppControl::Continue
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.mouse.apply(&event);
        self.keys.apply(&event);
    }

    /// Disposes the current scene and releases input state.
    pub fn shutdown(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.dispose(&mut self.ctx);
            log::debug!("scene disposed");
        }
        self.mouse = MouseListener::new();
        self.keys = KeyListener::new();
        log::debug!("input listeners released");
        self.phase = WindowPhase::Closed;
    }
}
