use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{AppControl, AppWindow, WindowConfig};
use crate::device::{Gpu, GpuInit};
use crate::input::{ButtonState, InputEvent, Key, MouseButton};
use crate::render::WgpuBackend;

/// Opens the window and runs frames until it is closed.
///
/// Returns once the window is gone. Startup failures (window, GPU, default
/// scene) are returned as errors after the event loop has stopped.
pub fn run(config: WindowConfig, gpu_init: GpuInit) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut state = RuntimeState::new(config, gpu_init);

    event_loop
        .run_app(&mut state)
        .context("winit event loop terminated with error")?;

    state.teardown();

    match state.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    app: AppWindow<WgpuBackend<'this>>,
}

struct RuntimeState {
    config: WindowConfig,
    gpu_init: GpuInit,
    entry: Option<WindowEntry>,
    failure: Option<anyhow::Error>,
}

impl RuntimeState {
    fn new(config: WindowConfig, gpu_init: GpuInit) -> Self {
        Self {
            config,
            gpu_init,
            entry: None,
            failure: None,
        }
    }

    fn create_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.config.width),
                f64::from(self.config.height),
            ))
            .with_visible(false)
            .with_resizable(true)
            .with_maximized(true);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let config = self.config.clone();
        let gpu_init = self.gpu_init.clone().with_vsync(config.vsync);

        WindowEntryTryBuilder {
            window,
            app_builder: |window| build_app(window, config, gpu_init),
        }
        .try_build()
    }

    /// Shuts the scene down, then releases the GPU and finally the window.
    fn teardown(&mut self) {
        let Some(mut entry) = self.entry.take() else {
            return;
        };

        entry.with_app_mut(|app| app.shutdown());

        let heads = entry.into_heads();
        log::debug!("GPU resources released");

        drop(heads.window);
        log::debug!("window destroyed");
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.teardown();
        event_loop.exit();
    }
}

fn build_app<'w>(
    window: &'w Window,
    config: WindowConfig,
    gpu_init: GpuInit,
) -> Result<AppWindow<WgpuBackend<'w>>> {
    let gpu = pollster::block_on(Gpu::new(window, gpu_init))?;

    let info = gpu.adapter_info();
    log::info!(
        "wgpu {:?} backend on {} ({} {})",
        info.backend,
        info.name,
        info.driver,
        info.driver_info
    );
    log::debug!("present mode {:?}", gpu.present_mode());

    gpu.log_uncaptured_errors();
    window.set_visible(true);

    let mut app = AppWindow::new(config, WgpuBackend::new(gpu, window));
    app.init().context("failed to select the default scene")?;
    Ok(app)
}

impl ApplicationHandler for RuntimeState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => {
                log::error!("startup failed: {err:#}");
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        if let Some(input) = translate_input_event(&event) {
            entry.with_app_mut(|app| app.handle_input(input));
        }

        match event {
            WindowEvent::CloseRequested => self.close(event_loop),

            WindowEvent::Resized(size) => {
                entry.with_app_mut(|app| app.context_mut().backend_mut().resize(size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_app_mut(|app| app.context_mut().backend_mut().resize(size));
            }

            WindowEvent::RedrawRequested => {
                if entry.with_app_mut(|app| app.frame()) == AppControl::Exit {
                    self.close(event_loop);
                }
            }

            _ => {}
        }
    }
}

fn translate_input_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x,
            y: position.y,
        }),

        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
            button: map_mouse_button(*button),
            state: map_state(*state),
        }),

        // Pixel deltas (touchpads) pass through unscaled.
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (f64::from(*x), f64::from(*y)),
                MouseScrollDelta::PixelDelta(p) => (p.x, p.y),
            };
            Some(InputEvent::Scroll { dx, dy })
        }

        WindowEvent::KeyboardInput { event, .. } => Some(InputEvent::Key {
            key: map_key(&event.logical_key, event.physical_key),
            state: map_state(event.state),
            repeat: event.repeat,
        }),

        WindowEvent::Focused(false) => Some(InputEvent::FocusLost),

        _ => None,
    }
}

fn map_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(logical: &WinitKey, physical: PhysicalKey) -> Key {
    match logical {
        WinitKey::Named(named) => match named {
            NamedKey::Escape => Key::Escape,
            NamedKey::Enter => Key::Enter,
            NamedKey::Tab => Key::Tab,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Space => Key::Space,
            NamedKey::ArrowUp => Key::ArrowUp,
            NamedKey::ArrowDown => Key::ArrowDown,
            NamedKey::ArrowLeft => Key::ArrowLeft,
            NamedKey::ArrowRight => Key::ArrowRight,
            NamedKey::Shift => Key::Shift,
            NamedKey::Control => Key::Control,
            NamedKey::Alt => Key::Alt,
            _ => unknown_key(physical),
        },
        WinitKey::Character(text) => match text.chars().next() {
            Some(' ') => Key::Space,
            Some(c) => Key::Char(c.to_ascii_lowercase()),
            None => unknown_key(physical),
        },
        _ => unknown_key(physical),
    }
}

fn unknown_key(physical: PhysicalKey) -> Key {
    match physical {
        PhysicalKey::Code(code) => Key::Unknown(code as u32),
        // NativeKeyCode has no stable numeric form in winit 0.30.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn characters_are_lowercased() {
        let key = map_key(&WinitKey::Character("Q".into()), PhysicalKey::Code(KeyCode::KeyQ));
        assert_eq!(key, Key::Char('q'));
    }

    #[test]
    fn space_character_is_the_space_key() {
        let key = map_key(&WinitKey::Character(" ".into()), PhysicalKey::Code(KeyCode::Space));
        assert_eq!(key, Key::Space);
        let named = map_key(&WinitKey::Named(NamedKey::Space), PhysicalKey::Code(KeyCode::Space));
        assert_eq!(named, Key::Space);
    }

    #[test]
    fn unmapped_keys_fall_back_to_the_physical_code() {
        let f1 = map_key(&WinitKey::Named(NamedKey::F1), PhysicalKey::Code(KeyCode::F1));
        assert_eq!(f1, Key::Unknown(KeyCode::F1 as u32));

        let dead = map_key(&WinitKey::Dead(None), PhysicalKey::Code(KeyCode::Quote));
        assert_eq!(dead, Key::Unknown(KeyCode::Quote as u32));
    }

    #[test]
    fn extra_mouse_buttons_keep_distinct_numbers() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(map_mouse_button(WinitMouseButton::Back), MouseButton::Other(3));
        assert_eq!(map_mouse_button(WinitMouseButton::Forward), MouseButton::Other(4));
        assert_eq!(map_mouse_button(WinitMouseButton::Other(9)), MouseButton::Other(9));
    }
}
