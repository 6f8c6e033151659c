use std::fs;
use std::path::Path;

use jade_engine::core::{AppControl, AppWindow, WindowConfig, WindowPhase};
use jade_engine::render::{Call, RecordingBackend};
use jade_engine::scene::{SceneError, SceneId};
use jade_engine::shader::ShaderSource;
use jade_shader_format::ShaderStage;
use tempfile::TempDir;

const DEFAULT_SHADER: &str = include_str!("../../jade-game/assets/shaders/default.shader");

fn assets_with(shader: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("shaders")).unwrap();
    fs::write(dir.path().join("shaders/default.shader"), shader).unwrap();
    dir
}

fn window(assets: &Path, default_scene: usize) -> AppWindow<RecordingBackend> {
    let config = WindowConfig {
        assets_dir: assets.to_path_buf(),
        default_scene,
        ..WindowConfig::default()
    };
    AppWindow::new(config, RecordingBackend::new())
}

fn current(window: &AppWindow<RecordingBackend>) -> Option<SceneId> {
    window.scene().map(|s| s.id())
}

#[test]
fn level_editor_draws_one_quad_per_frame_after_the_first() {
    let assets = assets_with(DEFAULT_SHADER);
    let mut window = window(assets.path(), 0);

    window.change_scene(0).unwrap();
    assert_eq!(window.frame(), AppControl::Continue);
    assert!(window.context().backend().draw_counts().is_empty());

    assert_eq!(window.frame(), AppControl::Continue);
    assert_eq!(window.context().backend().draw_counts(), vec![6]);
    assert_eq!(window.context().stats().draw_calls, 1);
    assert_eq!(window.context().stats().indices, 6);
}

#[test]
fn unknown_scene_index_is_rejected_without_touching_the_scene() {
    let assets = assets_with(DEFAULT_SHADER);
    let mut window = window(assets.path(), 0);
    window.init().unwrap();
    let calls_before = window.context().backend().calls().len();

    let err = window.change_scene(2).unwrap_err();

    assert!(matches!(err, SceneError::UnknownScene(2)));
    assert_eq!(current(&window), Some(SceneId::LevelEditor));
    assert_eq!(window.context().backend().calls().len(), calls_before);
}

#[test]
fn switching_scenes_disposes_the_previous_one() {
    let assets = assets_with(DEFAULT_SHADER);
    let mut window = window(assets.path(), 0);
    window.init().unwrap();
    assert_eq!(window.context().backend().live_programs(), 1);

    window.change_scene(1).unwrap();

    let gl = window.context().backend();
    assert_eq!(current(&window), Some(SceneId::Level));
    assert_eq!(gl.live_programs(), 0);
    assert_eq!(gl.live_buffers(), 0);
    assert!(gl.calls().iter().any(|c| matches!(c, Call::DeleteVertexArray(_))));
}

#[test]
fn failed_scene_init_keeps_the_current_scene() {
    let assets = assets_with("#type vertex\nno fragment block\n");
    let mut window = window(assets.path(), 1);
    window.init().unwrap();

    let err = window.change_scene(0).unwrap_err();

    assert!(matches!(err, SceneError::Shader(_)));
    assert_eq!(current(&window), Some(SceneId::Level));
}

#[test]
fn broken_default_scene_fails_init() {
    let assets = assets_with(DEFAULT_SHADER);
    let backend = RecordingBackend::new().fail_compile(ShaderStage::Fragment, "error: bad");
    let config = WindowConfig {
        assets_dir: assets.path().to_path_buf(),
        ..WindowConfig::default()
    };
    let mut window = AppWindow::new(config, backend);

    assert!(window.init().is_err());
    assert_eq!(window.phase(), WindowPhase::Constructed);
    assert_eq!(current(&window), None);
}

#[test]
fn shutdown_releases_the_scene() {
    let assets = assets_with(DEFAULT_SHADER);
    let mut window = window(assets.path(), 0);
    window.init().unwrap();
    window.frame();
    window.frame();

    window.shutdown();

    assert_eq!(window.phase(), WindowPhase::Closed);
    assert_eq!(window.context().backend().live_programs(), 0);
    assert_eq!(window.frame(), AppControl::Exit);
}

#[test]
fn shipped_shader_declares_both_stages_and_uniforms() {
    let source = ShaderSource::parse("default.shader", DEFAULT_SHADER).unwrap();
    assert_eq!(source.order(), [ShaderStage::Vertex, ShaderStage::Fragment]);
    assert!(source.body(ShaderStage::Vertex).contains("uProjection"));
    assert!(source.body(ShaderStage::Vertex).contains("uView"));
    assert!(source.body(ShaderStage::Fragment).contains("@fragment"));
}
