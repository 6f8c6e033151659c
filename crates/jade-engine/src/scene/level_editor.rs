use std::mem::{offset_of, size_of};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{Scene, SceneError};
use crate::camera::Camera;
use crate::render::{
    BufferId, BufferTarget, RenderBackend, RenderContext, VertexArrayId, VertexAttribPointer,
};
use crate::shader::{ShaderProgram, ShaderSource};

/// Shader used by the editor, relative to the assets directory.
pub const SHADER_PATH: &str = "shaders/default.shader";

pub const POSITION_ATTRIB: u32 = 0;
pub const COLOR_ATTRIB: u32 = 1;

const POSITION_COMPONENTS: u32 = 3;
const COLOR_COMPONENTS: u32 = 4;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 4],
}

pub const VERTEX_STRIDE: u32 = size_of::<Vertex>() as u32;
/// Byte offset of the color attribute: three position floats.
pub const COLOR_OFFSET: u32 = offset_of!(Vertex, color) as u32;

const fn vertex(position: [f32; 3], color: [f32; 4]) -> Vertex {
    Vertex { position, color }
}

const VERTICES: [Vertex; 4] = [
    vertex([100.5, 0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),   // bottom right
    vertex([0.5, 100.5, 0.0], [0.0, 1.0, 0.0, 1.0]),   // top left
    vertex([100.5, 100.5, 0.0], [0.0, 0.0, 1.0, 1.0]), // top right
    vertex([0.0, 0.0, 0.0], [1.0, 1.0, 0.0, 1.0]),     // bottom left
];

/// Two counter-clockwise triangles.
const INDICES: [u32; 6] = [2, 1, 0, 0, 1, 3];

/// Draws one colored quad through the default shader.
#[derive(Debug)]
pub struct LevelEditorScene {
    camera: Camera,
    shader: ShaderProgram,
    vao: VertexArrayId,
    vbo: BufferId,
    ebo: BufferId,
}

impl LevelEditorScene {
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn index_count(&self) -> u32 {
        INDICES.len() as u32
    }
}

impl Scene for LevelEditorScene {
    fn init<B: RenderBackend>(ctx: &mut RenderContext<B>, assets_dir: &Path) -> Result<Self, SceneError> {
        let camera = Camera::new(Vec2::ZERO);
        let shader = ShaderSource::load(assets_dir.join(SHADER_PATH))?.compile(ctx)?;

        let gl = ctx.backend_mut();

        let vao = gl.create_vertex_array();
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer();
        gl.bind_buffer(BufferTarget::Array, Some(vbo));
        gl.buffer_data(BufferTarget::Array, bytemuck::cast_slice(&VERTICES));

        let ebo = gl.create_buffer();
        gl.bind_buffer(BufferTarget::ElementArray, Some(ebo));
        gl.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(&INDICES));

        gl.vertex_attrib_pointer(VertexAttribPointer {
            index: POSITION_ATTRIB,
            components: POSITION_COMPONENTS,
            stride: VERTEX_STRIDE,
            offset: 0,
        });
        gl.enable_vertex_attrib_array(POSITION_ATTRIB);

        gl.vertex_attrib_pointer(VertexAttribPointer {
            index: COLOR_ATTRIB,
            components: COLOR_COMPONENTS,
            stride: VERTEX_STRIDE,
            offset: COLOR_OFFSET,
        });
        gl.enable_vertex_attrib_array(COLOR_ATTRIB);

        Ok(Self {
            camera,
            shader,
            vao,
            vbo,
            ebo,
        })
    }

    fn update<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, _dt: f32) {
        self.shader.use_program(ctx);
        self.shader
            .upload_mat4(ctx, "uProjection", self.camera.projection_matrix());
        self.shader
            .upload_mat4(ctx, "uView", self.camera.view_matrix());

        let gl = ctx.backend_mut();
        gl.bind_vertex_array(Some(self.vao));
        gl.enable_vertex_attrib_array(POSITION_ATTRIB);
        gl.enable_vertex_attrib_array(COLOR_ATTRIB);

        ctx.draw_elements(self.index_count());

        let gl = ctx.backend_mut();
        gl.disable_vertex_attrib_array(POSITION_ATTRIB);
        gl.disable_vertex_attrib_array(COLOR_ATTRIB);
        gl.bind_vertex_array(None);

        self.shader.detach(ctx);
    }

    fn dispose<B: RenderBackend>(self, ctx: &mut RenderContext<B>) {
        self.shader.delete(ctx);

        let gl = ctx.backend_mut();
        gl.delete_buffer(self.ebo);
        gl.delete_buffer(self.vbo);
        gl.delete_vertex_array(self.vao);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use glam::Mat4;

    use crate::render::{Call, RecordingBackend, UniformValue};

    const SHADER: &str = "#type vertex\n\
        @group(0) @binding(0) var<uniform> uProjection: mat4x4<f32>;\n\
        @group(0) @binding(1) var<uniform> uView: mat4x4<f32>;\n\
        #type fragment\n\
        @fragment fn fs_main() {}\n";

    fn assets(shader: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("shaders")).unwrap();
        fs::write(dir.path().join(SHADER_PATH), shader).unwrap();
        dir
    }

    fn initialized() -> (tempfile::TempDir, RenderContext<RecordingBackend>, LevelEditorScene) {
        let dir = assets(SHADER);
        let mut ctx = RenderContext::new(RecordingBackend::new());
        let scene = LevelEditorScene::init(&mut ctx, dir.path()).unwrap();
        ctx.backend_mut().clear_calls();
        (dir, ctx, scene)
    }

    #[test]
    fn color_offset_is_three_floats_in_bytes() {
        // Position components times float size, not position times color components.
        assert_eq!(COLOR_OFFSET, 12);
        assert_eq!(COLOR_OFFSET, POSITION_COMPONENTS * size_of::<f32>() as u32);
        assert_eq!(VERTEX_STRIDE, 28);
    }

    #[test]
    fn init_uploads_interleaved_vertices_and_indices() {
        let dir = assets(SHADER);
        let mut ctx = RenderContext::new(RecordingBackend::new());
        let scene = LevelEditorScene::init(&mut ctx, dir.path()).unwrap();

        let gl = ctx.backend();
        let vertices = gl.buffer_contents(scene.vbo).unwrap();
        assert_eq!(vertices.len(), 4 * 28);
        let indices = gl.buffer_contents(scene.ebo).unwrap();
        assert_eq!(indices.len(), 6 * 4);

        let pointers: Vec<VertexAttribPointer> = gl
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::VertexAttribPointer(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(pointers.len(), 2);
        assert_eq!((pointers[0].components, pointers[0].offset), (3, 0));
        assert_eq!((pointers[1].components, pointers[1].offset), (4, 12));
        assert!(pointers.iter().all(|p| p.stride == 28));
    }

    #[test]
    fn update_draws_all_indices_once_for_any_dt() {
        for dt in [0.0, -1.0, 0.016, 5.0] {
            let (_dir, mut ctx, mut scene) = initialized();
            scene.update(&mut ctx, dt);

            assert_eq!(ctx.backend().draw_counts(), vec![6], "dt = {dt}");
            assert!(ctx.backend().enabled_attribs().is_empty(), "dt = {dt}");
            assert_eq!(ctx.backend().bound_vertex_array(), None);
            assert_eq!(ctx.backend().current_program(), None);
            assert_eq!(ctx.stats().draw_calls, 1);
        }
    }

    #[test]
    fn update_uploads_projection_and_view() {
        let (_dir, mut ctx, mut scene) = initialized();
        scene.update(&mut ctx, 0.0);

        let names: Vec<&str> = ctx
            .backend()
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::UniformLocation(_, name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["uProjection", "uView"]);
        let uploaded: Vec<Mat4> = ctx
            .backend()
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::Uniform(Some(_), UniformValue::Mat4(m)) => Some(*m),
                _ => None,
            })
            .collect();
        let camera = scene.camera();
        assert_eq!(uploaded, [camera.projection_matrix(), camera.view_matrix()]);
    }

    #[test]
    fn bad_shader_file_makes_no_gpu_calls() {
        let dir = assets("#type vertex\nonly one block\n");
        let mut ctx = RenderContext::new(RecordingBackend::new());

        let err = LevelEditorScene::init(&mut ctx, dir.path()).unwrap_err();
        assert!(matches!(err, SceneError::Shader(_)));
        assert!(ctx.backend().calls().is_empty());
    }

    #[test]
    fn dispose_releases_everything() {
        let (_dir, mut ctx, scene) = initialized();
        scene.dispose(&mut ctx);

        let gl = ctx.backend();
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_buffers(), 0);
        assert!(gl.calls().iter().any(|c| matches!(c, Call::DeleteVertexArray(_))));
    }
}
