use jade_shader_format::ShaderStage;

use super::color::Color;
use super::handle::{BufferId, ProgramId, StageId, UniformLocation, VertexArrayId};
use super::uniform::UniformValue;

/// Buffer binding point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data; captured by `vertex_attrib_pointer`.
    Array,
    /// Index data; binding is stored in the bound vertex array.
    ElementArray,
}

/// Float vertex attribute sourced from the currently bound array buffer.
///
/// `stride` and `offset` are in bytes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribPointer {
    pub index: u32,
    pub components: u32,
    pub stride: u32,
    pub offset: u32,
}

/// Outcome of acquiring the next frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// A framebuffer is ready; draw, then `end_frame`.
    Ready,
    /// Transient failure; skip drawing this iteration.
    Skip,
    /// Unrecoverable; the loop should stop.
    Fatal,
}

/// Graphics driver boundary.
///
/// Mirrors the immediate-mode model the engine is written against: a single
/// current program, a single bound vertex array, a global array-buffer
/// binding, and handles that stay valid until deleted. Implementations are
/// driven from one thread through [`RenderContext`](super::RenderContext).
///
/// Queries take `&mut self` because a backend may record them.
pub trait RenderBackend {
    // ── shader stages ───────────────────────────────────────────────────

    fn create_shader(&mut self, stage: ShaderStage) -> StageId;
    fn shader_source(&mut self, shader: StageId, source: &str);
    fn compile_shader(&mut self, shader: StageId);
    fn shader_compile_status(&mut self, shader: StageId) -> bool;
    fn shader_info_log(&mut self, shader: StageId) -> String;
    fn delete_shader(&mut self, shader: StageId);

    // ── programs ────────────────────────────────────────────────────────

    fn create_program(&mut self) -> ProgramId;
    fn attach_shader(&mut self, program: ProgramId, shader: StageId);
    fn link_program(&mut self, program: ProgramId);
    fn program_link_status(&mut self, program: ProgramId) -> bool;
    fn program_info_log(&mut self, program: ProgramId) -> String;
    /// Makes `program` current; `None` unbinds.
    fn use_program(&mut self, program: Option<ProgramId>);
    fn delete_program(&mut self, program: ProgramId);

    // ── uniforms ────────────────────────────────────────────────────────

    /// `None` is the "no such uniform" sentinel.
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    /// Writes `value` for the current program. `None` is silently ignored.
    fn uniform(&mut self, location: Option<UniformLocation>, value: UniformValue);

    // ── vertex arrays & buffers ─────────────────────────────────────────

    fn create_vertex_array(&mut self) -> VertexArrayId;
    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>);
    fn delete_vertex_array(&mut self, vao: VertexArrayId);

    fn create_buffer(&mut self) -> BufferId;
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);
    /// Replaces the contents of the buffer bound to `target`.
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&mut self, buffer: BufferId);

    fn vertex_attrib_pointer(&mut self, pointer: VertexAttribPointer);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);

    // ── drawing ─────────────────────────────────────────────────────────

    /// Draws `count` `u32` indices from the bound vertex array as triangles.
    fn draw_elements(&mut self, count: u32);
    fn clear_color(&mut self, color: Color);
    /// Clears the color buffer to the last `clear_color`.
    fn clear(&mut self);

    // ── frame ───────────────────────────────────────────────────────────

    fn begin_frame(&mut self) -> FrameStatus;
    /// Submits recorded work and presents.
    fn end_frame(&mut self);
}
