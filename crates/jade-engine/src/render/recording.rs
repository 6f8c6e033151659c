use std::collections::{BTreeSet, HashMap};

use jade_shader_format::ShaderStage;

use super::backend::{BufferTarget, FrameStatus, RenderBackend, VertexAttribPointer};
use super::color::Color;
use super::handle::{BufferId, ProgramId, StageId, UniformLocation, VertexArrayId};
use super::uniform::UniformValue;

/// One backend call, as observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(StageId, ShaderStage),
    ShaderSource(StageId),
    CompileShader(StageId),
    ShaderCompileStatus(StageId),
    DeleteShader(StageId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, StageId),
    LinkProgram(ProgramId),
    ProgramLinkStatus(ProgramId),
    UseProgram(Option<ProgramId>),
    DeleteProgram(ProgramId),
    UniformLocation(ProgramId, String),
    Uniform(Option<UniformLocation>, UniformValue),
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    CreateBuffer(BufferId),
    BindBuffer(BufferTarget, Option<BufferId>),
    BufferData(BufferTarget, usize),
    DeleteBuffer(BufferId),
    VertexAttribPointer(VertexAttribPointer),
    EnableVertexAttrib(u32),
    DisableVertexAttrib(u32),
    DrawElements(u32),
    ClearColor(Color),
    Clear,
    BeginFrame,
    EndFrame,
}

#[derive(Debug)]
struct StageRecord {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct ProgramRecord {
    stages: Vec<StageId>,
    linked: bool,
    /// `var<uniform>` names declared by the linked stages; the index is the slot.
    uniforms: Vec<String>,
}

/// Names declared as `var<uniform> NAME` in a WGSL source.
fn declared_uniforms(source: &str) -> impl Iterator<Item = &str> {
    source.split("var<uniform>").skip(1).filter_map(|rest| {
        let rest = rest.trim_start();
        let end = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}

/// Headless backend that records every call and simulates driver state.
///
/// Compilation succeeds unless a failure was injected for the stage kind;
/// a uniform exists when an attached stage declares it as `var<uniform>`.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<Call>,
    shaders: Vec<Option<StageRecord>>,
    programs: Vec<Option<ProgramRecord>>,
    vertex_arrays: usize,
    buffers: Vec<Option<Vec<u8>>>,
    compile_failures: HashMap<ShaderStage, String>,
    link_failure: Option<String>,
    current_program: Option<ProgramId>,
    bound_vao: Option<VertexArrayId>,
    array_buffer: Option<BufferId>,
    element_buffer: Option<BufferId>,
    enabled_attribs: BTreeSet<u32>,
    clear_color: Color,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later compile of `stage` fail with `log`.
    pub fn fail_compile(mut self, stage: ShaderStage, log: impl Into<String>) -> Self {
        self.compile_failures.insert(stage, log.into());
        self
    }

    /// Makes every later link fail with `log`.
    pub fn fail_link(mut self, log: impl Into<String>) -> Self {
        self.link_failure = Some(log.into());
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.current_program
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayId> {
        self.bound_vao
    }

    pub fn enabled_attribs(&self) -> &BTreeSet<u32> {
        &self.enabled_attribs
    }

    pub fn last_clear_color(&self) -> Color {
        self.clear_color
    }

    /// Contents of a live buffer.
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(buffer.index())?.as_deref()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.iter().flatten().count()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.iter().flatten().count()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.iter().flatten().count()
    }

    pub fn draw_counts(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::DrawElements(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    fn stage_mut(&mut self, shader: StageId) -> Option<&mut StageRecord> {
        self.shaders.get_mut(shader.index())?.as_mut()
    }

    fn program(&self, program: ProgramId) -> Option<&ProgramRecord> {
        self.programs.get(program.index())?.as_ref()
    }

    fn program_mut(&mut self, program: ProgramId) -> Option<&mut ProgramRecord> {
        self.programs.get_mut(program.index())?.as_mut()
    }

    fn bound(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => self.element_buffer,
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn create_shader(&mut self, stage: ShaderStage) -> StageId {
        let id = StageId::from_index(self.shaders.len());
        self.shaders.push(Some(StageRecord {
            stage,
            source: String::new(),
            compiled: false,
        }));
        self.calls.push(Call::CreateShader(id, stage));
        id
    }

    fn shader_source(&mut self, shader: StageId, source: &str) {
        if let Some(rec) = self.stage_mut(shader) {
            rec.source = source.to_string();
        }
        self.calls.push(Call::ShaderSource(shader));
    }

    fn compile_shader(&mut self, shader: StageId) {
        let stage = self.stage_mut(shader).map(|rec| rec.stage);
        let compiled = stage.is_some_and(|s| !self.compile_failures.contains_key(&s));
        if let Some(rec) = self.stage_mut(shader) {
            rec.compiled = compiled;
        }
        self.calls.push(Call::CompileShader(shader));
    }

    fn shader_compile_status(&mut self, shader: StageId) -> bool {
        self.calls.push(Call::ShaderCompileStatus(shader));
        self.stage_mut(shader).is_some_and(|rec| rec.compiled)
    }

    fn shader_info_log(&mut self, shader: StageId) -> String {
        let Some(rec) = self.stage_mut(shader) else {
            return String::new();
        };
        if rec.compiled {
            return String::new();
        }
        let stage = rec.stage;
        self.compile_failures.get(&stage).cloned().unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: StageId) {
        if let Some(slot) = self.shaders.get_mut(shader.index()) {
            *slot = None;
        }
        self.calls.push(Call::DeleteShader(shader));
    }

    fn create_program(&mut self) -> ProgramId {
        let id = ProgramId::from_index(self.programs.len());
        self.programs.push(Some(ProgramRecord::default()));
        self.calls.push(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&mut self, program: ProgramId, shader: StageId) {
        if let Some(rec) = self.program_mut(program) {
            rec.stages.push(shader);
        }
        self.calls.push(Call::AttachShader(program, shader));
    }

    fn link_program(&mut self, program: ProgramId) {
        self.calls.push(Call::LinkProgram(program));

        let Some(stages) = self.program(program).map(|p| p.stages.clone()) else {
            return;
        };
        let compiled: Vec<&StageRecord> = stages
            .iter()
            .filter_map(|s| self.shaders.get(s.index())?.as_ref())
            .filter(|rec| rec.compiled)
            .collect();
        let linked = self.link_failure.is_none() && compiled.len() == stages.len();

        let mut uniforms: Vec<String> = Vec::new();
        for name in compiled.iter().flat_map(|rec| declared_uniforms(&rec.source)) {
            if !uniforms.iter().any(|n| n == name) {
                uniforms.push(name.to_string());
            }
        }

        if let Some(rec) = self.program_mut(program) {
            rec.linked = linked;
            rec.uniforms = uniforms;
        }
    }

    fn program_link_status(&mut self, program: ProgramId) -> bool {
        self.calls.push(Call::ProgramLinkStatus(program));
        self.program(program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&mut self, program: ProgramId) -> String {
        match self.program(program) {
            Some(p) if !p.linked => self.link_failure.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.current_program = program;
        self.calls.push(Call::UseProgram(program));
    }

    fn delete_program(&mut self, program: ProgramId) {
        if let Some(slot) = self.programs.get_mut(program.index()) {
            *slot = None;
        }
        if self.current_program == Some(program) {
            self.current_program = None;
        }
        self.calls.push(Call::DeleteProgram(program));
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.calls.push(Call::UniformLocation(program, name.to_string()));

        let p = self.program(program).filter(|p| p.linked)?;
        let slot = p.uniforms.iter().position(|n| n == name)?;
        Some(UniformLocation {
            program,
            slot: slot as u32,
        })
    }

    fn uniform(&mut self, location: Option<UniformLocation>, value: UniformValue) {
        self.calls.push(Call::Uniform(location, value));
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let id = VertexArrayId::from_index(self.vertex_arrays);
        self.vertex_arrays += 1;
        self.calls.push(Call::CreateVertexArray(id));
        id
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        self.bound_vao = vao;
        self.calls.push(Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        if self.bound_vao == Some(vao) {
            self.bound_vao = None;
        }
        self.calls.push(Call::DeleteVertexArray(vao));
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = BufferId::from_index(self.buffers.len());
        self.buffers.push(Some(Vec::new()));
        self.calls.push(Call::CreateBuffer(id));
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        match target {
            BufferTarget::Array => self.array_buffer = buffer,
            BufferTarget::ElementArray => self.element_buffer = buffer,
        }
        self.calls.push(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        if let Some(slot) = self
            .bound(target)
            .and_then(|b| self.buffers.get_mut(b.index()))
            .and_then(Option::as_mut)
        {
            *slot = data.to_vec();
        }
        self.calls.push(Call::BufferData(target, data.len()));
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(slot) = self.buffers.get_mut(buffer.index()) {
            *slot = None;
        }
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer(&mut self, pointer: VertexAttribPointer) {
        self.calls.push(Call::VertexAttribPointer(pointer));
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.enabled_attribs.insert(index);
        self.calls.push(Call::EnableVertexAttrib(index));
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.enabled_attribs.remove(&index);
        self.calls.push(Call::DisableVertexAttrib(index));
    }

    fn draw_elements(&mut self, count: u32) {
        self.calls.push(Call::DrawElements(count));
    }

    fn clear_color(&mut self, color: Color) {
        self.clear_color = color;
        self.calls.push(Call::ClearColor(color));
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn begin_frame(&mut self) -> FrameStatus {
        self.calls.push(Call::BeginFrame);
        FrameStatus::Ready
    }

    fn end_frame(&mut self) {
        self.calls.push(Call::EndFrame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_lookup_follows_linked_sources() {
        let mut gl = RecordingBackend::new();
        let vs = gl.create_shader(ShaderStage::Vertex);
        gl.shader_source(vs, "var<uniform> uProjection: mat4x4<f32>;");
        gl.compile_shader(vs);
        let program = gl.create_program();
        gl.attach_shader(program, vs);
        gl.link_program(program);

        assert!(gl.program_link_status(program));
        assert!(gl.uniform_location(program, "uProjection").is_some());
        assert!(gl.uniform_location(program, "uMissing").is_none());
    }

    #[test]
    fn uniform_names_match_whole_declarations() {
        let mut gl = RecordingBackend::new();
        let vs = gl.create_shader(ShaderStage::Vertex);
        gl.shader_source(vs, "@group(0) @binding(0) var<uniform> uViewport: vec4<f32>;");
        gl.compile_shader(vs);
        let program = gl.create_program();
        gl.attach_shader(program, vs);
        gl.link_program(program);

        assert!(gl.uniform_location(program, "uView").is_none());
        assert!(gl.uniform_location(program, "var").is_none());
        assert_eq!(
            gl.uniform_location(program, "uViewport"),
            Some(UniformLocation { program, slot: 0 })
        );
    }

    #[test]
    fn slots_follow_declaration_order_across_stages() {
        let mut gl = RecordingBackend::new();
        let vs = gl.create_shader(ShaderStage::Vertex);
        gl.shader_source(vs, "var<uniform> uProjection: mat4x4<f32>;\nvar<uniform> uView: mat4x4<f32>;");
        let fs = gl.create_shader(ShaderStage::Fragment);
        gl.shader_source(fs, "var<uniform> uView: mat4x4<f32>;\nvar<uniform>uTint: vec4<f32>;");
        gl.compile_shader(vs);
        gl.compile_shader(fs);
        let program = gl.create_program();
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        let slot = |gl: &mut RecordingBackend, name: &str| gl.uniform_location(program, name).map(|l| l.slot);
        assert_eq!(slot(&mut gl, "uView"), Some(1));
        assert_eq!(slot(&mut gl, "uTint"), Some(2));
        assert_eq!(slot(&mut gl, "uProjection"), Some(0));
    }

    #[test]
    fn injected_compile_failure_only_hits_that_stage() {
        let mut gl = RecordingBackend::new().fail_compile(ShaderStage::Fragment, "bad");
        let vs = gl.create_shader(ShaderStage::Vertex);
        let fs = gl.create_shader(ShaderStage::Fragment);
        gl.compile_shader(vs);
        gl.compile_shader(fs);

        assert!(gl.shader_compile_status(vs));
        assert!(!gl.shader_compile_status(fs));
        assert_eq!(gl.shader_info_log(fs), "bad");
        assert_eq!(gl.shader_info_log(vs), "");
    }

    #[test]
    fn buffer_data_targets_bound_buffer() {
        let mut gl = RecordingBackend::new();
        let b = gl.create_buffer();
        gl.bind_buffer(BufferTarget::Array, Some(b));
        gl.buffer_data(BufferTarget::Array, &[1, 2, 3]);
        assert_eq!(gl.buffer_contents(b), Some(&[1u8, 2, 3][..]));

        gl.delete_buffer(b);
        assert_eq!(gl.buffer_contents(b), None);
        assert_eq!(gl.live_buffers(), 0);
    }
}
