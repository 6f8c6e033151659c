use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use jade_shader_format::ShaderStage;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::backend::{BufferTarget, FrameStatus, RenderBackend, VertexAttribPointer};
use super::color::Color;
use super::handle::{BufferId, ProgramId, StageId, UniformLocation, VertexArrayId};
use super::uniform::UniformValue;
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};

// ── Objects ───────────────────────────────────────────────────────────────

struct StageObject {
    stage: ShaderStage,
    source: String,
    compiled: Option<CompiledStage>,
    log: String,
}

/// A reflected `var<uniform>`: name, group, binding, byte size.
type UniformDecl = (String, u32, u32, u32);

struct CompiledStage {
    module: wgpu::ShaderModule,
    entry_point: String,
    /// `var<uniform>` globals: (name, group, binding, size in bytes).
    uniforms: Vec<UniformDecl>,
}

struct UniformSlot {
    name: String,
    binding: u32,
    size: u64,
    buffer: wgpu::Buffer,
    pending: Option<Vec<u8>>,
}

struct LinkedProgram {
    vertex: wgpu::ShaderModule,
    vertex_entry: String,
    fragment: wgpu::ShaderModule,
    fragment_entry: String,
    uniforms: Vec<UniformSlot>,
    bind_group: wgpu::BindGroup,
    layout: wgpu::PipelineLayout,
    pipelines: HashMap<Vec<BufferLayoutKey>, wgpu::RenderPipeline>,
}

#[derive(Default)]
struct ProgramObject {
    stages: Vec<StageId>,
    linked: Option<LinkedProgram>,
    log: String,
}

#[derive(Debug, Copy, Clone)]
struct AttribState {
    source: Option<(VertexAttribPointer, BufferId)>,
    enabled: bool,
}

#[derive(Default)]
struct VertexArrayObject {
    attribs: BTreeMap<u32, AttribState>,
    element_buffer: Option<BufferId>,
}

struct BufferObject {
    gpu: Option<wgpu::Buffer>,
    len: u64,
}

/// One vertex buffer slot of a pipeline: stride plus (location, components, offset).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BufferLayoutKey {
    stride: u64,
    attributes: Vec<(u32, u32, u64)>,
}

struct FrameState {
    gpu: GpuFrame,
    pending_clear: Option<Color>,
}

// ── Backend ───────────────────────────────────────────────────────────────

/// [`RenderBackend`] on wgpu.
///
/// Stage bodies are WGSL. Compilation is naga parsing plus validation; the
/// diagnostic becomes the info log. Linking reflects `var<uniform>` globals
/// of bind group 0 into per-uniform buffers addressed by name. Render
/// pipelines are created on first draw for each vertex layout.
///
/// Draws are only recorded between `begin_frame` and `end_frame`; the clear
/// requested by `clear` is folded into the next render pass of the frame.
pub struct WgpuBackend<'w> {
    gpu: Gpu<'w>,
    window: &'w Window,
    shaders: Vec<Option<StageObject>>,
    programs: Vec<Option<ProgramObject>>,
    vertex_arrays: Vec<Option<VertexArrayObject>>,
    buffers: Vec<Option<BufferObject>>,
    current_program: Option<ProgramId>,
    bound_vao: Option<VertexArrayId>,
    array_buffer: Option<BufferId>,
    clear_color: Color,
    frame: Option<FrameState>,
}

impl<'w> WgpuBackend<'w> {
    pub fn new(gpu: Gpu<'w>, window: &'w Window) -> Self {
        Self {
            gpu,
            window,
            shaders: Vec::new(),
            programs: Vec::new(),
            vertex_arrays: Vec::new(),
            buffers: Vec::new(),
            current_program: None,
            bound_vao: None,
            array_buffer: None,
            clear_color: Color::default(),
            frame: None,
        }
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
    }

    fn vao_mut(&mut self) -> Option<&mut VertexArrayObject> {
        let id = self.bound_vao?;
        self.vertex_arrays.get_mut(id.index())?.as_mut()
    }

    fn buffer_for(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => {
                let id = self.bound_vao?;
                self.vertex_arrays.get(id.index())?.as_ref()?.element_buffer
            }
        }
    }

    fn live_buffer(&self, id: BufferId) -> Option<(&wgpu::Buffer, u64)> {
        let obj = self.buffers.get(id.index())?.as_ref()?;
        Some((obj.gpu.as_ref()?, obj.len))
    }

    /// Vertex buffer slots for the bound vertex array, in slot order.
    fn vertex_layout(&self) -> Result<Vec<(BufferId, BufferLayoutKey)>, String> {
        let id = self.bound_vao.ok_or("no vertex array bound")?;
        let vao = self
            .vertex_arrays
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or("bound vertex array was deleted")?;

        let mut groups: BTreeMap<(BufferId, u64), Vec<(u32, u32, u64)>> = BTreeMap::new();
        for (&location, attrib) in vao.attribs.iter().filter(|(_, a)| a.enabled) {
            let (ptr, buffer) = attrib
                .source
                .ok_or_else(|| format!("attribute {location} enabled without a pointer"))?;
            let stride = match ptr.stride {
                0 => u64::from(ptr.components) * 4,
                s => u64::from(s),
            };
            groups
                .entry((buffer, stride))
                .or_default()
                .push((location, ptr.components, u64::from(ptr.offset)));
        }

        Ok(groups
            .into_iter()
            .map(|((buffer, stride), attributes)| (buffer, BufferLayoutKey { stride, attributes }))
            .collect())
    }
}

fn float_format(components: u32) -> Option<wgpu::VertexFormat> {
    match components {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

/// Parses and validates a WGSL stage body.
fn compile_wgsl(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledStage, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| e.emit_to_string(source))?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga_stage(stage))
        .map(|ep| ep.name.clone())
        .ok_or_else(|| format!("no @{stage} entry point"))?;

    let uniforms = module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == naga::AddressSpace::Uniform)
        .filter_map(|(_, var)| {
            let name = var.name.clone()?;
            let binding = var.binding.as_ref()?;
            let size = module.types[var.ty].inner.size(module.to_ctx());
            Some((name, binding.group, binding.binding, size))
        })
        .collect();

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage.as_str()),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    });

    Ok(CompiledStage {
        module,
        entry_point,
        uniforms,
    })
}

/// Merges uniform declarations by binding.
///
/// Only group 0 is supported. A binding declared by both stages must agree
/// on name and size.
fn merge_uniforms<'a>(
    decls: impl IntoIterator<Item = &'a UniformDecl>,
) -> Result<BTreeMap<u32, (String, u32)>, String> {
    let mut merged: BTreeMap<u32, (String, u32)> = BTreeMap::new();
    for (name, group, binding, size) in decls {
        if *group != 0 {
            return Err(format!("uniform `{name}` is in group {group}; only group 0 is supported"));
        }
        match merged.get(binding) {
            Some((other, other_size)) if other != name || other_size != size => {
                return Err(format!(
                    "binding {binding} is declared as both `{other}` and `{name}`"
                ));
            }
            Some(_) => {}
            None => {
                merged.insert(*binding, (name.clone(), *size));
            }
        }
    }
    Ok(merged)
}

/// Merges the uniforms of both stages and builds their buffers and bind group.
fn link_stages(
    device: &wgpu::Device,
    vertex: &CompiledStage,
    fragment: &CompiledStage,
) -> Result<LinkedProgram, String> {
    let merged = merge_uniforms(vertex.uniforms.iter().chain(&fragment.uniforms))?;

    let uniforms: Vec<UniformSlot> = merged
        .into_iter()
        .map(|(binding, (name, size))| {
            let size = u64::from(size).max(16).next_multiple_of(16);
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&name),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            UniformSlot {
                name,
                binding,
                size,
                buffer,
                pending: None,
            }
        })
        .collect();

    let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = uniforms
        .iter()
        .map(|u| wgpu::BindGroupLayoutEntry {
            binding: u.binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        })
        .collect();

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("jade uniforms"),
        entries: &layout_entries,
    });

    let group_entries: Vec<wgpu::BindGroupEntry> = uniforms
        .iter()
        .map(|u| wgpu::BindGroupEntry {
            binding: u.binding,
            resource: u.buffer.as_entire_binding(),
        })
        .collect();

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("jade uniforms"),
        layout: &bind_group_layout,
        entries: &group_entries,
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("jade program"),
        bind_group_layouts: &[&bind_group_layout],
        immediate_size: 0,
    });

    Ok(LinkedProgram {
        vertex: vertex.module.clone(),
        vertex_entry: vertex.entry_point.clone(),
        fragment: fragment.module.clone(),
        fragment_entry: fragment.entry_point.clone(),
        uniforms,
        bind_group,
        layout,
        pipelines: HashMap::new(),
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    program: &LinkedProgram,
    key: &[BufferLayoutKey],
) -> Result<wgpu::RenderPipeline, String> {
    let attributes = key
        .iter()
        .map(|slot| {
            slot.attributes
                .iter()
                .map(|&(location, components, offset)| {
                    let format = float_format(components).ok_or_else(|| {
                        format!("attribute {location} has {components} components")
                    })?;
                    Ok(wgpu::VertexAttribute {
                        format,
                        offset,
                        shader_location: location,
                    })
                })
                .collect::<Result<Vec<_>, String>>()
        })
        .collect::<Result<Vec<_>, String>>()?;

    let buffers: Vec<wgpu::VertexBufferLayout> = key
        .iter()
        .zip(&attributes)
        .map(|(slot, attributes)| wgpu::VertexBufferLayout {
            array_stride: slot.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        })
        .collect();

    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("jade pipeline"),
        layout: Some(&program.layout),
        vertex: wgpu::VertexState {
            module: &program.vertex,
            entry_point: Some(&program.vertex_entry),
            compilation_options: Default::default(),
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &program.fragment,
            entry_point: Some(&program.fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    }))
}

fn color_attachment(
    view: &wgpu::TextureView,
    clear: Option<Color>,
) -> wgpu::RenderPassColorAttachment<'_> {
    wgpu::RenderPassColorAttachment {
        view,
        depth_slice: None,
        resolve_target: None,
        ops: wgpu::Operations {
            load: match clear {
                Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
                None => wgpu::LoadOp::Load,
            },
            store: wgpu::StoreOp::Store,
        },
    }
}

impl RenderBackend for WgpuBackend<'_> {
    fn create_shader(&mut self, stage: ShaderStage) -> StageId {
        let id = StageId::from_index(self.shaders.len());
        self.shaders.push(Some(StageObject {
            stage,
            source: String::new(),
            compiled: None,
            log: String::new(),
        }));
        id
    }

    fn shader_source(&mut self, shader: StageId, source: &str) {
        if let Some(Some(obj)) = self.shaders.get_mut(shader.index()) {
            obj.source = source.to_string();
        }
    }

    fn compile_shader(&mut self, shader: StageId) {
        let Some(Some(obj)) = self.shaders.get_mut(shader.index()) else {
            log::warn!("compile of unknown shader {}", shader.get());
            return;
        };
        match compile_wgsl(self.gpu.device(), obj.stage, &obj.source) {
            Ok(compiled) => {
                obj.compiled = Some(compiled);
                obj.log.clear();
            }
            Err(log) => {
                obj.compiled = None;
                obj.log = log;
            }
        }
    }

    fn shader_compile_status(&mut self, shader: StageId) -> bool {
        matches!(self.shaders.get(shader.index()), Some(Some(obj)) if obj.compiled.is_some())
    }

    fn shader_info_log(&mut self, shader: StageId) -> String {
        match self.shaders.get(shader.index()) {
            Some(Some(obj)) => obj.log.clone(),
            _ => String::new(),
        }
    }

    fn delete_shader(&mut self, shader: StageId) {
        if let Some(slot) = self.shaders.get_mut(shader.index()) {
            *slot = None;
        }
    }

    fn create_program(&mut self) -> ProgramId {
        let id = ProgramId::from_index(self.programs.len());
        self.programs.push(Some(ProgramObject::default()));
        id
    }

    fn attach_shader(&mut self, program: ProgramId, shader: StageId) {
        if let Some(Some(obj)) = self.programs.get_mut(program.index()) {
            obj.stages.push(shader);
        }
    }

    fn link_program(&mut self, program: ProgramId) {
        let Some(Some(obj)) = self.programs.get(program.index()) else {
            log::warn!("link of unknown program {}", program.get());
            return;
        };

        let compiled = |stage: ShaderStage| {
            obj.stages
                .iter()
                .filter_map(|id| self.shaders.get(id.index())?.as_ref())
                .filter(|s| s.stage == stage)
                .find_map(|s| s.compiled.as_ref())
                .ok_or_else(|| format!("no compiled {stage} stage attached"))
        };

        let result = compiled(ShaderStage::Vertex).and_then(|vs| {
            let fs = compiled(ShaderStage::Fragment)?;
            link_stages(self.gpu.device(), vs, fs)
        });

        if let Some(Some(obj)) = self.programs.get_mut(program.index()) {
            match result {
                Ok(linked) => {
                    obj.linked = Some(linked);
                    obj.log.clear();
                }
                Err(log) => {
                    obj.linked = None;
                    obj.log = log;
                }
            }
        }
    }

    fn program_link_status(&mut self, program: ProgramId) -> bool {
        matches!(self.programs.get(program.index()), Some(Some(obj)) if obj.linked.is_some())
    }

    fn program_info_log(&mut self, program: ProgramId) -> String {
        match self.programs.get(program.index()) {
            Some(Some(obj)) => obj.log.clone(),
            _ => String::new(),
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.current_program = program;
    }

    fn delete_program(&mut self, program: ProgramId) {
        if let Some(slot) = self.programs.get_mut(program.index()) {
            *slot = None;
        }
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let linked = self.programs.get(program.index())?.as_ref()?.linked.as_ref()?;
        let slot = linked.uniforms.iter().position(|u| u.name == name)?;
        Some(UniformLocation {
            program,
            slot: slot as u32,
        })
    }

    fn uniform(&mut self, location: Option<UniformLocation>, value: UniformValue) {
        let Some(location) = location else { return };
        if self.current_program != Some(location.program) {
            log::warn!("uniform write for program {} while it is not in use", location.program.get());
            return;
        }
        let Some(slot) = self
            .programs
            .get_mut(location.program.index())
            .and_then(Option::as_mut)
            .and_then(|p| p.linked.as_mut())
            .and_then(|l| l.uniforms.get_mut(location.slot as usize))
        else {
            return;
        };

        let bytes = value.to_uniform_bytes();
        if bytes.len() as u64 > slot.size {
            log::warn!("value of {} bytes does not fit uniform `{}`", bytes.len(), slot.name);
            return;
        }
        slot.pending = Some(bytes);
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let id = VertexArrayId::from_index(self.vertex_arrays.len());
        self.vertex_arrays.push(Some(VertexArrayObject::default()));
        id
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        self.bound_vao = vao;
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        if let Some(slot) = self.vertex_arrays.get_mut(vao.index()) {
            *slot = None;
        }
        if self.bound_vao == Some(vao) {
            self.bound_vao = None;
        }
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = BufferId::from_index(self.buffers.len());
        self.buffers.push(Some(BufferObject { gpu: None, len: 0 }));
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        match target {
            BufferTarget::Array => self.array_buffer = buffer,
            BufferTarget::ElementArray => match self.vao_mut() {
                Some(vao) => vao.element_buffer = buffer,
                None => log::warn!("element buffer bound with no vertex array"),
            },
        }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        let Some(id) = self.buffer_for(target) else {
            log::warn!("buffer_data with nothing bound to {target:?}");
            return;
        };
        let buffer = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("jade buffer"),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX
                    | wgpu::BufferUsages::INDEX
                    | wgpu::BufferUsages::COPY_DST,
            });
        if let Some(Some(obj)) = self.buffers.get_mut(id.index()) {
            obj.gpu = Some(buffer);
            obj.len = data.len() as u64;
        }
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(slot) = self.buffers.get_mut(buffer.index()) {
            *slot = None;
        }
        if self.array_buffer == Some(buffer) {
            self.array_buffer = None;
        }
    }

    fn vertex_attrib_pointer(&mut self, pointer: VertexAttribPointer) {
        let Some(buffer) = self.array_buffer else {
            log::warn!("attribute {} pointer with no array buffer bound", pointer.index);
            return;
        };
        match self.vao_mut() {
            Some(vao) => {
                vao.attribs
                    .entry(pointer.index)
                    .or_insert(AttribState {
                        source: None,
                        enabled: false,
                    })
                    .source = Some((pointer, buffer));
            }
            None => log::warn!("attribute pointer with no vertex array bound"),
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        if let Some(vao) = self.vao_mut() {
            vao.attribs
                .entry(index)
                .or_insert(AttribState {
                    source: None,
                    enabled: false,
                })
                .enabled = true;
        }
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        if let Some(attrib) = self.vao_mut().and_then(|vao| vao.attribs.get_mut(&index)) {
            attrib.enabled = false;
        }
    }

    fn draw_elements(&mut self, count: u32) {
        if self.frame.is_none() {
            log::warn!("draw outside of a frame ignored");
            return;
        }
        let Some(program_id) = self.current_program else {
            log::warn!("draw with no program in use");
            return;
        };
        let layout = match self.vertex_layout() {
            Ok(layout) => layout,
            Err(e) => {
                log::warn!("draw skipped: {e}");
                return;
            }
        };
        let Some(index_buffer) = self.buffer_for(BufferTarget::ElementArray) else {
            log::warn!("draw skipped: no element buffer");
            return;
        };
        match self.live_buffer(index_buffer) {
            Some((_, len)) if u64::from(count) * 4 <= len => {}
            _ => {
                log::warn!("draw skipped: {count} indices exceed the element buffer");
                return;
            }
        }

        let Self {
            gpu,
            programs,
            buffers,
            frame,
            ..
        } = self;
        let device = gpu.device();

        let Some(program) = programs
            .get_mut(program_id.index())
            .and_then(Option::as_mut)
            .and_then(|p| p.linked.as_mut())
        else {
            log::warn!("draw with unlinked program {}", program_id.get());
            return;
        };

        let key: Vec<BufferLayoutKey> = layout.iter().map(|(_, k)| k.clone()).collect();
        if !program.pipelines.contains_key(&key) {
            match create_pipeline(device, gpu.surface_format(), program, &key) {
                Ok(pipeline) => {
                    program.pipelines.insert(key.clone(), pipeline);
                }
                Err(e) => {
                    log::warn!("draw skipped: {e}");
                    return;
                }
            }
        }

        let Some(frame) = frame.as_mut() else { return };
        let encoder = &mut frame.gpu.encoder;

        for slot in &mut program.uniforms {
            if let Some(bytes) = slot.pending.take() {
                let staging = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("jade uniform staging"),
                    contents: &bytes,
                    usage: wgpu::BufferUsages::COPY_SRC,
                });
                encoder.copy_buffer_to_buffer(&staging, 0, &slot.buffer, 0, bytes.len() as u64);
            }
        }

        let buffers: &[Option<BufferObject>] = buffers;
        let live = |id: BufferId| buffers.get(id.index())?.as_ref()?.gpu.as_ref();
        let Some(index_gpu) = live(index_buffer) else { return };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("jade draw"),
            color_attachments: &[Some(color_attachment(
                &frame.gpu.view,
                frame.pending_clear.take(),
            ))],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if let Some(pipeline) = program.pipelines.get(&key) {
            pass.set_pipeline(pipeline);
        }
        pass.set_bind_group(0, &program.bind_group, &[]);
        for (slot, (buffer, _)) in layout.iter().enumerate() {
            match live(*buffer) {
                Some(vb) => pass.set_vertex_buffer(slot as u32, vb.slice(..)),
                None => {
                    log::warn!("draw skipped: vertex buffer {} has no data", buffer.get());
                    return;
                }
            }
        }
        pass.set_index_buffer(index_gpu.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..count, 0, 0..1);
    }

    fn clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        let color = self.clear_color;
        if let Some(frame) = self.frame.as_mut() {
            frame.pending_clear = Some(color);
        }
    }

    fn begin_frame(&mut self) -> FrameStatus {
        if self.frame.is_some() {
            return FrameStatus::Ready;
        }
        match self.gpu.begin_frame() {
            Ok(gpu) => {
                self.frame = Some(FrameState {
                    gpu,
                    pending_clear: None,
                });
                FrameStatus::Ready
            }
            Err(err) => match self.gpu.handle_surface_error(err) {
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                    FrameStatus::Skip
                }
                SurfaceErrorAction::Fatal => FrameStatus::Fatal,
            },
        }
    }

    fn end_frame(&mut self) {
        let Some(mut frame) = self.frame.take() else { return };

        // A clear with no draw after it still needs a pass of its own.
        if let Some(clear) = frame.pending_clear.take() {
            let _rpass = frame.gpu.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("jade clear"),
                color_attachments: &[Some(color_attachment(&frame.gpu.view, Some(clear)))],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.window.pre_present_notify();
        self.gpu.present(frame.gpu);
    }
}
