use std::path::{Path, PathBuf};

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::render::{ProgramId, RenderBackend, RenderContext, UniformValue};

/// A linked shader program.
///
/// `bound` mirrors whether this program was the last one made current
/// through [`use_program`](Self::use_program) and not detached since.
#[derive(Debug)]
pub struct ShaderProgram {
    id: ProgramId,
    path: PathBuf,
    bound: bool,
}

impl ShaderProgram {
    pub(crate) fn new(id: ProgramId, path: PathBuf) -> Self {
        Self {
            id,
            path,
            bound: false,
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Makes the program current. No backend call if it already is.
    pub fn use_program<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>) {
        if !self.bound {
            ctx.backend_mut().use_program(Some(self.id));
            self.bound = true;
        }
    }

    /// Unbinds whatever program is current.
    pub fn detach<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>) {
        ctx.backend_mut().use_program(None);
        self.bound = false;
    }

    pub fn upload_mat4<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, name: &str, value: Mat4) {
        self.upload(ctx, name, UniformValue::Mat4(value));
    }

    pub fn upload_mat3<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, name: &str, value: Mat3) {
        self.upload(ctx, name, UniformValue::Mat3(value));
    }

    pub fn upload_vec4<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, name: &str, value: Vec4) {
        self.upload(ctx, name, UniformValue::Vec4(value));
    }

    pub fn upload_vec3<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, name: &str, value: Vec3) {
        self.upload(ctx, name, UniformValue::Vec3(value));
    }

    pub fn upload_vec2<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, name: &str, value: Vec2) {
        self.upload(ctx, name, UniformValue::Vec2(value));
    }

    pub fn upload_f32<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, name: &str, value: f32) {
        self.upload(ctx, name, UniformValue::F32(value));
    }

    pub fn upload_i32<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, name: &str, value: i32) {
        self.upload(ctx, name, UniformValue::I32(value));
    }

    /// Looks the location up on every call, binds, then writes. An unknown
    /// name resolves to `None`, which the backend ignores.
    fn upload<B: RenderBackend>(&mut self, ctx: &mut RenderContext<B>, name: &str, value: UniformValue) {
        let location = ctx.backend_mut().uniform_location(self.id, name);
        self.use_program(ctx);
        ctx.backend_mut().uniform(location, value);
    }

    /// Releases the program object.
    pub fn delete<B: RenderBackend>(mut self, ctx: &mut RenderContext<B>) {
        if self.bound {
            self.detach(ctx);
        }
        ctx.backend_mut().delete_program(self.id);
    }
}
