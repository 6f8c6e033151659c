use std::fs;
use std::path::{Path, PathBuf};

use jade_shader_format::{numbered_listing, parse_str, DualStageSource, ShaderStage};

use super::{ShaderError, ShaderProgram};
use crate::render::{RenderBackend, RenderContext, StageId};

/// A parsed, not yet compiled, shader source.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    path: PathBuf,
    stages: DualStageSource,
}

impl ShaderSource {
    /// Reads and parses the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parses `text`; `path` only labels diagnostics.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, ShaderError> {
        let path = path.into();
        let stages = parse_str(text).map_err(|source| ShaderError::Parse {
            path: path.clone(),
            source,
        })?;

        for stage in stages.order {
            log::debug!(
                "{} {stage} stage:\n{}",
                path.display(),
                stages.body(stage)
            );
        }

        Ok(Self { path, stages })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn body(&self, stage: ShaderStage) -> &str {
        self.stages.body(stage)
    }

    /// Stages in the order their blocks appeared in the file.
    pub fn order(&self) -> [ShaderStage; 2] {
        self.stages.order
    }

    /// Compiles both stages and links them into a program.
    ///
    /// Stage objects are deleted before returning, whether or not linking
    /// succeeded. A failed link also deletes the program.
    pub fn compile<B: RenderBackend>(
        &self,
        ctx: &mut RenderContext<B>,
    ) -> Result<ShaderProgram, ShaderError> {
        let gl = ctx.backend_mut();

        let vertex = self.compile_stage(gl, ShaderStage::Vertex)?;
        let fragment = match self.compile_stage(gl, ShaderStage::Fragment) {
            Ok(id) => id,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let program = gl.create_program();
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        let linked = gl.program_link_status(program);

        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !linked {
            let log = gl.program_info_log(program);
            gl.delete_program(program);
            log::error!("{}: program link failed\n{log}", self.path.display());
            return Err(ShaderError::Link {
                path: self.path.clone(),
                log,
            });
        }

        Ok(ShaderProgram::new(program, self.path.clone()))
    }

    fn compile_stage<B: RenderBackend>(
        &self,
        gl: &mut B,
        stage: ShaderStage,
    ) -> Result<StageId, ShaderError> {
        let body = self.stages.body(stage);
        let id = gl.create_shader(stage);
        gl.shader_source(id, body);
        gl.compile_shader(id);

        // Status is read from the stage object just compiled, for the
        // fragment stage as much as the vertex stage.
        if gl.shader_compile_status(id) {
            return Ok(id);
        }

        let log = gl.shader_info_log(id);
        gl.delete_shader(id);
        log::error!(
            "{}: {stage} stage compilation failed\n{}",
            self.path.display(),
            numbered_listing(body, &log)
        );
        Err(ShaderError::Compile {
            stage,
            path: self.path.clone(),
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Call, RecordingBackend};

    const SRC: &str = "#type vertex\nvar<uniform> uProjection: mat4x4<f32>;\n#type fragment\nfs\n";

    fn fragment_stage_id(calls: &[Call]) -> Option<StageId> {
        calls.iter().find_map(|c| match c {
            Call::CreateShader(id, ShaderStage::Fragment) => Some(*id),
            _ => None,
        })
    }

    #[test]
    fn compile_links_and_releases_stage_objects() {
        let mut ctx = RenderContext::new(RecordingBackend::new());
        let source = ShaderSource::parse("default.shader", SRC).unwrap();

        let program = source.compile(&mut ctx).unwrap();

        let gl = ctx.backend();
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 1);
        assert!(gl.calls().contains(&Call::LinkProgram(program.id())));
        assert!(!program.is_bound());
    }

    #[test]
    fn fragment_failure_is_read_from_the_fragment_stage() {
        let backend = RecordingBackend::new().fail_compile(ShaderStage::Fragment, "0:1 bad token");
        let mut ctx = RenderContext::new(backend);
        let source = ShaderSource::parse("default.shader", SRC).unwrap();

        let err = source.compile(&mut ctx).unwrap_err();
        match err {
            ShaderError::Compile { stage, log, .. } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert_eq!(log, "0:1 bad token");
            }
            other => panic!("unexpected error: {other}"),
        }

        let gl = ctx.backend();
        let fs = fragment_stage_id(gl.calls()).unwrap();
        assert!(gl.calls().contains(&Call::ShaderCompileStatus(fs)));
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
        assert!(!gl.calls().iter().any(|c| matches!(c, Call::CreateProgram(_))));
    }

    #[test]
    fn vertex_failure_stops_before_the_fragment_stage() {
        let backend = RecordingBackend::new().fail_compile(ShaderStage::Vertex, "oops");
        let mut ctx = RenderContext::new(backend);
        let source = ShaderSource::parse("default.shader", SRC).unwrap();

        let err = source.compile(&mut ctx).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
        assert_eq!(fragment_stage_id(ctx.backend().calls()), None);
    }

    #[test]
    fn link_failure_deletes_program_and_stages() {
        let backend = RecordingBackend::new().fail_link("mismatched interface");
        let mut ctx = RenderContext::new(backend);
        let source = ShaderSource::parse("default.shader", SRC).unwrap();

        let err = source.compile(&mut ctx).unwrap_err();
        match err {
            ShaderError::Link { log, .. } => assert_eq!(log, "mismatched interface"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ctx.backend().live_programs(), 0);
        assert_eq!(ctx.backend().live_shaders(), 0);
    }

    #[test]
    fn fragment_first_sources_keep_their_order() {
        let src = "#type fragment\r\nfs\r\n#type vertex\r\nvs\r\n";
        let source = ShaderSource::parse("swapped.shader", src).unwrap();
        assert_eq!(source.order(), [ShaderStage::Fragment, ShaderStage::Vertex]);
        assert_eq!(source.body(ShaderStage::Vertex), "vs\r\n");
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let err = ShaderSource::parse("bad.shader", "#type geometry\nx\n").unwrap_err();
        assert!(matches!(err, ShaderError::Parse { ref path, .. } if path == Path::new("bad.shader")));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShaderSource::load(dir.path().join("nope.shader")).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }
}
