//! Graphics driver boundary.
//!
//! [`RenderBackend`] is the immediate-mode API shaders and scenes are written
//! against. [`WgpuBackend`] drives a window through wgpu;
//! [`RecordingBackend`] runs headless and records every call.

mod backend;
mod color;
mod context;
mod handle;
mod recording;
mod uniform;
mod wgpu_backend;

pub use backend::{BufferTarget, FrameStatus, RenderBackend, VertexAttribPointer};
pub use color::Color;
pub use context::{FrameStats, RenderContext};
pub use handle::{BufferId, ProgramId, StageId, UniformLocation, VertexArrayId};
pub use recording::{Call, RecordingBackend};
pub use uniform::UniformValue;
pub use wgpu_backend::WgpuBackend;
