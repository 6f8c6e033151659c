use std::marker::PhantomData;

use super::backend::{FrameStatus, RenderBackend};

/// Per-frame draw counters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub indices: u32,
}

/// The single-threaded render context.
///
/// Owns the backend; shaders and scenes reach the GPU only through a
/// `&mut RenderContext`. The type is neither `Send` nor `Sync`, which pins it
/// to the thread that created the graphics context.
pub struct RenderContext<B: RenderBackend> {
    backend: B,
    stats: FrameStats,
    _not_send: PhantomData<*const ()>,
}

impl<B: RenderBackend> RenderContext<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            stats: FrameStats::default(),
            _not_send: PhantomData,
        }
    }

    /// Read-only access, e.g. for inspecting a recording backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Counters for the current (or last finished) frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub(crate) fn begin_frame(&mut self) -> FrameStatus {
        self.stats = FrameStats::default();
        self.backend.begin_frame()
    }

    pub(crate) fn draw_elements(&mut self, count: u32) {
        self.stats.draw_calls += 1;
        self.stats.indices += count;
        self.backend.draw_elements(count);
    }
}
